use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ExportError;
use crate::filename::spreadsheet_file_name;
use crate::record::{CellValue, Record};
use crate::sink::SaveSink;
use crate::widget::{ExportFormat, ExportResult};

/// Name of the single worksheet in every exported workbook.
pub const SHEET_NAME: &str = "Sheet1";

/// Longest string Excel accepts in one cell.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Spreadsheet styling knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    pub bold_headers: bool,
    pub autofit: bool,
    pub date_format: String,
    pub datetime_format: String,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            bold_headers: true,
            autofit: true,
            date_format: "yyyy-mm-dd".into(),
            datetime_format: "yyyy-mm-dd hh:mm:ss".into(),
        }
    }
}

/// Records laid out as a grid: headers from the first record, one row per
/// record, `None` where a record lacks a header field.
#[derive(Debug, PartialEq)]
pub struct Table<'a> {
    pub headers: Vec<&'a str>,
    pub rows: Vec<Vec<Option<&'a CellValue>>>,
}

/// Lay records out under the first record's field order.
///
/// Fields that only appear in later records are dropped.
pub fn tabulate(records: &[Record]) -> Table<'_> {
    let headers: Vec<&str> = records
        .first()
        .map(|first| first.keys().collect())
        .unwrap_or_default();

    let rows = records
        .iter()
        .map(|record| headers.iter().map(|h| record.get(h)).collect())
        .collect();

    Table { headers, rows }
}

/// Builds single-sheet XLSX workbooks from records.
#[derive(Debug, Clone, Default)]
pub struct TabularExporter {
    options: SheetOptions,
}

impl TabularExporter {
    pub fn new(options: SheetOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Serialize `records` into an in-memory workbook named `<file_name>.xlsx`.
    pub fn export(&self, records: &[Record], file_name: &str) -> Result<ExportResult, ExportError> {
        let table = tabulate(records);
        let bytes = self.write_workbook(&table)?;
        debug!(
            "Built {SHEET_NAME} with {} columns, {} rows ({} bytes)",
            table.headers.len(),
            table.rows.len(),
            bytes.len()
        );
        Ok(ExportResult::new(
            bytes,
            spreadsheet_file_name(file_name),
            ExportFormat::Xlsx,
        ))
    }

    /// Export and hand the workbook to `sink`.
    pub fn export_to(
        &self,
        records: &[Record],
        file_name: &str,
        sink: &dyn SaveSink,
    ) -> Result<ExportResult, ExportError> {
        let result = self.export(records, file_name)?;
        sink.save(result.bytes(), result.file_name())?;
        Ok(result)
    }

    fn write_workbook(&self, table: &Table<'_>) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header_format = if self.options.bold_headers {
            Format::new().set_bold()
        } else {
            Format::new()
        };
        let date_format = Format::new().set_num_format(&self.options.date_format);
        let datetime_format = Format::new().set_num_format(&self.options.datetime_format);

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string_with_format(
                0,
                col_num(col)?,
                fit_cell_text(header),
                &header_format,
            )?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let excel_row = row_num(row_idx + 1)?;
            for (col_idx, cell) in row.iter().enumerate() {
                let Some(value) = cell else { continue };
                let col = col_num(col_idx)?;
                write_cell(worksheet, excel_row, col, value, &date_format, &datetime_format)?;
            }
        }

        if self.options.autofit {
            worksheet.autofit();
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &CellValue,
    date_format: &Format,
    datetime_format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Text(s) => {
            worksheet.write_string(row, col, fit_cell_text(s))?;
        }
        CellValue::Number(n) if n.is_finite() => {
            worksheet.write_number(row, col, *n)?;
        }
        // Excel has no NaN/infinity; keep the text form.
        CellValue::Number(n) => {
            worksheet.write_string(row, col, n.to_string())?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Date(d) if is_excel_date(*d) => {
            worksheet.write_datetime_with_format(row, col, d, date_format)?;
        }
        CellValue::DateTime(dt) if is_excel_date(dt.date()) => {
            worksheet.write_datetime_with_format(row, col, dt, datetime_format)?;
        }
        // Outside the 1900 date system; keep the text form.
        CellValue::Date(_) | CellValue::DateTime(_) => {
            worksheet.write_string(row, col, value.to_string())?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}

/// Excel stores dates from 1900-01-01 through 9999-12-31.
fn is_excel_date(date: NaiveDate) -> bool {
    (1900..=9999).contains(&date.year())
}

/// Cut `text` to Excel's cell limit, counted in chars.
fn fit_cell_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                "Truncating {} chars of cell text to {MAX_CELL_CHARS}",
                text.chars().count()
            );
            &text[..cut]
        }
        None => text,
    }
}

fn row_num(idx: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(idx: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;
    use crate::sink::MemorySink;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new()
                .with("Name", "Alice")
                .with("Age", 30_i64)
                .with("City", "New York"),
            Record::new()
                .with("Name", "Bob")
                .with("Age", 25_i64)
                .with("City", "London"),
        ]
    }

    #[test]
    fn test_tabulate_headers_follow_first_record() {
        let records = sample_records();
        let table = tabulate(&records);
        assert_eq!(table.headers, vec!["Name", "Age", "City"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][0], Some(&CellValue::Text("Bob".into())));
        assert_eq!(table.rows[1][1], Some(&CellValue::Number(25.0)));
    }

    #[test]
    fn test_tabulate_values_match_up_to_stringification() {
        let records = sample_records();
        let table = tabulate(&records);
        for (record, row) in records.iter().zip(&table.rows) {
            for (header, cell) in table.headers.iter().zip(row) {
                let expected = record.get(header).map(|v| v.to_string());
                assert_eq!(cell.map(|v| v.to_string()), expected);
            }
        }
    }

    #[test]
    fn test_tabulate_missing_fields_are_empty() {
        let records = vec![
            Record::new().with("id", "R-1").with("owner", "sec"),
            Record::new().with("id", "R-2"),
            Record::new().with("owner", "grc").with("extra", "ignored"),
        ];
        let table = tabulate(&records);
        assert_eq!(table.headers, vec!["id", "owner"]);
        assert_eq!(table.rows[1], vec![Some(&CellValue::Text("R-2".into())), None]);
        assert_eq!(table.rows[2], vec![None, Some(&CellValue::Text("grc".into()))]);
    }

    #[test]
    fn test_tabulate_different_key_order_uses_first() {
        let records = vec![
            Record::new().with("a", 1_i64).with("b", 2_i64),
            Record::new().with("b", 20_i64).with("a", 10_i64),
        ];
        let table = tabulate(&records);
        assert_eq!(
            table.rows[1],
            vec![Some(&CellValue::Number(10.0)), Some(&CellValue::Number(20.0))]
        );
    }

    #[test]
    fn test_tabulate_empty() {
        let table = tabulate(&[]);
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_export_basic() {
        let result = TabularExporter::default()
            .export(&sample_records(), "audit_2024")
            .unwrap();
        assert_eq!(result.file_name(), "audit_2024.xlsx");
        assert_eq!(result.format(), ExportFormat::Xlsx);
        // XLSX files start with PK (zip format)
        assert!(result.bytes().len() > 100);
        assert_eq!(&result.bytes()[0..2], b"PK");
    }

    #[test]
    fn test_export_has_single_sheet1() {
        let result = TabularExporter::default()
            .export(&sample_records(), "people")
            .unwrap();
        let workbook = read_part(result.bytes(), "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Sheet1""#));
        assert_eq!(workbook.matches("<sheet ").count(), 1);
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let result = TabularExporter::default()
            .export(&sample_records(), "people")
            .unwrap();
        let strings = read_part(result.bytes(), "xl/sharedStrings.xml");
        for text in ["Name", "Age", "City", "Alice", "Bob", "New York", "London"] {
            assert!(strings.contains(text), "missing {text}");
        }
        let sheet = read_part(result.bytes(), "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<row r="1""#));
        assert!(sheet.contains(r#"<row r="3""#));
        assert!(!sheet.contains(r#"<row r="4""#));
        assert!(sheet.contains("<v>30</v>"));
    }

    #[test]
    fn test_export_missing_field_leaves_cell_empty() {
        let records = vec![
            Record::new().with("id", "R-1").with("score", 80_i64),
            Record::new().with("id", "R-2"),
        ];
        let result = TabularExporter::default().export(&records, "risks").unwrap();
        let sheet = read_part(result.bytes(), "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"r="B2""#));
        assert!(sheet.contains(r#"r="A3""#));
        assert!(!sheet.contains(r#"r="B3""#));
    }

    #[test]
    fn test_export_empty_records() {
        let result = TabularExporter::default().export(&[], "empty").unwrap();
        assert_eq!(&result.bytes()[0..2], b"PK");
        let sheet = read_part(result.bytes(), "xl/worksheets/sheet1.xml");
        assert!(!sheet.contains("<row"));
        let workbook = read_part(result.bytes(), "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Sheet1""#));
    }

    #[test]
    fn test_export_strings_stay_strings() {
        let records = vec![Record::new().with("id", "007")];
        let result = TabularExporter::default().export(&records, "ids").unwrap();
        let strings = read_part(result.bytes(), "xl/sharedStrings.xml");
        assert!(strings.contains("007"));
    }

    #[test]
    fn test_export_mixed_scalars() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let records = vec![
            Record::new()
                .with("due", date)
                .with("reviewed", date.and_hms_opt(12, 0, 0).unwrap())
                .with("open", true)
                .with("note", CellValue::Empty)
                .with("ratio", f64::NAN),
        ];
        let result = TabularExporter::default().export(&records, "mixed").unwrap();
        let sheet = read_part(result.bytes(), "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<v>45306</v>"));
        assert!(sheet.contains("<v>45306.5</v>"));
        assert!(sheet.contains(r#"t="b""#));
        assert!(!sheet.contains(r#"r="D2""#));
    }

    #[test]
    fn test_export_dates_before_1900_fall_back_to_text() {
        let records = vec![
            Record::new()
                .with("a", NaiveDate::from_ymd_opt(1900, 1, 15).unwrap())
                .with("b", NaiveDate::from_ymd_opt(1899, 6, 1).unwrap())
                .with("c", NaiveDate::from_ymd_opt(1900, 3, 1).unwrap()),
        ];
        let result = TabularExporter::default().export(&records, "dates").unwrap();
        let sheet = read_part(result.bytes(), "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<v>15</v>"));
        // Excel counts the nonexistent 1900-02-29.
        assert!(sheet.contains("<v>61</v>"));
        assert!(!sheet.contains("<v>-"));
        let strings = read_part(result.bytes(), "xl/sharedStrings.xml");
        assert!(strings.contains("1899-06-01"));
    }

    #[test]
    fn test_export_truncates_oversized_text() {
        let long = "x".repeat(40_000);
        let tags: Vec<u32> = (0..10_000).collect();
        let mut records: Vec<Record> = serde_json::from_value(serde_json::json!([
            { "id": "R-1", "tags": tags }
        ]))
        .unwrap();
        records[0].insert("notes", long);

        let result = TabularExporter::default().export(&records, "long").unwrap();
        let strings = read_part(result.bytes(), "xl/sharedStrings.xml");
        assert!(strings.contains(&"x".repeat(MAX_CELL_CHARS)));
        assert!(!strings.contains(&"x".repeat(MAX_CELL_CHARS + 1)));
        assert!(strings.contains("[0,1,2,3"));
    }

    #[test]
    fn test_fit_cell_text_counts_chars() {
        assert_eq!(fit_cell_text("short"), "short");
        let wide = "é".repeat(MAX_CELL_CHARS + 5);
        let cut = fit_cell_text(&wide);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert!(wide.starts_with(cut));
    }

    #[test]
    fn test_export_large_dataset() {
        let records: Vec<Record> = (0..1000)
            .map(|i| {
                Record::new()
                    .with("ID", i as i64)
                    .with("Value", format!("{:.2}", i as f64 * 1.5))
            })
            .collect();
        let result = TabularExporter::default().export(&records, "large").unwrap();
        assert!(result.bytes().len() > 1000);
    }

    #[test]
    fn test_export_to_sink() {
        let sink = MemorySink::new();
        let result = TabularExporter::default()
            .export_to(&sample_records(), "audit_2024", &sink)
            .unwrap();
        assert_eq!(sink.file_names(), vec!["audit_2024.xlsx"]);
        assert_eq!(sink.get("audit_2024.xlsx").as_deref(), Some(result.bytes()));
    }

    #[test]
    fn test_plain_headers_option() {
        let options = SheetOptions {
            bold_headers: false,
            autofit: false,
            ..SheetOptions::default()
        };
        let result = TabularExporter::new(options)
            .export(&sample_records(), "plain")
            .unwrap();
        assert_eq!(&result.bytes()[0..2], b"PK");
    }
}
