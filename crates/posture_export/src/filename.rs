use once_cell::sync::Lazy;
use regex::Regex;

use crate::widget::ExportFormat;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// `audit_2024` -> `audit_2024.xlsx`. The base name is used as given.
pub fn spreadsheet_file_name(file_name: &str) -> String {
    format!("{file_name}.{}", ExportFormat::Xlsx.extension())
}

/// `Q1 Risk Report` -> `Q1_Risk_Report.pdf`.
///
/// Each run of whitespace becomes a single underscore. An empty title yields
/// `.pdf`.
pub fn document_file_name(title: &str) -> String {
    let base = WHITESPACE_RUN.replace_all(title, "_");
    format!("{base}.{}", ExportFormat::Pdf.extension())
}
