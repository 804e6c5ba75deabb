// Report export: XLSX workbooks from records, paginated PDFs from widget reports.

pub mod document;
pub mod error;
pub mod filename;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod record;
pub mod sink;
pub mod widget;
pub mod xlsx;

pub use document::DocumentExporter;
pub use error::ExportError;
pub use filename::{document_file_name, spreadsheet_file_name};
pub use layout::{Align, DocumentStyle, FontWeight, LayoutCommand, TextLine, layout_report};
pub use record::{CellValue, Record};
pub use sink::{DirectorySink, MemorySink, SaveSink};
pub use widget::{ExportFormat, ExportResult, Report, Widget, WidgetKind};
pub use xlsx::{SheetOptions, Table, TabularExporter, tabulate};
