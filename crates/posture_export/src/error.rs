use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single export call.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Render task failed: {0}")]
    RenderTask(String),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Returns a short message suitable for showing next to the export button.
    pub fn user_message(&self) -> String {
        match self {
            Self::Spreadsheet(_) => "Could not build the spreadsheet.".into(),
            Self::Layout(msg) => format!("Report layout is invalid: {msg}"),
            Self::RenderTask(_) => "Report rendering was interrupted.".into(),
            Self::InvalidFileName(name) => format!("Cannot save a file named {name:?}."),
            Self::Io { path, .. } => format!("Could not save {}.", path.display()),
        }
    }
}
