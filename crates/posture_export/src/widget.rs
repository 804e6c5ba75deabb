use std::fmt;

use serde::{Deserialize, Serialize};

/// Section type of a report widget.
///
/// Only `chart` and `table` change how a section is rendered; any other type
/// string is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    Chart,
    Table,
    Other(String),
}

impl WidgetKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chart => "chart",
            Self::Table => "table",
            Self::Other(kind) => kind,
        }
    }

    /// Text drawn in place of the widget's content.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Chart => "[Chart Visualization Placeholder]",
            Self::Table => "[Table Data Placeholder]",
            Self::Other(_) => "[Content Placeholder]",
        }
    }
}

impl From<String> for WidgetKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "chart" => Self::Chart,
            "table" => Self::Table,
            _ => Self::Other(kind),
        }
    }
}

impl From<&str> for WidgetKind {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_string())
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One report section descriptor. The payload is never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Widget {
    pub fn new(title: impl Into<String>, kind: impl Into<WidgetKind>) -> Self {
        Self {
            id: None,
            title: title.into(),
            kind: kind.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A titled, ordered list of widgets, built right before an export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Report {
    pub fn new(title: impl Into<String>, widgets: Vec<Widget>) -> Self {
        Self {
            title: title.into(),
            widgets,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Finished export: the file bytes and the name to save them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    bytes: Vec<u8>,
    file_name: String,
    format: ExportFormat,
}

impl ExportResult {
    pub fn new(bytes: Vec<u8>, file_name: String, format: ExportFormat) -> Self {
        Self {
            bytes,
            file_name,
            format,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
