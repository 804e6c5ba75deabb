use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::filename::document_file_name;
use crate::layout::{DocumentStyle, layout_report};
use crate::pdf::{DocumentInfo, render_pdf};
use crate::sink::SaveSink;
use crate::widget::{ExportFormat, ExportResult, Report};

/// Renders reports into paginated PDF documents.
///
/// Cloning is cheap; clones share the same style.
#[derive(Debug, Clone, Default)]
pub struct DocumentExporter {
    style: Arc<DocumentStyle>,
}

impl DocumentExporter {
    pub fn new(style: DocumentStyle) -> Self {
        Self {
            style: Arc::new(style),
        }
    }

    pub fn style(&self) -> &DocumentStyle {
        &self.style
    }

    /// Render `report` and return the whole document once it is complete.
    ///
    /// Page layout runs on the blocking pool. A render failure or a panicked
    /// worker fails only this call.
    pub async fn export(&self, report: &Report) -> Result<ExportResult, ExportError> {
        let now = Local::now();
        let commands = layout_report(report, &self.style, now.date_naive());
        let style = Arc::clone(&self.style);
        let info = DocumentInfo {
            title: report.title.clone(),
            created_at: now.naive_local(),
        };
        debug!(
            "Rendering {:?} with {} widget(s)",
            report.title,
            report.widgets.len()
        );

        let bytes = tokio::task::spawn_blocking(move || render_pdf(&commands, &style, &info))
            .await
            .map_err(|e| ExportError::RenderTask(e.to_string()))??;

        let file_name = document_file_name(&report.title);
        info!("Built {file_name} ({} bytes)", bytes.len());
        Ok(ExportResult::new(bytes, file_name, ExportFormat::Pdf))
    }

    /// Export and hand the document to `sink`. The save also runs on the
    /// blocking pool.
    pub async fn export_to(
        &self,
        report: &Report,
        sink: Arc<dyn SaveSink>,
    ) -> Result<ExportResult, ExportError> {
        let result = self.export(report).await?;
        tokio::task::spawn_blocking(move || -> Result<ExportResult, ExportError> {
            sink.save(result.bytes(), result.file_name())?;
            Ok(result)
        })
        .await
        .map_err(|e| ExportError::RenderTask(e.to_string()))?
    }
}
