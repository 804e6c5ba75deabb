use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use posture_export::{DirectorySink, DocumentExporter, Record, Report, TabularExporter};
use tracing::info;

use crate::config::AppConfig;
use crate::samples;

/// Everything a command needs: the loaded config and the sink to save into.
pub struct Exporters {
    pub tabular: TabularExporter,
    pub document: DocumentExporter,
    pub sink: Arc<DirectorySink>,
}

impl Exporters {
    pub fn from_config(config: &AppConfig, out_dir: PathBuf) -> Self {
        Self {
            tabular: TabularExporter::new(config.sheet.clone()),
            document: DocumentExporter::new(config.document.clone()),
            sink: Arc::new(DirectorySink::new(out_dir)),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Export `records` under `name` and return the saved path.
fn save_sheet(exporters: &Exporters, records: &[Record], name: &str) -> Result<PathBuf> {
    let result = exporters
        .tabular
        .export_to(records, name, &*exporters.sink)
        .with_context(|| format!("Failed to export sheet {name:?}"))?;
    exporters.sink.path_for(result.file_name()).map_err(Into::into)
}

async fn save_report(exporters: &Exporters, report: &Report) -> Result<PathBuf> {
    let result = exporters
        .document
        .export_to(report, exporters.sink.clone())
        .await
        .with_context(|| format!("Failed to export report {:?}", report.title))?;
    exporters.sink.path_for(result.file_name()).map_err(Into::into)
}

pub fn sheet(exporters: &Exporters, input: &Path, name: Option<String>) -> Result<Vec<PathBuf>> {
    let records: Vec<Record> = read_json(input)?;
    let name = match name {
        Some(name) => name,
        None => input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .context("Input path has no file name; pass --name")?,
    };
    info!("Exporting {} record(s) from {}", records.len(), input.display());
    Ok(vec![save_sheet(exporters, &records, &name)?])
}

pub async fn report(exporters: &Exporters, input: &Path) -> Result<Vec<PathBuf>> {
    let report: Report = read_json(input)?;
    info!(
        "Exporting report {:?} with {} widget(s)",
        report.title,
        report.widgets.len()
    );
    Ok(vec![save_report(exporters, &report).await?])
}

pub async fn sample(exporters: &Exporters) -> Result<Vec<PathBuf>> {
    let sheet = save_sheet(
        exporters,
        &samples::sample_records(),
        samples::SAMPLE_SHEET_NAME,
    )?;
    let report = save_report(exporters, &samples::sample_report()).await?;
    Ok(vec![sheet, report])
}
