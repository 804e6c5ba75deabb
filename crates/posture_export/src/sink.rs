//! Save sinks: where finished export bytes go.

use std::path::{Component, Path, PathBuf};

use parking_lot::Mutex;
use tracing::info;

use crate::error::ExportError;

/// Persists an export buffer under a suggested file name.
pub trait SaveSink: Send + Sync {
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<(), ExportError>;
}

/// Writes exports as files inside one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the target path, refusing names that would leave the directory.
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf, ExportError> {
        let candidate = Path::new(file_name);
        let mut components = candidate.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(candidate)),
            _ => Err(ExportError::InvalidFileName(file_name.to_string())),
        }
    }
}

impl SaveSink for DirectorySink {
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<(), ExportError> {
        let path = self.path_for(file_name)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Keeps every saved export in memory, in save order.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.saved.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.saved
            .lock()
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, bytes)| bytes.clone())
    }

    pub fn len(&self) -> usize {
        self.saved.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.lock().is_empty()
    }
}

impl SaveSink for MemorySink {
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<(), ExportError> {
        self.saved
            .lock()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("exports"));
        sink.save(b"hello", "report.pdf").unwrap();
        let written = std::fs::read(tmp.path().join("exports").join("report.pdf")).unwrap();
        assert_eq!(written, b"hello");
    }

    #[test]
    fn test_directory_sink_accepts_bare_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        sink.save(b"x", ".pdf").unwrap();
        assert!(tmp.path().join(".pdf").exists());
    }

    #[test]
    fn test_directory_sink_rejects_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        for name in ["../escape.pdf", "nested/file.pdf", "/abs.pdf", "..", ""] {
            let err = sink.save(b"x", name).unwrap_err();
            assert!(
                matches!(err, ExportError::InvalidFileName(_)),
                "expected rejection for {name:?}"
            );
        }
    }

    #[test]
    fn test_directory_sink_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        sink.save(b"first", "a.xlsx").unwrap();
        sink.save(b"second", "a.xlsx").unwrap();
        assert_eq!(std::fs::read(tmp.path().join("a.xlsx")).unwrap(), b"second");
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.save(b"1", "one.xlsx").unwrap();
        sink.save(b"2", "two.pdf").unwrap();
        assert_eq!(sink.file_names(), vec!["one.xlsx", "two.pdf"]);
        assert_eq!(sink.get("two.pdf"), Some(b"2".to_vec()));
        assert_eq!(sink.len(), 2);
    }
}
