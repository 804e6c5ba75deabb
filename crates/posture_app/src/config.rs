use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use posture_export::{DocumentStyle, SheetOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Whether a config file was read or freshly written with defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Loaded,
    Created,
}

impl ConfigOrigin {
    pub fn log(self, path: &Path) {
        match self {
            Self::Loaded => info!("Loaded config from {}", path.display()),
            Self::Created => info!("Created default config at {}", path.display()),
        }
    }
}

/// Export settings stored at `~/.posture/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where exports are saved. `None` means `~/.posture/exports/`.
    pub output_dir: Option<PathBuf>,
    pub log_level: String,
    pub sheet: SheetOptions,
    pub document: DocumentStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            log_level: "info".into(),
            sheet: SheetOptions::default(),
            document: DocumentStyle::default(),
        }
    }
}

impl AppConfig {
    /// Returns the base config directory: `~/.posture/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".posture"))
    }

    /// Returns the config file path: `~/.posture/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.posture/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Returns the default exports directory: `~/.posture/exports/`
    pub fn default_output_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("exports"))
    }

    /// The configured output directory, or the default one.
    pub fn resolved_output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_output_dir(),
        }
    }

    /// Load config from a specific file path, writing defaults there if the
    /// file does not exist yet.
    ///
    /// Runs before logging is up, so the caller logs the returned origin.
    pub fn load_from_path(path: &Path) -> Result<(Self, ConfigOrigin)> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Ok((config, ConfigOrigin::Loaded))
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            Ok((config, ConfigOrigin::Created))
        }
    }

    /// Save config to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}
