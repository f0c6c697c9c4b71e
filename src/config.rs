//! Viewer settings from `<config dir>/transcript-viewer/config.toml`.
//!
//! Every field has a default, so a missing file (or a partial one) is fine.
//! Command-line flags are applied on top by the binaries.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::export::ExportOptions;
use crate::layout::LayoutStyle;
use crate::view::DEFAULT_PAGE_SIZE;

const APP_DIR: &str = "transcript-viewer";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Substring of `from_id` that marks own messages
    pub self_id: Option<String>,
    pub page_size: usize,
    /// Body characters shown on the canvas before the ellipsis; 0 = unlimited
    pub canvas_truncate: usize,
    /// Extra font file loaded alongside the system fonts
    pub font_path: Option<PathBuf>,
    pub export: ExportConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            self_id: None,
            page_size: DEFAULT_PAGE_SIZE,
            canvas_truncate: LayoutStyle::canvas().truncate_budget,
            font_path: None,
            export: ExportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub max_height: u32,
    pub max_messages: usize,
    pub truncate: usize,
    /// Where interactive exports are written; current directory when unset
    pub directory: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let options = ExportOptions::default();
        Self {
            width: options.width,
            max_height: options.max_height,
            max_messages: options.max_messages,
            truncate: options.truncate,
            directory: None,
        }
    }
}

impl ViewerConfig {
    /// `<config dir>/transcript-viewer/config.toml`, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location; defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Self-identifier with blanks treated as unset
    pub fn self_id(&self) -> Option<&str> {
        self.self_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn canvas_style(&self) -> LayoutStyle {
        LayoutStyle::canvas().with_truncate_budget(self.canvas_truncate)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            width: self.export.width.max(1),
            max_height: self.export.max_height.max(1),
            max_messages: self.export.max_messages,
            truncate: self.export.truncate,
        }
    }

    pub fn export_directory(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
