use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Layout;

/// Why a layout file could not be turned into install directories.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read layout file '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse layout file '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid layout: {message}")]
    ValidationError { message: String },
}

impl Layout {
    /// Where an installation records its directories when `--layout` is not
    /// given: `cado-nfs/layout.toml` under the per-user configuration
    /// directory, or under `.` on platforms without one.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("cado-nfs").join("layout.toml")
    }

    /// Layout for a run without `--layout`.
    ///
    /// An install that never wrote a layout file keeps its parameter tree
    /// and scripts next to the executable, which is what the default layout
    /// describes.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Layout::default());
        }

        Self::load_from(&path)
    }

    /// Read the `[paths]` table of a layout file named on the command line.
    /// Unlike [`Layout::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let layout: Layout = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        layout.validate()?;
        Ok(layout)
    }

    /// Parameter discovery needs a data root, so `paths.data` must be set.
    /// An empty `lib` or `bin` stands for the current directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.data.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "paths.data must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
