//! Extractor configuration via `docindex.toml`
//!
//! A default `docindex.toml` can be written next to the database files on
//! first use. To change settings, edit the file and reopen the engine.

use crate::limits::{ExtractLimits, DEFAULT_MAX_RECORD_BYTES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "docindex.toml";

/// Errors raised while loading or writing configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Config I/O error on '{}': {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid TOML for this config
    #[error("Failed to parse config file '{}': {message}", .path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Values parsed but are out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Extractor configuration loaded from `docindex.toml`.
///
/// # Example
///
/// ```toml
/// # Largest record the extractor will decode, in bytes
/// max_record_bytes = 16777216
///
/// # Log skipped records (missing / null attribute) at debug level
/// log_skipped = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum record size accepted for decoding.
    #[serde(default = "default_max_record_bytes")]
    pub max_record_bytes: usize,
    /// Log skip outcomes at `debug` instead of `trace`.
    #[serde(default)]
    pub log_skipped: bool,
}

fn default_max_record_bytes() -> usize {
    DEFAULT_MAX_RECORD_BYTES
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_record_bytes: default_max_record_bytes(),
            log_skipped: false,
        }
    }
}

impl ExtractorConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_record_bytes` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_record_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_record_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Limits derived from this config.
    pub fn limits(&self) -> ExtractLimits {
        ExtractLimits {
            max_record_bytes: self.max_record_bytes,
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# docindex key extractor configuration
#
# Largest record the extractor will decode, in bytes (default: 16 MB).
# Larger records are reported as parse failures and never indexed.
max_record_bytes = 16777216

# Log records skipped for a missing or null attribute at debug level
# instead of trace (default: false).
log_skipped = false
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ExtractorConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ConfigError::Invalid(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
