//! Report cache storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DATABASE_FILENAME;
use crate::types::Compression;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Persist reports to disk. When false the cache lives in memory only.
    /// Default: true.
    pub enabled: Option<bool>,
    /// Database directory. Default: `~/.conch/`.
    pub directory: Option<String>,
    /// Database file name. Default: `conch.db`.
    pub filename: Option<String>,
    /// Compression for newly written reports: `none` or `zstd`. Default: zstd.
    pub compression: Option<String>,
}

impl StorageConfig {
    pub fn set_database_directory(&mut self, directory: impl Into<String>) {
        self.directory = Some(directory.into());
    }

    pub fn set_database_filename(&mut self, filename: impl Into<String>) {
        self.filename = Some(filename.into());
    }

    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_filename(&self) -> &str {
        self.filename.as_deref().unwrap_or(DEFAULT_DATABASE_FILENAME)
    }

    /// Compression for new records. Unknown names fall back to the default;
    /// `ConchConfig::validate` rejects them earlier.
    pub fn effective_compression(&self) -> Compression {
        self.compression
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or_default()
    }

    /// Full database path, or `None` if no directory is configured and no
    /// home directory can be found.
    pub fn database_path(&self) -> Option<PathBuf> {
        let dir = match &self.directory {
            Some(d) => PathBuf::from(d),
            None => super::conch_config::user_dir()?,
        };
        Some(dir.join(self.effective_filename()))
    }
}
