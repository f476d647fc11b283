//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DaemonConfig, PoliciesConfig, StorageConfig};
use crate::constants::USER_DIR_NAME;
use crate::errors::ConfigError;
use crate::types::Compression;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CONCH_*`)
/// 2. Explicit configuration file (set by the caller)
/// 3. User config (`~/.conch/config.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConchConfig {
    pub daemon: DaemonConfig,
    pub storage: StorageConfig,
    pub policies: PoliciesConfig,
}

impl ConchConfig {
    /// Load configuration with layered resolution.
    ///
    /// A missing user config is ignored. A missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
            }
        }

        if let Some(path) = explicit {
            Self::merge_toml_file(&mut config, path)?;
        }

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    pub fn validate(config: &ConchConfig) -> Result<(), ConfigError> {
        if config.daemon.port == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "daemon.port".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref filename) = config.storage.filename {
            if filename.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.filename".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(ref compression) = config.storage.compression {
            if let Err(message) = compression.parse::<Compression>() {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.compression".to_string(),
                    message,
                });
            }
        }
        Ok(())
    }

    /// Daemon `(address, port)` after defaults.
    pub fn daemon_address(&self) -> (String, u16) {
        (
            self.daemon.effective_address().to_string(),
            self.daemon.effective_port(),
        )
    }

    /// Returns the user config path: `~/.conch/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        user_dir().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(config: &mut ConchConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ConchConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        ::tracing::debug!(path = %path.display(), "merged configuration file");
        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values override.
    fn merge(base: &mut ConchConfig, other: &ConchConfig) {
        if other.daemon.enabled.is_some() {
            base.daemon.enabled = other.daemon.enabled;
        }
        if other.daemon.address.is_some() {
            base.daemon.address = other.daemon.address.clone();
        }
        if other.daemon.port.is_some() {
            base.daemon.port = other.daemon.port;
        }

        if other.storage.enabled.is_some() {
            base.storage.enabled = other.storage.enabled;
        }
        if other.storage.directory.is_some() {
            base.storage.directory = other.storage.directory.clone();
        }
        if other.storage.filename.is_some() {
            base.storage.filename = other.storage.filename.clone();
        }
        if other.storage.compression.is_some() {
            base.storage.compression = other.storage.compression.clone();
        }

        if other.policies.directory.is_some() {
            base.policies.directory = other.policies.directory.clone();
        }
    }

    /// Pattern: `CONCH_DAEMON_ENABLED`, `CONCH_STORAGE_DIRECTORY`, etc.
    fn apply_env_overrides(config: &mut ConchConfig) {
        if let Ok(val) = std::env::var("CONCH_DAEMON_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.daemon.enabled = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONCH_DAEMON_ADDRESS") {
            config.daemon.address = Some(val);
        }
        if let Ok(val) = std::env::var("CONCH_DAEMON_PORT") {
            if let Ok(v) = val.parse::<u16>() {
                config.daemon.port = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONCH_STORAGE_DIRECTORY") {
            config.storage.directory = Some(val);
        }
        if let Ok(val) = std::env::var("CONCH_STORAGE_COMPRESSION") {
            config.storage.compression = Some(val);
        }
        if let Ok(val) = std::env::var("CONCH_POLICIES_DIRECTORY") {
            config.policies.directory = Some(val);
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the per-user directory: `~/.conch/`.
pub(crate) fn user_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .map(|h| h.join(USER_DIR_NAME))
}
