//! Policy storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PoliciesConfig {
    /// Directory where policies without a source file are exported.
    /// Default: `~/.conch/policies/`.
    pub directory: Option<String>,
}

impl PoliciesConfig {
    pub fn effective_directory(&self) -> Option<PathBuf> {
        match &self.directory {
            Some(d) => Some(PathBuf::from(d)),
            None => super::conch_config::user_dir().map(|d| d.join("policies")),
        }
    }
}
