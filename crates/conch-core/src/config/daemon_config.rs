//! Daemon configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DAEMON_ADDRESS, DEFAULT_DAEMON_PORT};

/// Where the background daemon listens and whether to use it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DaemonConfig {
    /// Delegate analysis to the daemon. Default: false.
    pub enabled: Option<bool>,
    /// Default: `127.0.0.1`.
    pub address: Option<String>,
    /// Default: 80.
    pub port: Option<u16>,
}

impl DaemonConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn effective_address(&self) -> &str {
        self.address.as_deref().unwrap_or(DEFAULT_DAEMON_ADDRESS)
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_DAEMON_PORT)
    }
}
