//! Configuration system for conch.
//! TOML-based, layered resolution: env > explicit file > user file > defaults.

pub mod conch_config;
pub mod daemon_config;
pub mod policies_config;
pub mod storage_config;

pub use conch_config::ConchConfig;
pub use daemon_config::DaemonConfig;
pub use policies_config::PoliciesConfig;
pub use storage_config::StorageConfig;
