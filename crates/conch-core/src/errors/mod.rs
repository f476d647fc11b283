//! Error handling for conch.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod dispatch_error;
pub mod engine_error;
pub mod error_code;
pub mod policy_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use dispatch_error::DispatchError;
pub use engine_error::EngineError;
pub use error_code::ConchErrorCode;
pub use policy_error::PolicyError;
pub use storage_error::StorageError;
