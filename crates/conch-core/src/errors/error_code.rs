//! Stable error codes for front ends.

/// Every error enum implements this to expose a structured code string.
pub trait ConchErrorCode {
    /// Returns the error code (e.g. `"STORAGE_ERROR"`).
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const DUPLICATE_RECORD: &str = "DUPLICATE_RECORD";
pub const RECORD_NOT_FOUND: &str = "RECORD_NOT_FOUND";
pub const COMPRESSION_ERROR: &str = "COMPRESSION_ERROR";
pub const INVALID_COMBINATION: &str = "INVALID_COMBINATION";
pub const POLICY_NOT_FOUND: &str = "POLICY_NOT_FOUND";
pub const POLICY_IMPORT_ERROR: &str = "POLICY_IMPORT_ERROR";
pub const POLICY_EXPORT_ERROR: &str = "POLICY_EXPORT_ERROR";
pub const ENGINE_ERROR: &str = "ENGINE_ERROR";
pub const DAEMON_UNAVAILABLE: &str = "DAEMON_UNAVAILABLE";
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
