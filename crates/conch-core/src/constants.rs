//! Shared constants.

/// Separator appended after each per-policy report when several policies are
/// validated against one file.
pub const POLICY_REPORT_SEPARATOR: &str = "\r\n";

/// Default database file name inside the database directory.
pub const DEFAULT_DATABASE_FILENAME: &str = "conch.db";

/// Name of the per-user configuration directory under `$HOME`.
pub const USER_DIR_NAME: &str = ".conch";

/// Default daemon address.
pub const DEFAULT_DAEMON_ADDRESS: &str = "127.0.0.1";

/// Default daemon port.
pub const DEFAULT_DAEMON_PORT: u16 = 80;

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "CONCH_LOG";
