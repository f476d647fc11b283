//! conch-storage: the report cache.
//!
//! Completed reports are stored under a dedup key
//! (kind, format, filename, last modification) with a per-record compression
//! tag. A second, independently versioned table holds per-file UI state.
//!
//! Two backends implement [`ReportStore`]: [`SqliteStore`] (file-backed or
//! in-memory SQLite) and [`MemoryStore`] (no persistence).

pub mod cache;
pub mod compression;
pub mod connection;
pub mod queries;
pub mod schema;
pub mod store;

pub use cache::{CachedReport, ReportCache};
pub use connection::DatabaseManager;
pub use schema::Schema;
pub use store::{MemoryStore, ReportStore, SqliteStore, StoredReport, UiFileRecord};
