//! The storage backend seam.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use conch_core::errors::StorageError;
use conch_core::types::{CacheKey, Compression};

/// A stored report as the backend holds it: compressed bytes plus the tag
/// needed to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub payload: Vec<u8>,
    pub compression: Compression,
}

/// Per-file front-end state, keyed by `(filename, filepath)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiFileRecord {
    pub filename: String,
    pub filepath: String,
    pub policy_id: Option<i64>,
    pub display_id: Option<i64>,
    pub analyzed: bool,
    pub implementation_valid: bool,
    pub policy_valid: bool,
}

impl UiFileRecord {
    pub fn new(filename: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            filepath: filepath.into(),
            ..Default::default()
        }
    }
}

/// Operations every report cache backend provides.
///
/// Payloads cross this boundary already compressed; codecs live in the
/// cache layer so every backend stores the same bytes.
pub trait ReportStore: Send + Sync {
    fn create_report_table(&self) -> Result<(), StorageError>;
    fn update_report_table(&self) -> Result<(), StorageError>;
    fn create_ui_table(&self) -> Result<(), StorageError>;
    fn update_ui_table(&self) -> Result<(), StorageError>;

    fn save_report(
        &self,
        key: &CacheKey,
        payload: &[u8],
        compression: Compression,
    ) -> Result<(), StorageError>;
    /// Returns the number of records removed.
    fn remove_report(&self, filename: &str) -> Result<usize, StorageError>;
    fn get_report(&self, key: &CacheKey) -> Result<Option<StoredReport>, StorageError>;
    fn file_is_registered(&self, key: &CacheKey) -> Result<bool, StorageError>;
    fn get_elements(&self) -> Result<Vec<String>, StorageError>;

    /// Fails with `DuplicateUiRecord` when the key exists.
    fn ui_add_file(&self, record: &UiFileRecord) -> Result<(), StorageError>;
    /// Fails with `UiRecordNotFound` when the key does not exist.
    fn ui_update_file(&self, record: &UiFileRecord) -> Result<(), StorageError>;
    fn ui_get_file(&self, filename: &str, filepath: &str)
        -> Result<Option<UiFileRecord>, StorageError>;
    /// Fails with `UiRecordNotFound` when the key does not exist.
    fn ui_remove_file(&self, filename: &str, filepath: &str) -> Result<(), StorageError>;
    fn ui_get_elements(&self) -> Result<Vec<(String, String)>, StorageError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
