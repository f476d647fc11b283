//! Report schema v2: per-record compression tag.
//! Rows written before v2 are uncompressed, tag 0.

pub const MIGRATION_SQL: &str = r#"
ALTER TABLE report ADD COLUMN compression INTEGER NOT NULL DEFAULT 0;
"#;

/// Latest layout in one step, for fresh databases.
pub const CREATE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS report (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tool INTEGER NOT NULL,
    format INTEGER NOT NULL,
    filename TEXT NOT NULL,
    file_last_modification TEXT NOT NULL,
    report BLOB NOT NULL,
    compression INTEGER NOT NULL DEFAULT 0,
    UNIQUE(tool, format, filename, file_last_modification)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_report_filename ON report(filename);
"#;
