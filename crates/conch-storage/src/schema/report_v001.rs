//! Report schema v1: one row per dedup key, uncompressed payloads.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS report (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tool INTEGER NOT NULL,
    format INTEGER NOT NULL,
    filename TEXT NOT NULL,
    file_last_modification TEXT NOT NULL,
    report BLOB NOT NULL,
    UNIQUE(tool, format, filename, file_last_modification)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_report_filename ON report(filename);
"#;
