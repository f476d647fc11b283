//! UI schema v1: per-file front-end state keyed by (filename, filepath).

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS ui_file (
    filename TEXT NOT NULL,
    filepath TEXT NOT NULL,
    policy INTEGER,
    display INTEGER,
    analyzed INTEGER NOT NULL DEFAULT 0,
    implementation_valid INTEGER NOT NULL DEFAULT 0,
    policy_valid INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (filename, filepath)
) STRICT;
"#;
