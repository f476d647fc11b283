//! Report requests, results, and the cache dedup key.

use serde::{Deserialize, Serialize};

use super::{Format, ReportKind, ReportKinds};

/// Dedup key of a cached report: one live record per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub kind: ReportKind,
    pub format: Format,
    pub filename: String,
    /// Last-modification stamp of the file when the report was produced.
    pub last_modification: String,
}

impl CacheKey {
    pub fn new(
        kind: ReportKind,
        format: Format,
        filename: impl Into<String>,
        last_modification: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            format,
            filename: filename.into(),
            last_modification: last_modification.into(),
        }
    }
}

/// Post-processing transform applied to an XML report.
///
/// Either a named built-in display (`"JSTREE"`, `"HTML"`, ...) or an inline
/// stylesheet, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl Display {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: None,
        }
    }

    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            name: None,
            content: Some(content.into()),
        }
    }

    /// True when neither a name nor a stylesheet is set, or both are blank.
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, str::is_empty)
            && self.content.as_deref().map_or(true, str::is_empty)
    }
}

/// A report generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub kinds: ReportKinds,
    pub format: Format,
    pub files: Vec<String>,
    /// Policies referenced by name (file path).
    pub policy_names: Vec<String>,
    /// Inline policy definitions.
    pub policy_contents: Vec<String>,
    pub display: Display,
}

impl ReportRequest {
    pub fn new(kinds: impl Into<ReportKinds>, format: Format, files: Vec<String>) -> Self {
        Self {
            kinds: kinds.into(),
            format,
            files,
            policy_names: Vec::new(),
            policy_contents: Vec::new(),
            display: Display::default(),
        }
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn with_policy_names(mut self, names: Vec<String>) -> Self {
        self.policy_names = names;
        self
    }

    pub fn with_policy_contents(mut self, contents: Vec<String>) -> Self {
        self.policy_contents = contents;
        self
    }
}

/// Uniform result of report and validation calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRes {
    pub report: String,
    /// Whether `valid` carries a verdict.
    pub has_valid: bool,
    pub valid: bool,
}

impl ReportRes {
    pub fn with_report(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            ..Default::default()
        }
    }

    pub fn with_verdict(report: impl Into<String>, valid: bool) -> Self {
        Self {
            report: report.into(),
            has_valid: true,
            valid,
        }
    }
}
