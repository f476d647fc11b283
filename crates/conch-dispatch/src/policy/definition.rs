//! A single policy definition.

use std::path::{Path, PathBuf};

use conch_core::errors::PolicyError;

use super::xml;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A conformance policy: a titled XML rule set, optionally tied to the file
/// it was imported from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    title: String,
    source: Option<PathBuf>,
    schema: String,
}

impl Policy {
    /// Build a policy from already-validated parts.
    pub fn new(title: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: None,
            schema: schema.into(),
        }
    }

    /// Parse a definition holding exactly one policy.
    pub fn from_xml(xml: &str, label: &str) -> Result<Self, PolicyError> {
        let mut policies = xml::parse_policies(xml, label)?;
        match policies.len() {
            1 => Ok(policies.remove(0)),
            n => Err(PolicyError::Import {
                message: format!("{label}: expected one policy, found {n}"),
            }),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// File the policy was imported from or last exported to.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub(crate) fn set_source(&mut self, source: Option<PathBuf>) {
        self.source = source;
    }

    /// The raw XML definition.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn set_schema(&mut self, schema: impl Into<String>) {
        self.schema = schema.into();
    }

    /// Serialized form sent to the daemon and written on export.
    pub fn dump_schema(&self) -> String {
        self.schema.clone()
    }

    /// File name used when exporting into the policies directory.
    pub fn export_file_name(&self) -> String {
        format!("{}.xml", self.export_stem())
    }

    /// Title reduced to `[A-Za-z0-9_-]`, `policy` when nothing is left.
    pub(crate) fn export_stem(&self) -> String {
        let stem: String = self
            .title
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            "policy".to_string()
        } else {
            stem
        }
    }

    /// Standalone XML document written on export: an XML declaration
    /// followed by the definition. Anything the source file held outside
    /// the policy element is not kept.
    pub fn export_document(&self) -> String {
        let schema = self.schema.trim_start();
        if schema.starts_with("<?xml") {
            schema.to_string()
        } else {
            format!("{XML_DECLARATION}\n{schema}\n")
        }
    }
}
