//! Report output formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Serialization shape of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Xml,
    /// Single report kind, several files, one aggregate XML container.
    MaXml,
    /// Several report kinds in one XML container.
    MultiXml,
    Text,
    Html,
    JsTree,
}

impl Format {
    /// Number of formats.
    pub const COUNT: usize = 6;

    pub const ALL: [Format; Self::COUNT] = [
        Format::Xml,
        Format::MaXml,
        Format::MultiXml,
        Format::Text,
        Format::Html,
        Format::JsTree,
    ];

    /// Stored tag of the format.
    pub const fn index(self) -> usize {
        match self {
            Format::Xml => 0,
            Format::MaXml => 1,
            Format::MultiXml => 2,
            Format::Text => 3,
            Format::Html => 4,
            Format::JsTree => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name used by front ends (`"XML"`, `"MAXML"`, ...).
    /// `MultiXml` has no display of its own and shares `"XML"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Format::Xml | Format::MultiXml => "XML",
            Format::MaXml => "MAXML",
            Format::Text => "TEXT",
            Format::Html => "HTML",
            Format::JsTree => "JSTREE",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "XML" => Ok(Format::Xml),
            "MAXML" => Ok(Format::MaXml),
            "MULTIXML" => Ok(Format::MultiXml),
            "TEXT" => Ok(Format::Text),
            "HTML" => Ok(Format::Html),
            "JSTREE" => Ok(Format::JsTree),
            other => Err(format!("unknown format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_parse_back() {
        for name in ["XML", "MAXML", "TEXT", "HTML", "JSTREE"] {
            let format: Format = name.parse().unwrap();
            assert_eq!(format.display_name(), name);
        }
        assert!("PDF".parse::<Format>().is_err());
    }
}
