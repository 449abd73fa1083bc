//! Output formats for parsed templates
//!
//!     Every format renders the [snapshot](crate::haml::ast::snapshot) of the tree, never the
//!     arena directly:
//!
//!     - `json`: the snapshot as JSON, compact or pretty
//!     - `yaml`: the snapshot as YAML
//!     - `treeviz`: one line per node, see [`treeviz`]

pub mod treeviz;

use crate::haml::ast::{snapshot, Ast};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub use treeviz::{to_treeviz_str, to_treeviz_str_with_linum};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Unknown format name
    FormatNotFound(String),
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
    Treeviz,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Yaml, Format::Treeviz];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Treeviz => "treeviz",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FormatError::FormatNotFound(s.to_string()))
    }
}

/// Rendering switches shared by all formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Pretty-print json
    pub pretty: bool,
    /// Prefix treeviz lines with their line number
    pub show_line_numbers: bool,
}

/// Serialize `ast` in the given format
pub fn serialize(ast: &Ast, format: Format, options: RenderOptions) -> Result<String, FormatError> {
    match format {
        Format::Json => {
            let value = snapshot(ast);
            let rendered = if options.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };
            rendered.map_err(|e| FormatError::SerializationError(e.to_string()))
        }
        Format::Yaml => serde_yaml::to_string(&snapshot(ast))
            .map_err(|e| FormatError::SerializationError(e.to_string())),
        Format::Treeviz => Ok(if options.show_line_numbers {
            to_treeviz_str_with_linum(ast)
        } else {
            to_treeviz_str(ast)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haml::parsing::parse;

    #[test]
    fn test_format_names() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("YAML".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("treeviz".parse::<Format>().unwrap(), Format::Treeviz);
        assert_eq!(
            "xml".parse::<Format>().unwrap_err(),
            FormatError::FormatNotFound("xml".to_string())
        );
    }

    #[test]
    fn test_json_round_trips_to_snapshot() {
        let ast = parse("%p hello").unwrap();
        let json = serialize(&ast, Format::Json, RenderOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, snapshot(&ast));
    }

    #[test]
    fn test_yaml_output() {
        let ast = parse("!!! 5").unwrap();
        let yaml = serialize(&ast, Format::Yaml, RenderOptions::default()).unwrap();
        assert!(yaml.contains("type: doctype"));
        let value: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value, snapshot(&ast));
    }
}
