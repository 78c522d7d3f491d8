//! Configuration options for file conversion

use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted JSON indent width
pub const MAX_JSON_INDENT: usize = 16;

/// Per-job conversion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Field separator for CSV input and output
    pub csv_separator: char,
    /// Name of the document element written for XML output
    pub xml_root_tag: String,
    /// Spaces per JSON indentation level; 0 writes compact JSON
    pub json_indent: usize,
    /// Sources larger than this are rejected before they are read
    pub max_input_bytes: u64,
    /// Maximum nesting depth of a loaded tree
    pub max_depth: usize,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            csv_separator: ',',
            xml_root_tag: "root".to_string(),
            json_indent: 2,
            max_input_bytes: 100 * 1024 * 1024, // 100MB
            max_depth: 1000,
        }
    }
}

impl ConversionSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> ConversionResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConversionError::io(e, path))?;
        let settings: Self = serde_json::from_str(&content).map_err(|e| {
            ConversionError::parse(
                "JSON",
                format!("invalid settings file {}: {}", path.display(), e),
                Some((e.line(), e.column())),
            )
        })?;
        settings.validate().map_err(config_error)?;
        Ok(settings)
    }

    pub fn with_csv_separator(mut self, separator: char) -> Self {
        self.csv_separator = separator;
        self
    }

    pub fn with_xml_root_tag(mut self, tag: impl Into<String>) -> Self {
        self.xml_root_tag = tag.into();
        self
    }

    /// Set JSON indentation
    pub fn with_json_indent(mut self, indent: usize) -> Result<Self, String> {
        if indent > MAX_JSON_INDENT {
            return Err(format!("JSON indent must be 0-{} spaces", MAX_JSON_INDENT));
        }
        self.json_indent = indent;
        Ok(self)
    }

    pub fn with_max_input_bytes(mut self, limit: u64) -> Self {
        self.max_input_bytes = limit;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// CSV separator as the single byte the CSV codec expects
    pub fn csv_delimiter(&self) -> u8 {
        // validate() guarantees an ASCII separator
        if self.csv_separator.is_ascii() {
            self.csv_separator as u8
        } else {
            b','
        }
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        let sep = self.csv_separator;
        if !sep.is_ascii() || matches!(sep, '"' | '\r' | '\n') {
            return Err(format!("Invalid CSV separator {:?}", sep));
        }

        if !crate::formatter::xml::is_valid_name(&self.xml_root_tag) {
            return Err(format!(
                "XML root tag '{}' is not a valid element name",
                self.xml_root_tag
            ));
        }

        if self.json_indent > MAX_JSON_INDENT {
            return Err(format!("JSON indent must be 0-{} spaces", MAX_JSON_INDENT));
        }

        if self.max_input_bytes == 0 {
            return Err("Input size limit must be greater than 0".to_string());
        }

        if self.max_depth == 0 {
            return Err("Max depth must be at least 1".to_string());
        }

        Ok(())
    }
}

fn config_error(message: String) -> ConversionError {
    ConversionError::conversion(ConversionErrorKind::configuration(message))
}
