//! Text output: a [`TreeValue`] written as CSV, JSON, XML or plain text

pub mod csv;
pub mod json;
pub mod text;
pub mod xml;

use crate::conversion::ConversionSettings;
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::formats::Format;
use crate::tree::TreeValue;

/// Tree formatter bound to one set of settings
pub struct TreeFormatter<'a> {
    settings: &'a ConversionSettings,
}

impl<'a> TreeFormatter<'a> {
    /// Create a new formatter with settings
    pub fn new(settings: &'a ConversionSettings) -> Self {
        Self { settings }
    }

    /// Format a tree as the given text format
    pub fn format(&self, tree: &TreeValue, target: Format) -> ConversionResult<String> {
        match target {
            Format::Csv => self::csv::format_csv(tree, self.settings.csv_delimiter()),
            Format::Json => self::json::format_json(tree, self.settings.json_indent),
            Format::Xml => self::xml::format_xml(tree, &self.settings.xml_root_tag),
            Format::Txt => Ok(self::text::format_plain(tree)),
            Format::Jpg | Format::Jpeg | Format::Png | Format::Bmp | Format::Gif | Format::Tiff => {
                Err(ConversionError::conversion(ConversionErrorKind::validation(
                    format!("{} is not a text format", target.display_name()),
                    None,
                )))
            }
        }
    }
}

/// Format a tree as the given text format
pub fn format_tree(
    tree: &TreeValue,
    target: Format,
    settings: &ConversionSettings,
) -> ConversionResult<String> {
    TreeFormatter::new(settings).format(tree, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_uses_settings() {
        let settings = ConversionSettings::default()
            .with_csv_separator(';')
            .with_xml_root_tag("data")
            .with_json_indent(0)
            .unwrap();
        let tree = TreeValue::from_json(&json!([{"a": "1", "b": "2"}]));
        let formatter = TreeFormatter::new(&settings);

        assert_eq!(formatter.format(&tree, Format::Csv).unwrap(), "a;b\n1;2\n");
        assert_eq!(
            formatter.format(&tree, Format::Json).unwrap(),
            r#"[{"a":"1","b":"2"}]"#
        );
        assert_eq!(
            formatter.format(&tree, Format::Xml).unwrap(),
            "<data><item><a>1</a><b>2</b></item></data>"
        );
        assert!(formatter.format(&tree, Format::Gif).is_err());
    }
}
