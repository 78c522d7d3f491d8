//! Text loading: CSV, JSON, XML and plain text into a [`TreeValue`]
//!
//! Also holds input discovery and validation, which need the same loaders.

pub mod csv;
pub mod directory;
pub mod filter;
pub mod json;
pub mod text;
pub mod validation;
pub mod xml;

use crate::conversion::ConversionSettings;
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::formats::Format;
use crate::tree::TreeValue;
use std::path::Path;

/// Parse text content of the given format into a tree
pub fn parse_text(
    content: &str,
    format: Format,
    settings: &ConversionSettings,
) -> ConversionResult<TreeValue> {
    let tree = match format {
        Format::Csv => self::csv::parse_csv(content, settings.csv_delimiter())?,
        Format::Json => self::json::parse_json(content)?,
        Format::Xml => self::xml::parse_xml(content, settings.max_depth)?,
        Format::Txt => self::text::parse_plain(content),
        Format::Jpg | Format::Jpeg | Format::Png | Format::Bmp | Format::Gif | Format::Tiff => {
            return Err(not_text(format));
        }
    };

    check_depth(&tree, settings.max_depth)?;
    tracing::debug!(format = %format, shape = tree.kind_name(), "parsed text input");
    Ok(tree)
}

/// Read and parse a text file
pub fn load_text_file(
    path: &Path,
    format: Format,
    settings: &ConversionSettings,
) -> ConversionResult<TreeValue> {
    let content = read_text_file(path, settings)?;
    parse_text(&content, format, settings)
}

/// Read a text file as UTF-8, enforcing the configured size limit
pub fn read_text_file(path: &Path, settings: &ConversionSettings) -> ConversionResult<String> {
    check_source_size(path, settings.max_input_bytes)?;

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            ConversionError::conversion(ConversionErrorKind::validation(
                "file is not valid UTF-8 text".to_string(),
                Some(path.to_path_buf()),
            ))
        } else {
            ConversionError::io(e, path)
        }
    })?;

    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Check the source size before attempting to read it
pub fn check_source_size(path: &Path, limit: u64) -> ConversionResult<()> {
    let metadata = std::fs::metadata(path).map_err(|e| ConversionError::io(e, path))?;

    if metadata.len() > limit {
        return Err(ConversionError::conversion(
            ConversionErrorKind::InputTooLarge {
                size: metadata.len(),
                limit,
            },
        ));
    }

    Ok(())
}

fn check_depth(tree: &TreeValue, limit: usize) -> ConversionResult<()> {
    if tree.depth() > limit {
        return Err(ConversionError::conversion(
            ConversionErrorKind::NestingTooDeep { limit },
        ));
    }
    Ok(())
}

fn not_text(format: Format) -> ConversionError {
    ConversionError::conversion(ConversionErrorKind::validation(
        format!("{} is not a text format", format.display_name()),
        None,
    ))
}

/// Translate a byte offset into a 1-based (line, column) pair
pub(crate) fn offset_to_location(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = &content.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before.iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_text_dispatch() {
        let settings = ConversionSettings::default();
        let tree = parse_text("a,b\n1,2\n", Format::Csv, &settings).unwrap();
        assert!(tree.is_tabular());

        let tree = parse_text("hello", Format::Txt, &settings).unwrap();
        assert_eq!(tree, TreeValue::scalar("hello"));

        assert!(parse_text("x", Format::Png, &settings).is_err());
    }

    #[test]
    fn test_load_respects_size_limit() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(&vec![b'a'; 2048]).unwrap();

        let settings = ConversionSettings::default().with_max_input_bytes(1024);
        let err = load_text_file(tmp.path(), Format::Txt, &settings).unwrap_err();
        assert!(matches!(
            err.kind(),
            Some(ConversionErrorKind::InputTooLarge { size: 2048, limit: 1024 })
        ));
    }

    #[test]
    fn test_read_strips_bom() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all("\u{feff}name\nAda\n".as_bytes()).unwrap();

        let content = read_text_file(tmp.path(), &ConversionSettings::default()).unwrap();
        assert!(content.starts_with("name"));
    }

    #[test]
    fn test_non_utf8_is_validation_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = read_text_file(tmp.path(), &ConversionSettings::default()).unwrap_err();
        assert_eq!(err.category(), "ValidationError");
    }

    #[test]
    fn test_depth_limit() {
        let settings = ConversionSettings::default().with_max_depth(2);
        let err = parse_text(r#"{"a": {"b": {"c": "d"}}}"#, Format::Json, &settings).unwrap_err();
        assert!(matches!(
            err.kind(),
            Some(ConversionErrorKind::NestingTooDeep { limit: 2 })
        ));
    }

    #[test]
    fn test_offset_to_location() {
        let content = "ab\ncd\nef";
        assert_eq!(offset_to_location(content, 0), (1, 1));
        assert_eq!(offset_to_location(content, 4), (2, 2));
        assert_eq!(offset_to_location(content, 100), (3, 3));
    }
}
