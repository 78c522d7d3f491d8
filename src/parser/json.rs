//! JSON loader

use crate::error::{ConversionError, ConversionResult};
use crate::tree::TreeValue;
use serde_json::Value;

/// Parse a JSON document into a tree
pub fn parse_json(content: &str) -> ConversionResult<TreeValue> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::parse(
            "JSON",
            "empty document".to_string(),
            None,
        ));
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| {
        ConversionError::parse("JSON", format!("invalid JSON: {}", e), location(&e))
    })?;

    Ok(TreeValue::from_json(&value))
}

fn location(error: &serde_json::Error) -> Option<(usize, usize)> {
    match (error.line(), error.column()) {
        (0, _) => None,
        (line, column) => Some((line, column)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_object() {
        let tree = parse_json(r#"{"name": "test", "value": 42}"#).unwrap();
        let map = tree.as_mapping().unwrap();
        assert_eq!(map["value"], TreeValue::scalar("42"));
    }

    #[test]
    fn test_parse_scalar_document() {
        assert_eq!(parse_json("\"hi\"").unwrap(), TreeValue::scalar("hi"));
    }

    #[test]
    fn test_invalid_json_has_location() {
        let err = parse_json("{\n  \"name\": }").unwrap_err();
        assert_matches!(err, ConversionError::ParseError(ref p) if p.location.map(|l| l.0) == Some(2));
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_json("   ").is_err());
    }
}
