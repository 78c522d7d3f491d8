//! JSON writer

use crate::error::{ConversionError, ConversionResult};
use crate::tree::TreeValue;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize a tree as JSON. `indent` spaces per level; 0 writes compact JSON.
pub fn format_json(tree: &TreeValue, indent: usize) -> ConversionResult<String> {
    let value = tree.to_json();

    if indent == 0 {
        return serde_json::to_string(&value).map_err(|e| ConversionError::other(e.into()));
    }

    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value
        .serialize(&mut serializer)
        .map_err(|e| ConversionError::other(e.into()))?;

    String::from_utf8(buf).map_err(|e| ConversionError::other(e.into()))
}
