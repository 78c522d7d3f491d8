//! XML writer
//!
//! The tree is written under a single document element. Mapping entries
//! become child elements named after their key, sequence entries become
//! `<item>` elements and scalars become element text. Empty containers and
//! mappings whose only key is `item` carry a `type` attribute so they load
//! back with the same shape. Output is compact, without an XML declaration.

use crate::error::{ConversionError, ConversionResult};
use crate::parser::xml::{ITEM_TAG, LIST_TYPE, MAP_TYPE, TYPE_ATTR};
use crate::tree::TreeValue;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

/// Serialize a tree as XML under `root_tag`
pub fn format_xml(tree: &TreeValue, root_tag: &str) -> ConversionResult<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, &element_name(root_tag), tree)
        .map_err(|e| ConversionError::other(anyhow::Error::new(e).context("failed to write XML")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ConversionError::other(e.into()))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &TreeValue,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(name);
    if let Some(shape) = shape_marker(value) {
        start.push_attribute((TYPE_ATTR, shape));
    }

    let is_empty = match value {
        TreeValue::Scalar(text) => text.is_empty(),
        TreeValue::Sequence(items) => items.is_empty(),
        TreeValue::Mapping(map) => map.is_empty(),
    };
    if is_empty {
        return writer.write_event(Event::Empty(start));
    }

    writer.write_event(Event::Start(start))?;
    match value {
        TreeValue::Scalar(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        TreeValue::Sequence(items) => {
            for item in items {
                write_element(writer, ITEM_TAG, item)?;
            }
        }
        TreeValue::Mapping(map) => {
            for (key, child) in map {
                write_element(writer, &element_name(key), child)?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name)))
}

/// Containers whose shape the loader could not infer from their children
fn shape_marker(value: &TreeValue) -> Option<&'static str> {
    match value {
        TreeValue::Scalar(_) => None,
        TreeValue::Sequence(items) if items.is_empty() => Some(LIST_TYPE),
        TreeValue::Sequence(_) => None,
        TreeValue::Mapping(map) => map
            .keys()
            .all(|key| element_name(key) == ITEM_TAG)
            .then_some(MAP_TYPE),
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Whether `name` can be used as an element name as-is
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => is_name_start(first) && chars.all(is_name_char),
        None => false,
    }
}

/// Turn a mapping key into a usable element name.
///
/// Invalid characters become `_`, and a name that does not start with a
/// letter or `_` gets a `_` prefix.
pub fn element_name(key: &str) -> Cow<'_, str> {
    if is_valid_name(key) {
        return Cow::Borrowed(key);
    }

    let mut name = String::with_capacity(key.len() + 1);
    if !key.chars().next().is_some_and(is_name_start) {
        name.push('_');
    }
    name.extend(key.chars().map(|c| if is_name_char(c) { c } else { '_' }));
    Cow::Owned(name)
}
