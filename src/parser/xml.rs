//! XML loader
//!
//! Elements map onto the tree as follows:
//! - an element without child elements becomes a scalar holding its text;
//! - an element whose children are all `<item>` becomes a sequence;
//! - any other element becomes a mapping keyed by child tag. Siblings that
//!   share a tag are gathered into a sequence under that key, in document
//!   order, so no sibling is dropped.
//!
//! A `type="list"` or `type="map"` attribute forces an element to load as
//! a sequence or a mapping. The XML writer sets it on empty containers and
//! on mappings whose only key is `item`, which would otherwise read back as
//! a scalar or a sequence. Other attributes, comments and processing
//! instructions are ignored. The document element itself is not part of
//! the result: `<root><a>1</a></root>` loads as `{"a": "1"}`.

use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::parser::offset_to_location;
use crate::tree::{Mapping, TreeValue};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Tag name that marks sequence entries, shared with the XML formatter
pub const ITEM_TAG: &str = "item";

/// Attribute that pins the shape of a container element
pub const TYPE_ATTR: &str = "type";
pub const LIST_TYPE: &str = "list";
pub const MAP_TYPE: &str = "map";

/// Parse an XML document into a tree
pub fn parse_xml(content: &str, max_depth: usize) -> ConversionResult<TreeValue> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(false);

    let mut builder = TreeBuilder::new(max_depth);

    loop {
        let position = reader.buffer_position();
        let result = match reader.read_event() {
            Ok(Event::Start(e)) => open_element(&mut builder, &e),
            Ok(Event::Empty(e)) => {
                open_element(&mut builder, &e).and_then(|_| builder.close())
            }
            Ok(Event::End(_)) => builder.close(),
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(text) => builder.text(&text),
                Err(err) => Err(BuildError::Malformed(err.to_string())),
            },
            Ok(Event::CData(e)) => builder.text(&String::from_utf8_lossy(&e)),
            Ok(Event::Eof) => break,
            Ok(_) => Ok(()),
            Err(err) => Err(BuildError::Malformed(err.to_string())),
        };

        if let Err(err) = result {
            return Err(err.into_error(max_depth, Some(offset_to_location(content, position))));
        }
    }

    builder.finish().map_err(|err| err.into_error(max_depth, None))
}

fn open_element(builder: &mut TreeBuilder, start: &BytesStart<'_>) -> Result<(), BuildError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut shape = Shape::Inferred;

    for attr in start.attributes() {
        let attr = attr.map_err(|e| BuildError::Malformed(e.to_string()))?;
        if attr.key.as_ref() == TYPE_ATTR.as_bytes() {
            shape = match attr.value.as_ref() {
                v if v == LIST_TYPE.as_bytes() => Shape::List,
                v if v == MAP_TYPE.as_bytes() => Shape::Map,
                _ => Shape::Inferred,
            };
        }
    }

    builder.open(name, shape)
}

enum BuildError {
    Malformed(String),
    TooDeep,
}

impl BuildError {
    fn into_error(self, max_depth: usize, location: Option<(usize, usize)>) -> ConversionError {
        match self {
            BuildError::Malformed(message) => ConversionError::parse("XML", message, location),
            BuildError::TooDeep => ConversionError::conversion(ConversionErrorKind::NestingTooDeep {
                limit: max_depth,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Inferred,
    List,
    Map,
}

/// An element whose end tag has not been seen yet
struct OpenElement {
    name: String,
    shape: Shape,
    text: String,
    children: Vec<(String, TreeValue)>,
}

impl OpenElement {
    fn into_tree(self) -> TreeValue {
        match self.shape {
            Shape::List => {
                return TreeValue::Sequence(self.children.into_iter().map(|(_, v)| v).collect());
            }
            Shape::Map => return TreeValue::Mapping(group_children(self.children)),
            Shape::Inferred => {}
        }

        if self.children.is_empty() {
            return TreeValue::Scalar(self.text);
        }

        if self.children.iter().all(|(name, _)| name == ITEM_TAG) {
            return TreeValue::Sequence(self.children.into_iter().map(|(_, v)| v).collect());
        }

        TreeValue::Mapping(group_children(self.children))
    }
}

fn group_children(children: Vec<(String, TreeValue)>) -> Mapping {
    let mut grouped: IndexMap<String, Vec<TreeValue>> = IndexMap::new();
    for (name, value) in children {
        grouped.entry(name).or_default().push(value);
    }

    grouped
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                TreeValue::Sequence(values)
            };
            (name, value)
        })
        .collect()
}

struct TreeBuilder {
    stack: Vec<OpenElement>,
    root: Option<TreeValue>,
    max_depth: usize,
}

impl TreeBuilder {
    fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            max_depth,
        }
    }

    /// Every open element above the new one is a container level of the
    /// result, so the stack length bounds the tree depth from below.
    fn open(&mut self, name: String, shape: Shape) -> Result<(), BuildError> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(BuildError::Malformed(format!(
                "unexpected second root element <{}>",
                name
            )));
        }
        if self.stack.len() > self.max_depth {
            return Err(BuildError::TooDeep);
        }
        self.stack.push(OpenElement {
            name,
            shape,
            text: String::new(),
            children: Vec::new(),
        });
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), BuildError> {
        match self.stack.last_mut() {
            Some(element) => {
                element.text.push_str(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(BuildError::Malformed(
                "text outside of the root element".to_string(),
            )),
        }
    }

    fn close(&mut self) -> Result<(), BuildError> {
        let element = self.stack.pop().ok_or_else(|| {
            BuildError::Malformed("closing tag without matching opening tag".to_string())
        })?;

        match self.stack.last_mut() {
            Some(parent) => {
                let name = element.name.clone();
                parent.children.push((name, element.into_tree()));
            }
            None => self.root = Some(element.into_tree()),
        }
        Ok(())
    }

    fn finish(self) -> Result<TreeValue, BuildError> {
        if let Some(open) = self.stack.last() {
            return Err(BuildError::Malformed(format!("unclosed element <{}>", open.name)));
        }
        self.root
            .ok_or_else(|| BuildError::Malformed("document has no root element".to_string()))
    }
}
