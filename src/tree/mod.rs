//! Tree value: the intermediate representation shared by all text formats
//!
//! Every text loader produces a [`TreeValue`] and every text formatter
//! consumes one. Leaves are always strings; numbers and booleans read from
//! JSON are stringified on the way in.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;

/// Ordered mapping from key to value. Keys are unique by construction.
pub type Mapping = IndexMap<String, TreeValue>;

/// Recursive scalar / sequence / mapping value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeValue {
    Scalar(String),
    Sequence(Vec<TreeValue>),
    Mapping(Mapping),
}

impl TreeValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        TreeValue::Scalar(value.into())
    }

    pub fn empty_mapping() -> Self {
        TreeValue::Mapping(Mapping::new())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            TreeValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[TreeValue]> {
        match self {
            TreeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            TreeValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            TreeValue::Scalar(_) => "scalar",
            TreeValue::Sequence(_) => "sequence",
            TreeValue::Mapping(_) => "mapping",
        }
    }

    /// Nesting depth; a scalar has depth 0
    pub fn depth(&self) -> usize {
        match self {
            TreeValue::Scalar(_) => 0,
            TreeValue::Sequence(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
            TreeValue::Mapping(map) => 1 + map.values().map(Self::depth).max().unwrap_or(0),
        }
    }

    /// True for a sequence whose items are all mappings of scalars
    pub fn is_tabular(&self) -> bool {
        match self {
            TreeValue::Sequence(rows) => rows.iter().all(|row| {
                row.as_mapping()
                    .is_some_and(|map| map.values().all(|v| v.as_scalar().is_some()))
            }),
            _ => false,
        }
    }

    /// Build a tree from a JSON value. Primitives become their text form;
    /// `null` becomes the empty string.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => TreeValue::Scalar(String::new()),
            Value::Bool(b) => TreeValue::Scalar(b.to_string()),
            Value::Number(n) => TreeValue::Scalar(n.to_string()),
            Value::String(s) => TreeValue::Scalar(s.clone()),
            Value::Array(items) => TreeValue::Sequence(items.iter().map(Self::from_json).collect()),
            Value::Object(obj) => TreeValue::Mapping(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// JSON form of the tree; every scalar becomes a JSON string
    pub fn to_json(&self) -> Value {
        match self {
            TreeValue::Scalar(s) => Value::String(s.clone()),
            TreeValue::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            TreeValue::Mapping(map) => {
                let mut obj = Map::with_capacity(map.len());
                for (k, v) in map {
                    obj.insert(k.clone(), v.to_json());
                }
                Value::Object(obj)
            }
        }
    }
}

impl From<&str> for TreeValue {
    fn from(value: &str) -> Self {
        TreeValue::Scalar(value.to_string())
    }
}

impl From<String> for TreeValue {
    fn from(value: String) -> Self {
        TreeValue::Scalar(value)
    }
}

impl From<Vec<TreeValue>> for TreeValue {
    fn from(items: Vec<TreeValue>) -> Self {
        TreeValue::Sequence(items)
    }
}

impl From<Mapping> for TreeValue {
    fn from(map: Mapping) -> Self {
        TreeValue::Mapping(map)
    }
}

impl FromIterator<(String, TreeValue)> for TreeValue {
    fn from_iter<I: IntoIterator<Item = (String, TreeValue)>>(iter: I) -> Self {
        TreeValue::Mapping(iter.into_iter().collect())
    }
}

/// Scalars print verbatim; containers print as compact JSON
impl fmt::Display for TreeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeValue::Scalar(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_stringifies_primitives() {
        let tree = TreeValue::from_json(&json!({"n": 3, "ok": true, "none": null, "s": "x"}));
        let map = tree.as_mapping().unwrap();
        assert_eq!(map["n"], TreeValue::scalar("3"));
        assert_eq!(map["ok"], TreeValue::scalar("true"));
        assert_eq!(map["none"], TreeValue::scalar(""));
        assert_eq!(map["s"], TreeValue::scalar("x"));
    }

    #[test]
    fn test_key_order_preserved() {
        let tree = TreeValue::from_json(&json!({"zeta": "1", "alpha": "2", "mid": "3"}));
        let keys: Vec<&str> = tree.as_mapping().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_is_tabular() {
        let rows = TreeValue::from_json(&json!([{"a": "1"}, {"a": "2", "b": "3"}]));
        assert!(rows.is_tabular());

        let nested = TreeValue::from_json(&json!([{"a": {"b": "1"}}]));
        assert!(!nested.is_tabular());

        assert!(!TreeValue::scalar("x").is_tabular());
    }

    #[test]
    fn test_depth() {
        assert_eq!(TreeValue::scalar("x").depth(), 0);
        let tree = TreeValue::from_json(&json!({"a": [{"b": "c"}]}));
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(TreeValue::scalar("plain text").to_string(), "plain text");
        let tree = TreeValue::from_json(&json!({"a": ["1", "2"]}));
        assert_eq!(tree.to_string(), r#"{"a":["1","2"]}"#);
    }
}
