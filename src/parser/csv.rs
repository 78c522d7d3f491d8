//! CSV loader: one mapping per row, keyed by the header line

use crate::error::{ConversionError, ConversionResult};
use crate::tree::{Mapping, TreeValue};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;

/// Parse CSV text with a header row into a sequence of mappings.
///
/// Every data row must have as many fields as the header. Values stay
/// strings; an empty field is the empty string.
pub fn parse_csv(content: &str, delimiter: u8) -> ConversionResult<TreeValue> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let header = reader.headers().map_err(csv_error)?.clone();
    if header.is_empty() {
        return Err(ConversionError::parse(
            "CSV",
            "no columns to parse".to_string(),
            None,
        ));
    }

    let keys = column_keys(&header);
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let row: Mapping = keys
            .iter()
            .zip(record.iter())
            .map(|(key, field)| (key.clone(), TreeValue::scalar(field)))
            .collect();
        rows.push(TreeValue::Mapping(row));
    }

    Ok(TreeValue::Sequence(rows))
}

/// Turn header fields into unique mapping keys.
///
/// Blank headers are named after their column; repeats get `.1`, `.2`, ...
fn column_keys(header: &StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::with_capacity(header.len());

    for (index, name) in header.iter().enumerate() {
        let base = if name.is_empty() {
            format!("column{}", index + 1)
        } else {
            name.to_string()
        };

        let mut key = base.clone();
        let mut suffix = 1;
        while !seen.insert(key.clone()) {
            key = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        keys.push(key);
    }

    keys
}

fn csv_error(err: csv::Error) -> ConversionError {
    let location = err.position().map(|pos| (pos.line() as usize, 1));
    ConversionError::parse("CSV", err.to_string(), location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rows_become_mappings() {
        let tree = parse_csv("name,age\nAda,36\nAlan,41\n", b',').unwrap();
        let rows = tree.as_sequence().unwrap();
        assert_eq!(rows.len(), 2);

        let first = rows[0].as_mapping().unwrap();
        assert_eq!(first["name"], TreeValue::scalar("Ada"));
        assert_eq!(first["age"], TreeValue::scalar("36"));
        let keys: Vec<&String> = first.keys().collect();
        assert_eq!(keys, vec!["name", "age"]);
    }

    #[test]
    fn test_custom_delimiter_and_quoting() {
        let tree = parse_csv("a;b\n\"x;y\";2\n", b';').unwrap();
        let row = tree.as_sequence().unwrap()[0].as_mapping().unwrap();
        assert_eq!(row["a"], TreeValue::scalar("x;y"));
    }

    #[test]
    fn test_header_only_is_empty_sequence() {
        let tree = parse_csv("a,b\n", b',').unwrap();
        assert_eq!(tree, TreeValue::Sequence(vec![]));
    }

    #[test]
    fn test_inconsistent_columns_fail() {
        let err = parse_csv("a,b\n1,2,3\n", b',').unwrap_err();
        assert_eq!(err.category(), "ParseError");
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(parse_csv("", b',').is_err());
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let tree = parse_csv("id,id,,id\n1,2,3,4\n", b',').unwrap();
        let row = tree.as_sequence().unwrap()[0].as_mapping().unwrap();
        let keys: Vec<&str> = row.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "id.1", "column3", "id.2"]);
        assert_eq!(row["id.2"], TreeValue::scalar("4"));
    }
}
