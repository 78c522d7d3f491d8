//! CSV writer for tabular trees

use crate::error::{ConversionError, ConversionResult};
use crate::tree::TreeValue;
use csv::{Terminator, WriterBuilder};
use indexmap::IndexSet;

/// Write a sequence of flat mappings as CSV.
///
/// The header is the union of all row keys in first-seen order; a row
/// missing a column gets an empty field. Anything that is not a sequence
/// of mappings of scalars is rejected.
pub fn format_csv(tree: &TreeValue, delimiter: u8) -> ConversionResult<String> {
    let rows = tree.as_sequence().ok_or_else(|| {
        ConversionError::shape(format!(
            "CSV output needs a sequence of records, found a {}",
            tree.kind_name()
        ))
    })?;

    let mut columns: IndexSet<&str> = IndexSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let record = row.as_mapping().ok_or_else(|| {
            ConversionError::shape(format!(
                "row {} is a {}, expected a mapping",
                index + 1,
                row.kind_name()
            ))
        })?;

        for (key, value) in record {
            if value.as_scalar().is_none() {
                return Err(ConversionError::shape(format!(
                    "row {}, column '{}' holds a nested {}",
                    index + 1,
                    key,
                    value.kind_name()
                )));
            }
            columns.insert(key.as_str());
        }
        records.push(record);
    }

    if records.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&columns).map_err(write_error)?;
    for record in records {
        let fields = columns
            .iter()
            .map(|column| record.get(*column).and_then(TreeValue::as_scalar).unwrap_or(""));
        writer.write_record(fields).map_err(write_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| {
        ConversionError::other(anyhow::anyhow!("failed to flush CSV output: {}", e.error()))
    })?;
    String::from_utf8(bytes).map_err(|e| ConversionError::other(e.into()))
}

fn write_error(err: csv::Error) -> ConversionError {
    ConversionError::other(anyhow::Error::new(err).context("failed to write CSV"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_uniform_rows() {
        let tree = TreeValue::from_json(&json!([
            {"name": "Ada", "age": "36"},
            {"name": "Alan", "age": "41"}
        ]));
        assert_eq!(format_csv(&tree, b',').unwrap(), "name,age\nAda,36\nAlan,41\n");
    }

    #[test]
    fn test_union_of_columns() {
        let tree = TreeValue::from_json(&json!([{"a": "1"}, {"b": "2", "a": "3"}]));
        assert_eq!(format_csv(&tree, b',').unwrap(), "a,b\n1,\n3,2\n");
    }

    #[test]
    fn test_quotes_fields_with_delimiter() {
        let tree = TreeValue::from_json(&json!([{"text": "a,b", "q": "say \"hi\""}]));
        assert_eq!(
            format_csv(&tree, b',').unwrap(),
            "text,q\n\"a,b\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(format_csv(&TreeValue::Sequence(vec![]), b',').unwrap(), "");
    }

    #[test]
    fn test_non_tabular_shapes() {
        let scalar = TreeValue::scalar("hello");
        assert_eq!(format_csv(&scalar, b',').unwrap_err().category(), "ShapeError");

        let mapping = TreeValue::from_json(&json!({"a": "1"}));
        assert_eq!(format_csv(&mapping, b',').unwrap_err().category(), "ShapeError");

        let nested = TreeValue::from_json(&json!([{"a": {"b": "1"}}]));
        assert_eq!(format_csv(&nested, b',').unwrap_err().category(), "ShapeError");

        let mixed = TreeValue::from_json(&json!([{"a": "1"}, "loose"]));
        assert_eq!(format_csv(&mixed, b',').unwrap_err().category(), "ShapeError");
    }
}
