use crate::tree::TreeValue;

/// Plain text loads verbatim as a single scalar
pub fn parse_plain(content: &str) -> TreeValue {
    TreeValue::Scalar(content.to_string())
}
