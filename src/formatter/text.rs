use crate::tree::TreeValue;

/// Scalars are written verbatim, containers as compact JSON
pub fn format_plain(tree: &TreeValue) -> String {
    tree.to_string()
}
