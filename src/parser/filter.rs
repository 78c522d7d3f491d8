use crate::formats::Format;
use std::path::Path;

/// Return true if the path is an existing file with a registered extension
pub fn is_supported_file(path: &Path) -> bool {
    path.is_file() && Format::from_path(path).is_some()
}
