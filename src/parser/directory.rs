use crate::parser::filter::is_supported_file;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find files with a registered extension in a directory. If recursive is
/// true, use walkdir; otherwise list the directory itself. Results are sorted.
pub fn find_convertible_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir) {
            let entry = entry?;
            let path = entry.path();
            if is_supported_file(path) {
                files.push(path.to_path_buf());
            }
        }
    } else {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if is_supported_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Expand a list of user-supplied paths: files are kept as given, in
/// order, and directories are replaced by the convertible files they hold.
pub fn expand_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            files.extend(find_convertible_files(input, recursive)?);
        } else {
            files.push(input.clone());
        }
    }

    Ok(files)
}
