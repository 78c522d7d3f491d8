use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::formats::Format;
use std::path::{Path, PathBuf};

/// Result of converting one file, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertedOutput {
    Text(String),
    Image(Vec<u8>),
}

impl ConvertedOutput {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ConvertedOutput::Text(text) => text.as_bytes(),
            ConvertedOutput::Image(bytes) => bytes,
        }
    }

    /// Get the length of the output in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Map an input file to `{output_dir}/{basename}.{target extension}`
pub fn output_path(input_file: &Path, output_dir: &Path, target: Format) -> ConversionResult<PathBuf> {
    let stem = input_file.file_stem().ok_or_else(|| {
        ConversionError::conversion(ConversionErrorKind::validation(
            "input path has no file name".to_string(),
            Some(input_file.to_path_buf()),
        ))
    })?;

    let mut name = stem.to_os_string();
    name.push(".");
    name.push(target.extension());
    Ok(output_dir.join(name))
}

/// Write converted output, creating parent directories as needed
pub fn write_output(output: &ConvertedOutput, path: &Path) -> ConversionResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConversionError::io(e, parent))?;
    }
    std::fs::write(path, output.as_bytes()).map_err(|e| ConversionError::io(e, path))
}
