//! Input file validation

use crate::conversion::ConversionSettings;
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::formats::{Category, Format};
use std::path::Path;

/// Check that a file exists, has a registered extension and can be decoded.
///
/// Text files are parsed with the loader for their format; images are fully
/// decoded. Returns the detected format.
pub fn validate_file(path: &Path, settings: &ConversionSettings) -> ConversionResult<Format> {
    if !path.is_file() {
        return Err(invalid(path, "file does not exist".to_string()));
    }

    let format = Format::from_path(path)
        .ok_or_else(|| invalid(path, "unsupported file extension".to_string()))?;

    let checked = match format.category() {
        Category::Text => crate::parser::load_text_file(path, format, settings).map(|_| ()),
        Category::Image => crate::parser::check_source_size(path, settings.max_input_bytes)
            .and_then(|_| crate::raster::open_image(path))
            .map(|_| ()),
    };

    checked.map_err(|err| {
        ConversionError::conversion_with_source(
            ConversionErrorKind::validation(err.user_message(), Some(path.to_path_buf())),
            anyhow::Error::new(err),
        )
    })?;

    Ok(format)
}

/// Split paths into valid files (with their format) and rejected ones
pub fn partition_valid(
    paths: &[impl AsRef<Path>],
    settings: &ConversionSettings,
) -> (Vec<(Format, std::path::PathBuf)>, Vec<ConversionError>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match validate_file(path, settings) {
            Ok(format) => {
                tracing::info!(path = %path.display(), "file successfully loaded");
                valid.push((format, path.to_path_buf()));
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err.user_message(), "skipping invalid file");
                rejected.push(err);
            }
        }
    }

    (valid, rejected)
}

fn invalid(path: &Path, message: String) -> ConversionError {
    ConversionError::conversion(ConversionErrorKind::validation(
        message,
        Some(path.to_path_buf()),
    ))
}
