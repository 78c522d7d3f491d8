//! Core conversion engine: one file, one target format

use crate::conversion::config::ConversionSettings;
use crate::conversion::output::{output_path, write_output, ConvertedOutput};
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::formats::{Category, Format};
use crate::formatter::format_tree;
use crate::parser;
use crate::raster;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Main conversion engine
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    settings: ConversionSettings,
}

impl ConversionEngine {
    /// Create a new conversion engine
    pub fn new(settings: ConversionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Convert text content between two text formats
    pub fn convert_text(&self, content: &str, source: Format, target: Format) -> ConversionResult<String> {
        ensure_convertible(source, target)?;
        let tree = parser::parse_text(content, source, &self.settings)?;
        format_tree(&tree, target, &self.settings)
    }

    /// Convert a file to the target format without writing anything
    pub fn convert_file(&self, path: &Path, target: Format) -> ConversionResult<ConvertedOutput> {
        let source = source_format(path)?;
        ensure_convertible(source, target)?;

        match source.category() {
            Category::Text => {
                let tree = parser::load_text_file(path, source, &self.settings)?;
                format_tree(&tree, target, &self.settings).map(ConvertedOutput::Text)
            }
            Category::Image => {
                parser::check_source_size(path, self.settings.max_input_bytes)?;
                raster::recode(path, target).map(ConvertedOutput::Image)
            }
        }
    }

    /// Convert a file and write it into `output_dir`. Returns the output path.
    pub fn convert_and_write(&self, path: &Path, target: Format, output_dir: &Path) -> ConversionResult<PathBuf> {
        let start_time = Instant::now();
        let destination = output_path(path, output_dir, target)?;

        let output = self.convert_file(path, target)?;
        write_output(&output, &destination)?;

        tracing::info!(
            source = %path.display(),
            output = %destination.display(),
            bytes = output.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "converted file"
        );
        Ok(destination)
    }
}

/// Detect a file's format from its extension
pub fn source_format(path: &Path) -> ConversionResult<Format> {
    Format::from_path(path).ok_or_else(|| {
        ConversionError::conversion(ConversionErrorKind::validation(
            "unsupported file extension".to_string(),
            Some(path.to_path_buf()),
        ))
    })
}

/// Reject pairs that are not in the capability map
pub fn ensure_convertible(source: Format, target: Format) -> ConversionResult<()> {
    if source.can_convert_to(target) {
        Ok(())
    } else {
        Err(ConversionError::conversion(
            ConversionErrorKind::UnsupportedConversion {
                from: source.extension().to_string(),
                to: target.extension().to_string(),
            },
        ))
    }
}

/// Convert text content with the given settings
pub fn convert_text(
    content: &str,
    source: Format,
    target: Format,
    settings: &ConversionSettings,
) -> ConversionResult<String> {
    ConversionEngine::new(settings.clone()).convert_text(content, source, target)
}

/// Convert a single file and write the result; any failure fails the call
pub fn convert_file_to(
    path: &Path,
    target: Format,
    output_dir: &Path,
    settings: &ConversionSettings,
) -> ConversionResult<PathBuf> {
    ConversionEngine::new(settings.clone()).convert_and_write(path, target, output_dir)
}
