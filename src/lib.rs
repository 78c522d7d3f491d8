//! File format converter
//!
//! Converts between the text formats CSV, JSON, XML and plain text through a
//! shared tree model, and between the image formats JPEG, PNG, BMP, GIF and
//! TIFF. Conversions never cross between text and images.

pub mod cli;
pub mod conversion;
pub mod error;
pub mod formats;
pub mod formatter;
pub mod logging;
pub mod parser;
pub mod raster;
pub mod tree;

// Re-export commonly used types
pub use conversion::{
    spawn_batch, BatchEvent, BatchJob, BatchReport, ConversionEngine, ConversionSettings,
    ConvertedOutput,
};
pub use error::{ConversionError, ConversionErrorKind, ConversionResult, ParseError};
pub use formats::{can_convert, Category, Format};
pub use tree::TreeValue;

/// Convert text content between two text formats with default settings
pub fn convert_str(content: &str, source: Format, target: Format) -> ConversionResult<String> {
    let settings = ConversionSettings::default();
    convert_str_with_settings(content, source, target, &settings)
}

/// Convert text content between two text formats with custom settings
pub fn convert_str_with_settings(
    content: &str,
    source: Format,
    target: Format,
    settings: &ConversionSettings,
) -> ConversionResult<String> {
    conversion::convert_text(content, source, target, settings)
}
