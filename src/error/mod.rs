//! Error types and handling infrastructure for file conversion

use anyhow::Error;
use std::fmt;
use std::path::PathBuf;

/// Core error types for the conversion process
#[derive(Debug, thiserror::Error)]
pub enum ConversionErrorKind {
    #[error("Invalid input: {message}")]
    Validation {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Unsupported data shape: {message}")]
    Shape { message: String },

    #[error("Image decode error: {message}")]
    Decode { message: String },

    #[error("Image encode error: {message}")]
    Encode { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Cannot convert {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Input too large: {size} bytes (limit: {limit} bytes)")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("Nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl ConversionErrorKind {
    pub fn validation(message: String, path: Option<PathBuf>) -> Self {
        Self::Validation { message, path }
    }

    pub fn shape(message: String) -> Self {
        Self::Shape { message }
    }

    pub fn io(message: String, path: Option<PathBuf>) -> Self {
        Self::Io { message, path }
    }

    pub fn configuration(message: String) -> Self {
        Self::Configuration { message }
    }

    /// Name of the error class this kind belongs to
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::InputTooLarge { .. } | Self::NestingTooDeep { .. } => {
                "ValidationError"
            }
            Self::Shape { .. } => "ShapeError",
            Self::Decode { .. } => "DecodeError",
            Self::Encode { .. } => "EncodeError",
            Self::Io { .. } => "IOError",
            Self::UnsupportedConversion { .. } => "CapabilityError",
            Self::Configuration { .. } => "ConfigurationError",
        }
    }
}

/// Main error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error("{kind}")]
    Conversion {
        kind: ConversionErrorKind,
        source: Option<anyhow::Error>,
    },

    #[error(transparent)]
    Other(#[from] Error),
}

impl ConversionError {
    pub fn parse(format: &'static str, message: String, location: Option<(usize, usize)>) -> Self {
        Self::ParseError(ParseError::new(format, message, location))
    }

    pub fn shape(message: String) -> Self {
        Self::conversion(ConversionErrorKind::shape(message))
    }

    pub fn conversion(kind: ConversionErrorKind) -> Self {
        Self::Conversion { kind, source: None }
    }

    pub fn conversion_with_source(kind: ConversionErrorKind, source: anyhow::Error) -> Self {
        Self::Conversion {
            kind,
            source: Some(source),
        }
    }

    /// Wrap an IO failure together with the path it happened on
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::conversion_with_source(
            ConversionErrorKind::io(format!("{}: {}", path.display(), err), Some(path)),
            err.into(),
        )
    }

    pub fn other(error: Error) -> Self {
        Self::Other(error)
    }

    /// The kind of a `Conversion` error, if this is one
    pub fn kind(&self) -> Option<&ConversionErrorKind> {
        match self {
            Self::Conversion { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Name of the error class, used when reporting per-file failures
    pub fn category(&self) -> &'static str {
        match self {
            Self::ParseError(_) => "ParseError",
            Self::Conversion { kind, .. } => kind.category(),
            Self::Other(_) => "Error",
        }
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::ParseError(err) => match err.location {
                Some((line, col)) => format!(
                    "{} parse error at line {}, column {}: {}",
                    err.format, line, col, err.message
                ),
                None => format!("{} parse error: {}", err.format, err.message),
            },
            Self::Conversion { kind, .. } => match kind {
                ConversionErrorKind::UnsupportedConversion { from, to } => {
                    format!("Conversion from '{}' to '{}' is not supported", from, to)
                }
                ConversionErrorKind::InputTooLarge { size, limit } => {
                    format!("Input file too large: {} bytes (limit: {} bytes)", size, limit)
                }
                ConversionErrorKind::Validation {
                    message,
                    path: Some(path),
                } => format!("{}: {}", path.display(), message),
                _ => self.to_string(),
            },
            Self::Other(err) => {
                format!("Unexpected error: {}", err)
            }
        }
    }
}

/// Text parsing errors
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Display name of the format being parsed, e.g. "CSV"
    pub format: &'static str,
    pub message: String,
    pub location: Option<(usize, usize)>,
}

impl ParseError {
    pub fn new(format: &'static str, message: String, location: Option<(usize, usize)>) -> Self {
        Self {
            format,
            message,
            location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} parse error: {}", self.format, self.message)?;
        if let Some((line, col)) = self.location {
            write!(f, " at line {}, column {}", line, col)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;
