//! File conversion module
//!
//! This module contains the conversion settings, the single-file engine and
//! the batch runner.

pub mod batch;
pub mod config;
pub mod engine;
pub mod output;

pub use batch::{
    run_batch, spawn_batch, BatchEvent, BatchHandle, BatchJob, BatchProgress, BatchReport,
    BatchRunner, FileOutcome, FileStatus,
};
pub use config::ConversionSettings;
pub use engine::{convert_file_to, convert_text, ConversionEngine};
pub use output::{output_path, ConvertedOutput};

/// Result type for conversion operations
pub use crate::error::ConversionResult;
