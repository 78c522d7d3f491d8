//! Command-line interface module

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::conversion::batch::{BatchEvent, BatchReport, FileStatus};
use crate::conversion::ConversionSettings;
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::formats::Format;
use crate::logging::Verbosity;

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "fileconv")]
#[command(about = "Convert files between CSV, JSON, XML, text and image formats")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Also write a timestamped log file into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert files to another format
    Convert(ConvertArgs),
    /// Check that files exist and can be decoded
    Validate {
        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Recursively process directories
        #[arg(long)]
        recursive: bool,
    },
    /// List supported formats and their conversion targets
    Formats,
}

/// Arguments of the `convert` subcommand
#[derive(ClapArgs, Debug, Clone)]
pub struct ConvertArgs {
    /// Input files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Target format extension (e.g. json, csv, png)
    #[arg(short, long)]
    pub to: Format,

    /// Directory the converted files are written to
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Recursively process directories
    #[arg(long)]
    pub recursive: bool,

    /// Load conversion settings from a JSON file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// CSV field separator (default: ,)
    #[arg(long)]
    pub csv_separator: Option<char>,

    /// Root element name for XML output (default: root)
    #[arg(long)]
    pub xml_root: Option<String>,

    /// Spaces per JSON indentation level, 0 for compact (default: 2)
    #[arg(long)]
    pub json_indent: Option<usize>,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub verbosity: Verbosity,
    pub log_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: &Args) -> Self {
        Self {
            verbosity: Verbosity::from_flags(args.verbose, args.quiet),
            log_dir: args.log_dir.clone(),
        }
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }
}

impl ConvertArgs {
    /// Build conversion settings: settings file first, then flag overrides
    pub fn conversion_settings(&self) -> ConversionResult<ConversionSettings> {
        let mut settings = match &self.settings {
            Some(path) => ConversionSettings::from_json_file(path)?,
            None => ConversionSettings::default(),
        };

        if let Some(separator) = self.csv_separator {
            settings.csv_separator = separator;
        }
        if let Some(root) = &self.xml_root {
            settings.xml_root_tag = root.clone();
        }
        if let Some(indent) = self.json_indent {
            settings.json_indent = indent;
        }

        settings
            .validate()
            .map_err(|e| ConversionError::conversion(ConversionErrorKind::configuration(e)))?;

        Ok(settings)
    }
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar for file processing
    pub fn create_progress_bar(total: u64, quiet: bool) -> indicatif::ProgressBar {
        if quiet {
            return indicatif::ProgressBar::hidden();
        }

        let pb = indicatif::ProgressBar::new(total);
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            println!("{} {}", console::style("✓").green(), message);
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        eprintln!("{} {}", console::style("✗").red(), message);
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("{} {}", console::style("⚠").yellow(), message);
        }
    }
}

/// Drive a progress bar from batch events
pub fn render_event(pb: &indicatif::ProgressBar, event: &BatchEvent) {
    match event {
        BatchEvent::Started { total } => pb.set_length(*total as u64),
        BatchEvent::FileStarted { source, .. } => {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            pb.set_message(name);
        }
        BatchEvent::FileFinished(outcome) => {
            if let FileStatus::Failed { message, .. } = &outcome.status {
                pb.suspend(|| CliUtils::show_error(message));
            }
        }
        BatchEvent::Progress(progress) => pb.set_position(progress.completed as u64),
        BatchEvent::Finished(_) | BatchEvent::Rejected { .. } => pb.finish_and_clear(),
    }
}

/// Print the per-file summary of a finished batch
pub fn print_report(report: &BatchReport, quiet: bool) {
    for outcome in &report.outcomes {
        match &outcome.status {
            FileStatus::Converted { output } => CliUtils::show_success(
                &format!("{} -> {}", outcome.source.display(), output.display()),
                quiet,
            ),
            FileStatus::Failed { category, message } => {
                CliUtils::show_error(&format!("{} [{}]: {}", outcome.source.display(), category, message))
            }
        }
    }

    if !quiet {
        println!(
            "\n{} converted, {} failed in {}",
            report.succeeded(),
            report.failed(),
            CliUtils::format_duration(Duration::from_millis(report.elapsed_ms))
        );
    }
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &ConversionError) {
    CliUtils::show_error(&error.user_message());

    // Provide helpful suggestions
    match error.kind() {
        Some(ConversionErrorKind::UnsupportedConversion { from, .. }) => {
            if let Some(source) = Format::from_extension(from) {
                let targets: Vec<&str> = source.targets().iter().map(|f| f.extension()).collect();
                eprintln!("\nTip: {} files can be converted to: {}", from, targets.join(", "));
            }
        }
        Some(ConversionErrorKind::InputTooLarge { .. }) => {
            eprintln!("\nTip: raise max_input_bytes in a --settings file");
        }
        _ => {}
    }

    // Show usage hint
    eprintln!("\nTry 'fileconv --help' for usage information.");
}
