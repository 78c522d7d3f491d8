//! Logging setup: stderr plus an optional timestamped log file

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How chatty the console output should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Verbosity::Quiet,
            (true, false) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "fileconv=warn",
            Verbosity::Verbose => "fileconv=debug,info",
        }
    }
}

/// Log file name for a given start time, e.g. `converter_20240131_235959.log`
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("converter_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Install the global subscriber. Returns the log file path when one was opened.
pub fn init_logging(verbosity: Verbosity, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_filter()));

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let path = dir.join(log_file_name(Local::now()));
            let file = File::create(&path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    if let Some(path) = &log_path {
        tracing::info!(path = %path.display(), "logger initialized");
    }
    Ok(log_path)
}
