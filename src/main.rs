use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use fileconv::cli::{self, Args, CliConfig, CliUtils, Commands, ConvertArgs};
use fileconv::conversion::{spawn_batch, BatchJob};
use fileconv::formats::{self, Category};
use fileconv::logging;
use fileconv::parser::directory::expand_inputs;
use fileconv::parser::validation::partition_valid;
use fileconv::ConversionSettings;

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = CliConfig::from_args(&args);

    // Set up logging
    logging::init_logging(config.verbosity, config.log_dir.as_deref())?;

    match &args.command {
        Commands::Convert(convert) => handle_conversion(convert, &config),
        Commands::Validate { inputs, recursive } => handle_validation(inputs, *recursive, &config),
        Commands::Formats => {
            print_formats();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn handle_conversion(args: &ConvertArgs, config: &CliConfig) -> Result<ExitCode> {
    let quiet = config.is_quiet();

    let settings = match args.conversion_settings() {
        Ok(settings) => settings,
        Err(e) => {
            cli::handle_error(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let candidates = expand_inputs(&args.inputs, args.recursive)?;
    let (valid, rejected) = partition_valid(&candidates, &settings);
    for err in &rejected {
        CliUtils::show_warning(&err.user_message(), quiet);
    }

    if valid.is_empty() {
        CliUtils::show_error("No valid input files");
        return Ok(ExitCode::FAILURE);
    }

    let sources = valid.into_iter().map(|(_, path)| path).collect();
    let job = BatchJob::new(sources, args.to, &args.output_dir).with_settings(settings);

    let handle = spawn_batch(job);
    let pb = CliUtils::create_progress_bar(0, quiet);
    for event in handle.events() {
        cli::render_event(&pb, &event);
    }

    match handle.wait() {
        Ok(report) => {
            cli::print_report(&report, quiet);
            if report.all_succeeded() && rejected.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Err(e) => {
            cli::handle_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_validation(
    inputs: &[std::path::PathBuf],
    recursive: bool,
    config: &CliConfig,
) -> Result<ExitCode> {
    let files = expand_inputs(inputs, recursive)?;
    let (valid, rejected) = partition_valid(&files, &ConversionSettings::default());

    for (format, path) in &valid {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        CliUtils::show_success(
            &format!(
                "{} ({}, {})",
                path.display(),
                format.display_name(),
                CliUtils::format_file_size(size)
            ),
            config.is_quiet(),
        );
    }
    for err in &rejected {
        CliUtils::show_error(&err.user_message());
    }

    Ok(if rejected.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_formats() {
    for category in [Category::Text, Category::Image] {
        println!("{} formats:", category);
        for descriptor in formats::by_category(category) {
            let targets: Vec<&str> = descriptor
                .format
                .targets()
                .iter()
                .map(|f| f.extension())
                .collect();
            println!(
                "  {:<5} {:<11} -> {}",
                descriptor.extension,
                descriptor.display_name,
                targets.join(", ")
            );
        }
    }
}
