/*!
 * Command-line interface for repo2tree
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;

use repo2tree::config::{Args, Config};
use repo2tree::error::Result;
use repo2tree::logging::init_logging;
use repo2tree::pipeline::convert;
use repo2tree::report::{ReportFormat, Reporter, ScanReport};
use repo2tree::utils::count_files;
use repo2tree::writer::OutputWriter;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(Config::from_args(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    config.validate()?;

    // Configuration errors stop the run before anything is read
    let repo = config.repo_config()?;

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ⏱️  {elapsed_precise}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("Converting Repository to String");
    progress.set_length(count_files(&config.target_dir, &repo));

    let start_time = Instant::now();
    let progress = Arc::new(progress);

    let conversion = match convert(&config, repo, Arc::clone(&progress)) {
        Ok(conversion) => conversion,
        Err(e) => {
            progress.finish_and_clear();
            return Err(e);
        }
    };

    let destinations =
        OutputWriter::new(config.clone(), Arc::clone(&progress)).write(&conversion.output);
    progress.finish_and_clear();
    let destinations = destinations?;
    let duration = start_time.elapsed();

    if !config.quiet {
        let statistics = conversion.statistics;
        let report = ScanReport {
            repository_name: conversion.repository_name,
            destinations: destinations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            format: config.format.describe().to_string(),
            duration,
            files_processed: statistics.files_processed,
            directories: statistics.directories,
            total_lines: statistics.total_lines,
            original_bytes: statistics.original_bytes,
            output_bytes: statistics.output_bytes,
            minify_fallbacks: config.minify.then_some(statistics.minify_fallbacks),
            output_lines: conversion.line_count,
            output_chars: conversion.output.chars().count(),
            file_details: statistics.file_details,
        };

        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
