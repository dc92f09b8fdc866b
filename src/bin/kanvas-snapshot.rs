//! Kanvas Snapshot CLI Binary
//!
//! Registers a Helm chart as a Meshery design and triggers its snapshot.

use clap::error::ErrorKind;
use clap::Parser;
use kanvas_snapshot::cli::{
    exit_code, format_error, format_outcome, format_warning, run_input, Cli, RunContext,
};
use kanvas_snapshot::config::ConfigLoader;
use kanvas_snapshot::logging::{init_logging, LoggingConfig};
use kanvas_snapshot::orchestrator::Delivery;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(parse_exit_code(e.kind()));
        }
    };
    let color = std::io::stderr().is_terminal();

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to determine working directory: {}", e);
            process::exit(1);
        }
    };

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli, &working_dir);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("kanvas-snapshot starting");

    let context = match RunContext::new(&cli, working_dir) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", format_error(&e, color));
            process::exit(exit_code(&e));
        }
    };

    match context.execute(run_input(&cli)) {
        Ok(outcome) => {
            if let Delivery::Email {
                warning: Some(warning),
                ..
            } = &outcome.delivery
            {
                eprintln!("{}", format_warning(warning, color));
            }
            info!(design_id = %outcome.design_id, "Run completed successfully");
            println!("{}", format_outcome(&outcome));
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", format_error(&e, color));
            process::exit(exit_code(&e));
        }
    }
}

/// Help and version requests succeed; any other parse failure exits 1.
fn parse_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, working_dir: &Path) -> LoggingConfig {
    let mut config = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default(),
        None => ConfigLoader::load(working_dir)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default(),
    };

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }
    if config.file.is_relative() {
        config.file = working_dir.join(&config.file);
    }

    config
}
