//! CLI parse: clap types for kanvas-snapshot. No behavior; definitions only.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Generate a Kanvas snapshot using a Helm chart
#[derive(Debug, Parser)]
#[command(name = "kanvas-snapshot", version)]
#[command(about = "Generate a Kanvas snapshot using a Helm chart")]
#[command(
    long_about = "Generate a Kanvas snapshot by providing a Helm chart URI.\n\n\
    The chart is registered with Meshery as a design and a snapshot render is triggered. \
    Without --email the command waits for the render and prints the snapshot URL; \
    with --email a notification is sent once the snapshot is ready.",
    after_help = "Example:\n  kanvas-snapshot -n nginx-helm -f https://charts.bitnami.com/bitnami/nginx-13.2.33.tgz -e user@example.com"
)]
pub struct Cli {
    /// URI to Helm chart (required)
    #[arg(short = 'f', long = "file", value_name = "URI")]
    pub file: String,

    /// Optional name for the Meshery design (defaults to the chart file name)
    #[arg(short = 'n', long = "name", visible_alias = "design-name")]
    pub name: Option<String>,

    /// Email address to notify when the snapshot is ready
    #[arg(short = 'e', long = "email")]
    pub email: Option<String>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Snapshot trigger mode (overrides configuration)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Print the predicted snapshot URL without waiting for the render
    #[arg(long)]
    pub no_wait: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Meshery Cloud workflow trigger
    Cloud,
    /// GitHub Actions workflow dispatch
    GithubDispatch,
}
