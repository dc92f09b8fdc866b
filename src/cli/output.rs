//! CLI output: error mapping and result rendering for the terminal.

use crate::error::SnapshotError;
use crate::orchestrator::{Delivery, RunOutcome};
use owo_colors::OwoColorize;

/// Exit status for a run that ended in `error`.
pub fn exit_code(error: &SnapshotError) -> i32 {
    match error {
        SnapshotError::Interrupted { .. } => 130,
        _ => 1,
    }
}

/// `[code] message` plus the remediation hint.
pub fn map_error(error: &SnapshotError) -> String {
    format!("[{}] {}\n{}", error.code(), error, error.remedy())
}

/// Same as `map_error`, colored for a terminal.
pub fn format_error(error: &SnapshotError, color: bool) -> String {
    if color {
        format!(
            "{} [{}] {}\n{}",
            "Error:".red().bold(),
            error.code(),
            error,
            error.remedy().dimmed()
        )
    } else {
        format!("Error: {}", map_error(error))
    }
}

pub fn format_warning(message: &str, color: bool) -> String {
    if color {
        format!("{} {}", "Warning:".yellow().bold(), message)
    } else {
        format!("Warning: {}", message)
    }
}

/// The line printed on stdout after a successful run.
pub fn format_outcome(outcome: &RunOutcome) -> String {
    match &outcome.delivery {
        Delivery::Email { email, warning: None } => format!(
            "You will be notified at {} when your snapshot is ready.",
            email
        ),
        Delivery::Email {
            warning: Some(_), ..
        } => format!(
            "Snapshot queued, but the email could not be requested. Snapshot URL: {}",
            outcome.asset_location
        ),
        Delivery::Displayed { waited: true } => {
            format!("Snapshot generated. Snapshot URL: {}", outcome.asset_location)
        }
        Delivery::Displayed { waited: false } => format!(
            "Snapshot queued. It will be available shortly at: {}",
            outcome.asset_location
        ),
    }
}
