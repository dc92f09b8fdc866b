//! Error types for the Kanvas snapshot workflow.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single outbound HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response code {status}: {body}")]
    UnexpectedResponseCode { status: u16, body: String },

    #[error("Failed to decode API response: {0}")]
    Decoding(String),
}

/// Workflow-level errors surfaced to the user.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Failed to create Meshery design: {0}")]
    CreateDesign(#[source] RequestError),

    #[error("Failed to generate snapshot: {0}")]
    GenerateSnapshot(#[source] RequestError),

    #[error("Failed to request email notification: {0}")]
    Notify(#[source] RequestError),

    #[error("Failed to create log file at {path:?}: {source}")]
    CreateLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file at {path:?}: {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Interrupted before the snapshot wait completed; the snapshot will be published at {asset_location}")]
    Interrupted { asset_location: String },
}

impl SnapshotError {
    /// Stable error code, printed alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotError::InvalidInput(_) => "kanvas-snapshot-900",
            SnapshotError::CreateLogFile { .. } => "kanvas-snapshot-901",
            SnapshotError::CreateDesign(RequestError::Transport(_))
            | SnapshotError::GenerateSnapshot(RequestError::Transport(_)) => "kanvas-snapshot-904",
            SnapshotError::CreateDesign(RequestError::Decoding(_))
            | SnapshotError::GenerateSnapshot(RequestError::Decoding(_)) => "kanvas-snapshot-905",
            SnapshotError::CreateDesign(_) => "kanvas-snapshot-902",
            SnapshotError::GenerateSnapshot(_) => "kanvas-snapshot-903",
            SnapshotError::RemoveFile { .. } => "kanvas-snapshot-906",
            SnapshotError::InvalidEmail(_) => "kanvas-snapshot-907",
            SnapshotError::Config(_) => "kanvas-snapshot-908",
            SnapshotError::Notify(_) => "kanvas-snapshot-909",
            SnapshotError::Interrupted { .. } => "kanvas-snapshot-910",
        }
    }

    /// Suggested remediation for the user.
    pub fn remedy(&self) -> &'static str {
        match self {
            SnapshotError::InvalidInput(_) => "Ensure the Helm chart URI is correctly provided.",
            SnapshotError::InvalidEmail(_) => {
                "Provide a lowercase address of the form user@example.com."
            }
            SnapshotError::CreateDesign(_) => {
                "Check the Meshery API connection and the provider token."
            }
            SnapshotError::GenerateSnapshot(_) => {
                "Check the Meshery Cloud API connection or the workflow dispatch settings."
            }
            SnapshotError::Notify(_) => "Check the Meshery Cloud API connection.",
            SnapshotError::CreateLogFile { .. } => "Check file permissions or the file path.",
            SnapshotError::RemoveFile { .. } => "Check file permissions and file existence.",
            SnapshotError::Config(_) => {
                "Check the configuration file and KANVAS_SNAPSHOT__* environment variables."
            }
            SnapshotError::Interrupted { .. } => {
                "The snapshot job was already queued; it will finish in the background."
            }
        }
    }
}

impl From<config::ConfigError> for SnapshotError {
    fn from(err: config::ConfigError) -> Self {
        SnapshotError::Config(err.to_string())
    }
}
