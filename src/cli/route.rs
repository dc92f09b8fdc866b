//! CLI route: run context. Loads configuration, owns the diagnostics log and
//! drives one orchestrator run on a tokio runtime.

use crate::cli::parse::{Cli, ModeArg};
use crate::config::{ConfigLoader, SnapshotConfig, TriggerMode};
use crate::diagnostics::DiagnosticLog;
use crate::error::SnapshotError;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::observer::{RunObserver, TracingObserver};
use crate::orchestrator::{Orchestrator, RunInput, RunOutcome};
use crate::progress::{ProgressReporter, TerminalProgress};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Runtime context for CLI execution: resolved configuration and working directory.
pub struct RunContext {
    config: SnapshotConfig,
    working_dir: PathBuf,
}

impl RunContext {
    /// Load configuration for `cli` and apply its overrides. Uses ConfigLoader only.
    pub fn new(cli: &Cli, working_dir: PathBuf) -> Result<Self, SnapshotError> {
        let mut config = match &cli.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&working_dir)?,
        };
        apply_overrides(&mut config, cli);
        Self::from_config(config, working_dir)
    }

    /// Validate and wrap an already-built configuration.
    pub fn from_config(config: SnapshotConfig, working_dir: PathBuf) -> Result<Self, SnapshotError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            SnapshotError::Config(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(Self {
            config,
            working_dir,
        })
    }

    /// Resolved location of the diagnostics log.
    pub fn diagnostics_path(&self) -> PathBuf {
        resolve_against(&self.working_dir, &self.config.diagnostics.path)
    }

    /// Run with the real HTTP client, terminal progress bar and tracing observer.
    pub fn execute(&self, input: RunInput) -> Result<RunOutcome, SnapshotError> {
        let transport = ReqwestTransport::new(&self.config.http)
            .map_err(|e| SnapshotError::Config(e.to_string()))?;
        self.execute_with(
            input,
            Arc::new(transport),
            Box::new(TerminalProgress),
            Arc::new(TracingObserver),
        )
    }

    /// Run with the given collaborators. The diagnostics log is kept when the
    /// run fails and removed when it succeeds.
    pub fn execute_with(
        &self,
        input: RunInput,
        transport: Arc<dyn HttpTransport>,
        progress: Box<dyn ProgressReporter>,
        observer: Arc<dyn RunObserver>,
    ) -> Result<RunOutcome, SnapshotError> {
        let mut diagnostics = if self.config.diagnostics.enabled {
            Some(DiagnosticLog::create(self.diagnostics_path())?)
        } else {
            None
        };

        let result = self.run_on_runtime(input, transport, progress, observer);

        match (&result, diagnostics.as_mut()) {
            (Ok(_), Some(log)) => log.discard()?,
            (Err(error), Some(log)) => {
                if let Err(log_error) = log.record_failure(error) {
                    warn!(error = %log_error, "Could not write diagnostics log");
                } else {
                    info!(path = %log.path().display(), "Failure recorded in diagnostics log");
                }
            }
            (_, None) => {}
        }
        result
    }

    fn run_on_runtime(
        &self,
        input: RunInput,
        transport: Arc<dyn HttpTransport>,
        progress: Box<dyn ProgressReporter>,
        observer: Arc<dyn RunObserver>,
    ) -> Result<RunOutcome, SnapshotError> {
        let orchestrator = Orchestrator::from_config(&self.config, transport, progress, observer)?;
        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            SnapshotError::Config(format!("Failed to start async runtime: {}", e))
        })?;
        runtime.block_on(orchestrator.run(input))
    }
}

/// Build the run input from parsed flags.
pub fn run_input(cli: &Cli) -> RunInput {
    RunInput {
        chart_uri: cli.file.clone(),
        design_name: cli.name.clone(),
        email: cli.email.clone(),
    }
}

fn apply_overrides(config: &mut SnapshotConfig, cli: &Cli) {
    if let Some(mode) = cli.mode {
        config.trigger.mode = match mode {
            ModeArg::Cloud => TriggerMode::Cloud,
            ModeArg::GithubDispatch => TriggerMode::GithubDispatch,
        };
    }
    if cli.no_wait {
        config.progress.wait_secs = 0;
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
