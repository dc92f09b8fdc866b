//! Orchestrator
//!
//! Sequences one snapshot run:
//! `Start → NameResolved → DesignCreated → SnapshotTriggered → {Notified | ProgressDisplayed} → Done`,
//! with `Failed` reachable from every step. Nothing is retried and nothing
//! already done remotely is rolled back.

use crate::config::SnapshotConfig;
use crate::design::{DesignClient, DesignRequest};
use crate::email::is_valid_email;
use crate::error::SnapshotError;
use crate::http::HttpTransport;
use crate::name::derive_name;
use crate::notify::NotificationDispatcher;
use crate::observer::{RunEvent, RunObserver, RunState};
use crate::progress::{ProgressOutcome, ProgressReporter};
use crate::snapshot::SnapshotTrigger;
use std::sync::Arc;
use std::time::Duration;

/// User input for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunInput {
    pub chart_uri: String,
    pub design_name: Option<String>,
    pub email: Option<String>,
}

/// How the user learns about the finished snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// An email was requested. `warning` holds the reason if the request failed.
    Email {
        email: String,
        warning: Option<String>,
    },
    /// The predicted URL is shown after the progress wait (if any).
    Displayed { waited: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub design_name: String,
    pub design_id: String,
    pub asset_location: String,
    pub delivery: Delivery,
}

pub struct Orchestrator {
    design: DesignClient,
    trigger: SnapshotTrigger,
    notifier: NotificationDispatcher,
    progress: Box<dyn ProgressReporter>,
    observer: Arc<dyn RunObserver>,
    wait: Option<Duration>,
}

impl Orchestrator {
    pub fn new(
        design: DesignClient,
        trigger: SnapshotTrigger,
        notifier: NotificationDispatcher,
        progress: Box<dyn ProgressReporter>,
        observer: Arc<dyn RunObserver>,
        wait: Option<Duration>,
    ) -> Self {
        Self {
            design,
            trigger,
            notifier,
            progress,
            observer,
            wait,
        }
    }

    /// Wire every component from `config` over one shared transport.
    /// A `wait_secs` of zero skips the progress bar.
    pub fn from_config(
        config: &SnapshotConfig,
        transport: Arc<dyn HttpTransport>,
        progress: Box<dyn ProgressReporter>,
        observer: Arc<dyn RunObserver>,
    ) -> Result<Self, SnapshotError> {
        let wait = match config.progress.wait_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Ok(Self::new(
            DesignClient::new(&config.meshery, transport.clone()),
            SnapshotTrigger::from_config(config, transport.clone())?,
            NotificationDispatcher::new(config, transport),
            progress,
            observer,
            wait,
        ))
    }

    fn enter(&self, state: RunState) {
        self.observer.observe(&RunEvent::Entered(state));
    }

    fn fail(&self, error: SnapshotError) -> SnapshotError {
        self.enter(RunState::Failed);
        self.observer.observe(&RunEvent::Failed {
            code: error.code(),
            message: error.to_string(),
        });
        error
    }

    pub async fn run(&self, input: RunInput) -> Result<RunOutcome, SnapshotError> {
        self.enter(RunState::Start);

        let chart_uri = input.chart_uri.trim().to_string();
        if chart_uri.is_empty() {
            return Err(self.fail(SnapshotError::InvalidInput(
                "URL to Helm chart is required".to_string(),
            )));
        }

        let email = input.email.filter(|e| !e.is_empty());
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(self.fail(SnapshotError::InvalidEmail(email.clone())));
            }
        }

        let design_name = match input.design_name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => {
                let name = derive_name(&chart_uri);
                self.observer
                    .observe(&RunEvent::NameDerived { name: name.clone() });
                name
            }
        };
        self.enter(RunState::NameResolved);

        let request = DesignRequest {
            chart_uri,
            design_name,
            notify_email: email.clone(),
        };
        let record = self
            .design
            .create_design(&request)
            .await
            .map_err(|e| self.fail(SnapshotError::CreateDesign(e)))?;
        self.enter(RunState::DesignCreated);

        let job = self
            .trigger
            .trigger_snapshot(&record.design_id, email.as_deref())
            .await
            .map_err(|e| self.fail(SnapshotError::GenerateSnapshot(e)))?;
        self.enter(RunState::SnapshotTriggered);

        let delivery = match email {
            Some(email) => {
                // The render is already queued, so a failed email request
                // only downgrades the result.
                let warning = match self
                    .notifier
                    .request_email_notification(&email, &job.asset_location)
                    .await
                {
                    Ok(()) => None,
                    Err(e) => {
                        let warning = SnapshotError::Notify(e);
                        let message = format!("[{}] {}", warning.code(), warning);
                        self.observer.observe(&RunEvent::Warning {
                            message: message.clone(),
                        });
                        Some(message)
                    }
                };
                self.enter(RunState::Notified);
                Delivery::Email { email, warning }
            }
            None => {
                let waited = match self.wait {
                    Some(estimate) => match self.progress.run_progress(estimate).await {
                        ProgressOutcome::Elapsed => true,
                        ProgressOutcome::Interrupted => {
                            return Err(self.fail(SnapshotError::Interrupted {
                                asset_location: job.asset_location,
                            }));
                        }
                    },
                    None => false,
                };
                self.enter(RunState::ProgressDisplayed);
                Delivery::Displayed { waited }
            }
        };

        self.enter(RunState::Done);
        Ok(RunOutcome {
            design_name: request.design_name,
            design_id: job.design_id,
            asset_location: job.asset_location,
            delivery,
        })
    }
}
