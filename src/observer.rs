//! Run observation.
//!
//! The orchestrator reports state changes and warnings through `RunObserver`
//! instead of logging directly, so a run can be inspected in tests.

use std::sync::Mutex;
use tracing::{error, info, warn};

/// States of a snapshot run. `Failed` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    NameResolved,
    DesignCreated,
    SnapshotTriggered,
    Notified,
    ProgressDisplayed,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Entered(RunState),
    NameDerived { name: String },
    Warning { message: String },
    Failed { code: &'static str, message: String },
}

pub trait RunObserver: Send + Sync {
    fn observe(&self, event: &RunEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn observe(&self, event: &RunEvent) {
        match event {
            RunEvent::Entered(state) => info!(state = ?state, "Run state changed"),
            RunEvent::NameDerived { name } => {
                warn!("No design name provided. Using extracted name: {}", name)
            }
            RunEvent::Warning { message } => warn!("{}", message),
            RunEvent::Failed { code, message } => error!(code = %code, "{}", message),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CapturingObserver {
    events: Mutex<Vec<RunEvent>>,
}

impl CapturingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The sequence of states entered, in order.
    pub fn states(&self) -> Vec<RunState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RunEvent::Entered(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RunEvent::Warning { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl RunObserver for CapturingObserver {
    fn observe(&self, event: &RunEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
