//! Kanvas Snapshot: Helm Chart Snapshots via Meshery
//!
//! Registers a Helm chart with a Meshery server as a design, triggers the
//! pipeline that renders the design to an image, and either reports the
//! predicted image URL or arranges an email once the image is ready.

pub mod cli;
pub mod config;
pub mod design;
pub mod diagnostics;
pub mod email;
pub mod error;
pub mod http;
pub mod logging;
pub mod name;
pub mod notify;
pub mod observer;
pub mod orchestrator;
pub mod progress;
pub mod snapshot;
