//! Diagnostics log file.
//!
//! Created at the start of a run, appended to when the run fails and removed
//! once it succeeds. A failed run therefore leaves the file behind for
//! inspection.

use crate::error::SnapshotError;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct DiagnosticLog {
    path: PathBuf,
    discarded: bool,
}

impl DiagnosticLog {
    /// Create the log file (and its parent directories) if missing.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let path = path.into();
        let create_err = |source| SnapshotError::CreateLogFile {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(create_err)?;
            }
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(create_err)?;

        debug!(path = %path.display(), "Diagnostics log created");
        Ok(Self {
            path,
            discarded: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `<local time> - [code] message` for a fatal error.
    pub fn record_failure(&self, error: &SnapshotError) -> Result<(), SnapshotError> {
        let line = format!(
            "{} - [{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            error.code(),
            error
        );
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SnapshotError::CreateLogFile {
                path: self.path.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .map_err(|source| SnapshotError::CreateLogFile {
                path: self.path.clone(),
                source,
            })
    }

    /// Remove the log after a successful run.
    ///
    /// A file that is already gone counts as removed, and calling this twice
    /// is a no-op.
    pub fn discard(&mut self) -> Result<(), SnapshotError> {
        if self.discarded {
            return Ok(());
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Diagnostics log already removed");
            }
            Err(source) => {
                return Err(SnapshotError::RemoveFile {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        self.discarded = true;
        Ok(())
    }
}
