//! Config loader: layers defaults, files and environment into a `SnapshotConfig`.

use super::merge::merge_policy;
use super::sources::{environment, global_file, working_dir_file};
use super::SnapshotConfig;
use crate::error::SnapshotError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a run started in `working_dir`.
    ///
    /// Precedence (lowest to highest): defaults, global file, working
    /// directory file, environment.
    pub fn load(working_dir: &Path) -> Result<SnapshotConfig, SnapshotError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = working_dir_file::add_to_builder(builder, working_dir)?;
        let builder = environment::add_to_builder(builder);

        let config: SnapshotConfig = builder.build()?.try_deserialize()?;
        debug!(mode = ?config.trigger.mode, "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from an explicit file. The file replaces the
    /// global and working directory layers; the environment still applies.
    pub fn load_from_file(path: &Path) -> Result<SnapshotConfig, SnapshotError> {
        if !path.exists() {
            return Err(SnapshotError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
