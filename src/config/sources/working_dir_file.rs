//! Working directory config file source: ./kanvas-snapshot.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

pub const WORKING_DIR_CONFIG_FILE: &str = "kanvas-snapshot.toml";

/// Add the working directory config file to builder if it exists.
/// Takes precedence over the global file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    working_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = working_dir.join(WORKING_DIR_CONFIG_FILE);
    if path.exists() {
        return Ok(builder.add_source(File::from(path).required(false)));
    }
    Ok(builder)
}
