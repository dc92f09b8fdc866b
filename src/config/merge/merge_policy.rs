//! Merge rules: defaults, override order, conflict handling.

use crate::config::{
    DEFAULT_ASSET_BASE_URL, DEFAULT_CLOUD_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_GITHUB_API_BASE_URL, DEFAULT_MESHERY_API_BASE_URL, DEFAULT_PROGRESS_WAIT_SECS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_WORKFLOW_BRANCH,
};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("meshery.api_base_url", DEFAULT_MESHERY_API_BASE_URL)?
        .set_default("cloud.api_base_url", DEFAULT_CLOUD_API_BASE_URL)?
        .set_default("trigger.branch", DEFAULT_WORKFLOW_BRANCH)?
        .set_default("trigger.github_api_base_url", DEFAULT_GITHUB_API_BASE_URL)?
        .set_default("assets.base_url", DEFAULT_ASSET_BASE_URL)?
        .set_default("http.timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("http.connect_timeout_secs", DEFAULT_CONNECT_TIMEOUT_SECS)?
        .set_default("progress.wait_secs", DEFAULT_PROGRESS_WAIT_SECS)
}
