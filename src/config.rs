//! Configuration System
//!
//! Process-wide configuration for the snapshot workflow: API base URLs, credentials,
//! trigger mode and timeouts. Built once at startup from defaults, config files and
//! environment variables, then passed by reference into each component.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

pub(crate) const DEFAULT_MESHERY_API_BASE_URL: &str = "http://localhost:9081";
pub(crate) const DEFAULT_CLOUD_API_BASE_URL: &str = "https://cloud.layer5.io";
pub(crate) const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
pub(crate) const DEFAULT_ASSET_BASE_URL: &str =
    "https://raw.githubusercontent.com/layer5labs/meshery-extensions-packages/master/action-assets";
pub(crate) const DEFAULT_WORKFLOW_BRANCH: &str = "master";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 2m40s, the time the rendering pipeline usually needs.
pub(crate) const DEFAULT_PROGRESS_WAIT_SECS: u64 = 160;
pub(crate) const DEFAULT_DIAGNOSTICS_PATH: &str = "snapshot/log/snapshot";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub meshery: MesheryConfig,

    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub assets: AssetConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the provider token is attached to Meshery requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// Sent verbatim as the `Cookie` header.
    #[default]
    Cookie,
    /// Sent as `Authorization: Bearer <token>`.
    Bearer,
}

/// Shape of the design import endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStyle {
    /// `POST <base>/api/pattern/import`
    #[default]
    Import,
    /// `POST <base>/api/pattern/Helm%20Chart`, used by older Meshery servers.
    SourceType,
}

/// Where the snapshot render request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Meshery Cloud workflow-trigger integration.
    #[default]
    Cloud,
    /// Direct GitHub Actions `workflow_dispatch`.
    GithubDispatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MesheryConfig {
    #[serde(default = "default_meshery_api_base_url")]
    pub api_base_url: String,

    /// Provider session token
    #[serde(default)]
    pub provider_token: Option<String>,

    #[serde(default)]
    pub auth: AuthScheme,

    #[serde(default)]
    pub import_style: ImportStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    #[serde(default = "default_cloud_api_base_url")]
    pub api_base_url: String,

    /// Falls back to `meshery.provider_token` when unset.
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub auth: AuthScheme,

    /// Sent as the `SystemID` header when present.
    #[serde(default)]
    pub system_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    #[serde(default)]
    pub mode: TriggerMode,

    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,

    /// Workflow file name without the `.yaml` suffix.
    #[serde(default)]
    pub workflow: Option<String>,

    #[serde(default = "default_workflow_branch")]
    pub branch: String,

    #[serde(default)]
    pub github_token: Option<String>,

    #[serde(default = "default_github_api_base_url")]
    pub github_api_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Snapshot images land at `<base_url>/<design id>.png`.
    #[serde(default = "default_asset_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_progress_wait_secs")]
    pub wait_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Relative paths resolve against the working directory.
    #[serde(default = "default_diagnostics_path")]
    pub path: PathBuf,
}

fn default_meshery_api_base_url() -> String {
    DEFAULT_MESHERY_API_BASE_URL.to_string()
}

fn default_cloud_api_base_url() -> String {
    DEFAULT_CLOUD_API_BASE_URL.to_string()
}

fn default_github_api_base_url() -> String {
    DEFAULT_GITHUB_API_BASE_URL.to_string()
}

fn default_asset_base_url() -> String {
    DEFAULT_ASSET_BASE_URL.to_string()
}

fn default_workflow_branch() -> String {
    DEFAULT_WORKFLOW_BRANCH.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_progress_wait_secs() -> u64 {
    DEFAULT_PROGRESS_WAIT_SECS
}

fn default_diagnostics_path() -> PathBuf {
    PathBuf::from(DEFAULT_DIAGNOSTICS_PATH)
}

fn default_true() -> bool {
    true
}

impl Default for MesheryConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_meshery_api_base_url(),
            provider_token: None,
            auth: AuthScheme::default(),
            import_style: ImportStyle::default(),
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_cloud_api_base_url(),
            token: None,
            auth: AuthScheme::default(),
            system_id: None,
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            mode: TriggerMode::default(),
            owner: None,
            repo: None,
            workflow: None,
            branch: default_workflow_branch(),
            github_token: None,
            github_api_base_url: default_github_api_base_url(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_url: default_asset_base_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            wait_secs: default_progress_wait_secs(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_diagnostics_path(),
        }
    }
}

impl CloudConfig {
    /// Token for Meshery Cloud calls, falling back to the Meshery provider token.
    pub fn effective_token<'a>(&'a self, meshery: &'a MesheryConfig) -> Option<&'a str> {
        self.token
            .as_deref()
            .or(meshery.provider_token.as_deref())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Meshery(String),
    Cloud(String),
    Trigger(String),
    Assets(String),
    Http(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Meshery(msg) => write!(f, "meshery: {}", msg),
            ValidationError::Cloud(msg) => write!(f, "cloud: {}", msg),
            ValidationError::Trigger(msg) => write!(f, "trigger: {}", msg),
            ValidationError::Assets(msg) => write!(f, "assets: {}", msg),
            ValidationError::Http(msg) => write!(f, "http: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

impl SnapshotConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !is_http_url(&self.meshery.api_base_url) {
            errors.push(ValidationError::Meshery(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.meshery.api_base_url
            )));
        }

        if self.trigger.mode == TriggerMode::Cloud && !is_http_url(&self.cloud.api_base_url) {
            errors.push(ValidationError::Cloud(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.cloud.api_base_url
            )));
        }

        if self.trigger.mode == TriggerMode::GithubDispatch {
            for (field, value) in [
                ("owner", &self.trigger.owner),
                ("repo", &self.trigger.repo),
                ("workflow", &self.trigger.workflow),
                ("github_token", &self.trigger.github_token),
            ] {
                if is_blank(value) {
                    errors.push(ValidationError::Trigger(format!(
                        "{} is required for github_dispatch mode",
                        field
                    )));
                }
            }
            if !is_http_url(&self.trigger.github_api_base_url) {
                errors.push(ValidationError::Trigger(format!(
                    "github_api_base_url must be an http(s) URL, got '{}'",
                    self.trigger.github_api_base_url
                )));
            }
        }

        if self.trigger.branch.trim().is_empty() {
            errors.push(ValidationError::Trigger("branch cannot be empty".to_string()));
        }

        if !is_http_url(&self.assets.base_url) {
            errors.push(ValidationError::Assets(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.assets.base_url
            )));
        }

        if self.http.timeout_secs == 0 {
            errors.push(ValidationError::Http(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.http.connect_timeout_secs == 0 {
            errors.push(ValidationError::Http(
                "connect_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
