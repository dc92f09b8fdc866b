//! Snapshot trigger.
//!
//! Fires a one-way request that makes a downstream pipeline render the design
//! to an image. The image URL is predicted from the design id, not returned by
//! anything, so it may not resolve yet when this module hands it back.

use crate::config::{SnapshotConfig, TriggerMode};
use crate::error::{RequestError, SnapshotError};
use crate::http::{Credential, HttpTransport, OutboundRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

const APPLICATION_TYPE: &str = "Helm Chart";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// A render job that has been dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotJob {
    pub design_id: String,
    pub asset_location: String,
    pub notify_email: Option<String>,
}

/// Predicts where a design's snapshot image will be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocator {
    base_url: String,
}

impl AssetLocator {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/<design id>.png`, a pure function of the id.
    pub fn asset_location(&self, design_id: &str) -> String {
        format!("{}/{}.png", self.base_url, design_id)
    }
}

/// Meshery Cloud workflow-trigger integration.
#[derive(Debug, Clone)]
pub struct CloudWorkflowTarget {
    endpoint: String,
    referer: String,
    credential: Credential,
    system_id: Option<String>,
    deployment: Option<Deployment>,
}

/// GitHub Actions `workflow_dispatch` target.
#[derive(Debug, Clone)]
pub struct GithubDispatchTarget {
    endpoint: String,
    branch: String,
    credential: Credential,
}

/// Repository coordinates forwarded to the cloud integration.
#[derive(Clone, Serialize)]
struct Deployment {
    #[serde(rename = "Owner")]
    owner: String,
    #[serde(rename = "Repo")]
    repo: String,
    #[serde(rename = "Workflow")]
    workflow: String,
    #[serde(rename = "Branch")]
    branch: String,
    #[serde(rename = "github_token", skip_serializing_if = "Option::is_none")]
    github_token: Option<String>,
}

impl std::fmt::Debug for Deployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deployment")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("workflow", &self.workflow)
            .field("branch", &self.branch)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct CloudPayload<'a> {
    application_type: &'a str,
    #[serde(rename = "designID")]
    design_id: &'a str,
    email: &'a str,
    #[serde(rename = "assetLocation")]
    asset_location: &'a str,
}

#[derive(Serialize)]
struct CloudTriggerBody<'a> {
    #[serde(flatten)]
    deployment: Option<&'a Deployment>,
    #[serde(rename = "Payload")]
    payload: CloudPayload<'a>,
}

#[derive(Serialize)]
struct DispatchInputs<'a> {
    #[serde(rename = "contentID")]
    content_id: &'a str,
    #[serde(rename = "assetLocation")]
    asset_location: &'a str,
}

#[derive(Serialize)]
struct DispatchBody<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    inputs: DispatchInputs<'a>,
}

/// Strategy chosen by `trigger.mode`.
#[derive(Debug, Clone)]
pub enum TriggerStrategy {
    Cloud(CloudWorkflowTarget),
    GithubDispatch(GithubDispatchTarget),
}

impl TriggerStrategy {
    pub fn from_config(config: &SnapshotConfig) -> Result<Self, SnapshotError> {
        let trigger = &config.trigger;
        match trigger.mode {
            TriggerMode::Cloud => {
                let base = config.cloud.api_base_url.trim_end_matches('/');
                let deployment = match (&trigger.owner, &trigger.repo, &trigger.workflow) {
                    (Some(owner), Some(repo), Some(workflow)) => Some(Deployment {
                        owner: owner.clone(),
                        repo: repo.clone(),
                        workflow: workflow.clone(),
                        branch: trigger.branch.clone(),
                        github_token: trigger.github_token.clone(),
                    }),
                    _ => None,
                };
                Ok(TriggerStrategy::Cloud(CloudWorkflowTarget {
                    endpoint: format!("{}/api/integrations/trigger/workflow", base),
                    referer: format!("{}/dashboard", base),
                    credential: Credential::from_token(
                        config.cloud.effective_token(&config.meshery),
                        config.cloud.auth,
                    ),
                    system_id: config.cloud.system_id.clone(),
                    deployment,
                }))
            }
            TriggerMode::GithubDispatch => {
                let required = |value: &Option<String>, field: &str| {
                    value
                        .as_deref()
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                        .ok_or_else(|| {
                            SnapshotError::Config(format!(
                                "trigger.{} is required for github_dispatch mode",
                                field
                            ))
                        })
                };
                let owner = required(&trigger.owner, "owner")?;
                let repo = required(&trigger.repo, "repo")?;
                let workflow = required(&trigger.workflow, "workflow")?;
                let token = required(&trigger.github_token, "github_token")?;

                let workflow_file = if workflow.ends_with(".yaml") || workflow.ends_with(".yml") {
                    workflow
                } else {
                    format!("{}.yaml", workflow)
                };
                Ok(TriggerStrategy::GithubDispatch(GithubDispatchTarget {
                    endpoint: format!(
                        "{}/repos/{}/{}/actions/workflows/{}/dispatches",
                        trigger.github_api_base_url.trim_end_matches('/'),
                        owner,
                        repo,
                        workflow_file
                    ),
                    branch: trigger.branch.clone(),
                    credential: Credential::Bearer(token),
                }))
            }
        }
    }

    pub fn mode(&self) -> TriggerMode {
        match self {
            TriggerStrategy::Cloud(_) => TriggerMode::Cloud,
            TriggerStrategy::GithubDispatch(_) => TriggerMode::GithubDispatch,
        }
    }

    fn build_request(&self, job: &SnapshotJob) -> Result<OutboundRequest, RequestError> {
        let encode_err =
            |e: serde_json::Error| RequestError::Decoding(format!("Failed to encode payload: {}", e));
        match self {
            TriggerStrategy::Cloud(target) => {
                let body = CloudTriggerBody {
                    deployment: target.deployment.as_ref(),
                    payload: CloudPayload {
                        application_type: APPLICATION_TYPE,
                        design_id: &job.design_id,
                        email: job.notify_email.as_deref().unwrap_or(""),
                        asset_location: &job.asset_location,
                    },
                };
                let mut request =
                    OutboundRequest::post(&target.endpoint, serde_json::to_value(&body).map_err(encode_err)?)
                        .credential(&target.credential)
                        .header("Referer", target.referer.clone());
                if let Some(system_id) = &target.system_id {
                    request = request.header("SystemID", system_id.clone());
                }
                Ok(request)
            }
            TriggerStrategy::GithubDispatch(target) => {
                let body = DispatchBody {
                    git_ref: &target.branch,
                    inputs: DispatchInputs {
                        content_id: &job.design_id,
                        asset_location: &job.asset_location,
                    },
                };
                Ok(
                    OutboundRequest::post(&target.endpoint, serde_json::to_value(&body).map_err(encode_err)?)
                        .credential(&target.credential)
                        .header("Accept", GITHUB_ACCEPT)
                        .header("X-GitHub-Api-Version", GITHUB_API_VERSION),
                )
            }
        }
    }
}

pub struct SnapshotTrigger {
    transport: Arc<dyn HttpTransport>,
    locator: AssetLocator,
    strategy: TriggerStrategy,
}

impl SnapshotTrigger {
    pub fn new(
        locator: AssetLocator,
        strategy: TriggerStrategy,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            locator,
            strategy,
        }
    }

    pub fn from_config(
        config: &SnapshotConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, SnapshotError> {
        Ok(Self::new(
            AssetLocator::new(&config.assets.base_url),
            TriggerStrategy::from_config(config)?,
            transport,
        ))
    }

    /// Dispatch the render and return the job with its predicted asset URL.
    /// Does not wait for the render to finish.
    pub async fn trigger_snapshot(
        &self,
        design_id: &str,
        notify_email: Option<&str>,
    ) -> Result<SnapshotJob, RequestError> {
        let job = SnapshotJob {
            design_id: design_id.to_string(),
            asset_location: self.locator.asset_location(design_id),
            notify_email: notify_email.map(str::to_string),
        };

        let request = self.strategy.build_request(&job)?;
        self.transport.post_json(request).await?.ensure_success()?;
        info!(
            design_id = %job.design_id,
            mode = ?self.strategy.mode(),
            asset_location = %job.asset_location,
            "Snapshot render triggered"
        );

        Ok(job)
    }
}
