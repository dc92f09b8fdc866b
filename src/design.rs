//! Meshery design creation.
//!
//! Registers a Helm chart with the Meshery server as a design and extracts the
//! identifier the rest of the workflow keys off.

use crate::config::{ImportStyle, MesheryConfig};
use crate::error::RequestError;
use crate::http::{Credential, HttpTransport, OutboundRequest};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Source type segment used by the older `/api/pattern/<source type>` endpoint.
const HELM_CHART_SOURCE_SEGMENT: &str = "Helm%20Chart";

/// Everything needed to register one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignRequest {
    pub chart_uri: String,
    pub design_name: String,
    pub notify_email: Option<String>,
}

/// A design stored by Meshery. The id is opaque and never re-validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignRecord {
    pub design_id: String,
}

#[derive(Serialize)]
struct DesignPayload<'a> {
    save: bool,
    url: &'a str,
    name: &'a str,
    email: &'a str,
}

pub struct DesignClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    import_style: ImportStyle,
    credential: Credential,
}

impl DesignClient {
    pub fn new(config: &MesheryConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            import_style: config.import_style,
            credential: Credential::from_token(config.provider_token.as_deref(), config.auth),
        }
    }

    pub fn endpoint(&self) -> String {
        match self.import_style {
            ImportStyle::Import => format!("{}/api/pattern/import", self.base_url),
            ImportStyle::SourceType => {
                format!("{}/api/pattern/{}", self.base_url, HELM_CHART_SOURCE_SEGMENT)
            }
        }
    }

    /// Create a design for `request.chart_uri`. No retries: a transport
    /// failure surfaces immediately.
    pub async fn create_design(&self, request: &DesignRequest) -> Result<DesignRecord, RequestError> {
        let payload = DesignPayload {
            save: true,
            url: &request.chart_uri,
            name: &request.design_name,
            email: request.notify_email.as_deref().unwrap_or(""),
        };
        let body = serde_json::to_value(&payload)
            .map_err(|e| RequestError::Decoding(format!("Failed to encode payload: {}", e)))?;

        let outbound = OutboundRequest::post(self.endpoint(), body)
            .header("Origin", self.base_url.clone())
            .credential(&self.credential);

        let response = self.transport.post_json(outbound).await?.ensure_success()?;
        let design_id = parse_design_id(&response.body)?;
        info!(design_id = %design_id, "Created Meshery design");

        Ok(DesignRecord { design_id })
    }
}

/// The id is the `id` string of the first element of a JSON array.
pub fn parse_design_id(body: &str) -> Result<String, RequestError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        RequestError::Decoding(format!("failed to decode json. body: {}, error: {}", body, e))
    })?;

    let designs = value.as_array().ok_or_else(|| {
        RequestError::Decoding(format!("expected a JSON array of designs, got: {}", body))
    })?;

    let first = designs
        .first()
        .ok_or_else(|| RequestError::Decoding("response contained no designs".to_string()))?;

    first
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            RequestError::Decoding("failed to extract design ID from response".to_string())
        })
}
