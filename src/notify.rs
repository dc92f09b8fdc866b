//! Email notification once a snapshot is ready.

use crate::config::SnapshotConfig;
use crate::error::RequestError;
use crate::http::{Credential, HttpTransport, OutboundRequest};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub const NOTIFICATION_SUBJECT: &str = "Kanvas Snapshot";

pub struct NotificationDispatcher {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    credential: Credential,
}

impl NotificationDispatcher {
    pub fn new(config: &SnapshotConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            endpoint: format!(
                "{}/api/integrations/snapshot/email",
                config.cloud.api_base_url.trim_end_matches('/')
            ),
            credential: Credential::from_token(
                config.cloud.effective_token(&config.meshery),
                config.cloud.auth,
            ),
        }
    }

    /// Ask Meshery Cloud to email `email` a link to `asset_location`.
    pub async fn request_email_notification(
        &self,
        email: &str,
        asset_location: &str,
    ) -> Result<(), RequestError> {
        let body = json!({
            "to": email,
            "subject": NOTIFICATION_SUBJECT,
            "image_uri": asset_location,
        });
        let request = OutboundRequest::post(self.endpoint.clone(), body).credential(&self.credential);

        self.transport.post_json(request).await?.ensure_success()?;
        info!(to = %email, "Snapshot email notification requested");
        Ok(())
    }
}
