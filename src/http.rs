//! HTTP Transport
//!
//! The one seam every remote call goes through. `ReqwestTransport` is the real
//! client; tests substitute a recording implementation of `HttpTransport`.

use crate::config::{AuthScheme, HttpConfig};
use crate::error::RequestError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// An outbound JSON POST.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl OutboundRequest {
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn credential(self, credential: &Credential) -> Self {
        match credential {
            Credential::Cookie(value) => self.header("Cookie", value.clone()),
            Credential::Bearer(token) => self.header("Authorization", format!("Bearer {}", token)),
            Credential::None => self,
        }
    }

    /// First header value with the given name, case-insensitive.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Any non-2xx status becomes `UnexpectedResponseCode` with the body verbatim.
    pub fn ensure_success(self) -> Result<Self, RequestError> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(RequestError::UnexpectedResponseCode {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// How a request authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Cookie(String),
    Bearer(String),
    None,
}

impl Credential {
    pub fn from_token(token: Option<&str>, scheme: AuthScheme) -> Self {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => match scheme {
                AuthScheme::Cookie => Credential::Cookie(token.to_string()),
                AuthScheme::Bearer => Credential::Bearer(token.to_string()),
            },
            None => Credential::None,
        }
    }
}

// Tokens never reach logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Cookie(_) => f.write_str("Cookie(<redacted>)"),
            Credential::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Credential::None => f.write_str("None"),
        }
    }
}

/// Outbound HTTP seam.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `request.body` as JSON and return the status and body.
    ///
    /// Only network-level failures are errors here; status handling is up
    /// to the caller.
    async fn post_json(&self, request: OutboundRequest) -> Result<HttpResponse, RequestError>;
}

fn map_http_error(error: reqwest::Error) -> RequestError {
    if error.is_timeout() {
        RequestError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        RequestError::Transport(format!("Connection error: {}", error))
    } else {
        RequestError::Transport(format!("HTTP error: {}", error))
    }
}

/// `reqwest`-backed transport with explicit connect and request timeouts.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, RequestError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("kanvas-snapshot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RequestError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: OutboundRequest) -> Result<HttpResponse, RequestError> {
        debug!(url = %request.url, "POST");
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(map_http_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_http_error)?;
        debug!(status, "Response received");

        Ok(HttpResponse { status, body })
    }
}

/// In-memory transport for tests, here and in the integration suite.
#[cfg(any(test, feature = "test_utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued outcomes in order and records every request.
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<HttpResponse, RequestError>>>,
        requests: Mutex<Vec<OutboundRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(self, error: RequestError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<OutboundRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn post_json(&self, request: OutboundRequest) -> Result<HttpResponse, RequestError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RequestError::Transport("no response queued".into())))
        }
    }
}
