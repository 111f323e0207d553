//! HTTP client: submit a query to `POST /api/query`, probe `GET /api/health`.

use std::time::Duration;

use crate::messages::{ErrorBody, QueryRequest, QueryResponse};

/// Fallback shown when the server fails without a usable `error` message.
pub const FAILED_RESPONSE_MESSAGE: &str = "Failed to get response";
/// Fallback shown when the request never produced a response.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";
pub const UNHEALTHY_MESSAGE: &str = "Server is not running properly. Please restart the app.";
pub const UNREACHABLE_MESSAGE: &str = "Cannot connect to server. Is the app running?";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure of a query round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// No response: connection refused, DNS failure, reset.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    /// Non-2xx status, with the body's `error` field when present.
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Server { status: u16, message: Option<String> },
    /// 2xx status with a body that is not a valid answer.
    #[error("malformed response body: {0}")]
    Parse(String),
}

impl ClientError {
    /// Text for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Server { message: None, .. } | ClientError::Parse(_) => {
                FAILED_RESPONSE_MESSAGE.to_string()
            }
            ClientError::Transport(_) => GENERIC_ERROR_MESSAGE.to_string(),
            ClientError::Timeout => TIMEOUT_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Parse(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Outcome of the startup liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// The server answered with a non-2xx status.
    Unhealthy(u16),
    /// The request failed before any response.
    Unreachable(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// Banner text for an unhealthy server, `None` when healthy.
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            HealthStatus::Healthy => None,
            HealthStatus::Unhealthy(_) => Some(UNHEALTHY_MESSAGE),
            HealthStatus::Unreachable(_) => Some(UNREACHABLE_MESSAGE),
        }
    }
}

/// HTTP client bound to one question-answering server.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl Client {
    /// Build a client for `base_url` (e.g. `http://127.0.0.1:5000`).
    /// `request_timeout` bounds each query round trip; `None` waits indefinitely.
    pub fn new(base_url: &str, request_timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        })
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Submit `query` and decode the answer.
    pub async fn query(&self, query: &str) -> Result<QueryResponse, ClientError> {
        let url = self.api_url("query");
        tracing::debug!(%url, query_len = query.len(), "submitting query");

        let response = self
            .http
            .post(&url)
            .json(&QueryRequest::new(query))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(%status, body_len = body.len(), "undecodable answer body");
            ClientError::Parse(e.to_string())
        })
    }

    /// Probe the health endpoint once. The body is never examined.
    pub async fn health(&self) -> HealthStatus {
        let url = self.api_url("health");
        match self
            .http
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::info!(%url, "server healthy");
                HealthStatus::Healthy
            }
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::warn!(%url, status, "server unhealthy");
                HealthStatus::Unhealthy(status)
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "server unreachable");
                HealthStatus::Unreachable(e.to_string())
            }
        }
    }
}
