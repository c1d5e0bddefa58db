// Client for the backend VM status endpoint

use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;
use tracing::instrument;

use crate::error::FetchError;
use crate::models::{Device, DeviceStatus};
use crate::version::USER_AGENT;

/// Per-request budget, enforced by the HTTP client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can report the current status of one device.
///
/// The poller only depends on this trait, so tests can stand in a scripted source.
pub trait StatusSource: Send + Sync + 'static {
    fn fetch_status(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<DeviceStatus, FetchError>> + Send;
}

/// `GET {base_url}/api/vm-status/{device}` over reqwest.
pub struct HttpStatusClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpStatusClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn status_url(&self, device: Device) -> String {
        format!("{}/api/vm-status/{}", self.base_url, device.name())
    }

    fn classify_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl StatusSource for HttpStatusClient {
    #[instrument(skip(self), fields(client = "http", operation = "fetch_status"))]
    async fn fetch_status(&self, device: Device) -> Result<DeviceStatus, FetchError> {
        let response = self
            .client
            .get(self.status_url(device))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if !status.is_success() {
            // Body is best-effort here; the status code alone is enough to report.
            let body = response.bytes().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify_error(e))?;
        parse_status(&body)
    }
}

/// Decodes a 2xx body. Only a body that is not a JSON object is an error; mistyped
/// fields inside an object degrade to missing.
pub fn parse_status(body: &[u8]) -> Result<DeviceStatus, FetchError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(FetchError::Decode("expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Pulls a human-readable message out of an error body: `message`, then FastAPI's `detail`.
pub fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "detail"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}
