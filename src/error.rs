// Error types for the status client and device parsing

use std::time::Duration;

use crate::models::Device;

/// Text shown when a failure carries no usable message.
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch data";

/// Why a single device poll failed. Never fatal: the poller records it on the device.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),
    #[error("{0}")]
    Transport(String),
    /// Non-2xx response; `message` is the server-supplied text when the body had one.
    #[error("Request failed with status code {status}")]
    Server { status: u16, message: Option<String> },
    #[error("invalid status payload: {0}")]
    Decode(String),
}

impl FetchError {
    /// Device-level error text: server message, then transport text, then a generic fallback.
    pub fn user_message(&self) -> String {
        let text = match self {
            FetchError::Server {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            other => other.to_string(),
        };
        if text.trim().is_empty() {
            GENERIC_FETCH_ERROR.to_string()
        } else {
            text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device '{0}'")]
pub struct ParseDeviceError(pub String);

impl ParseDeviceError {
    /// Names the caller could have used.
    pub fn supported() -> Vec<&'static str> {
        Device::ALL.iter().map(|d| d.name()).collect()
    }
}
