// Status endpoint payload

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Power state the backend reports for a VM that is up.
pub const POWER_STATE_RUNNING: &str = "running";

/// Body of a successful `GET /api/vm-status/{device}`.
///
/// Every field is optional. A missing metric is shown as 0% but classified as unknown;
/// a missing power state counts as offline. Fields of the wrong type read as missing
/// instead of rejecting the payload; numeric strings are accepted for metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub power_state: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_percent",
        skip_serializing_if = "Option::is_none"
    )]
    pub cpu_usage: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_percent",
        skip_serializing_if = "Option::is_none"
    )]
    pub memory_usage: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_percent",
        skip_serializing_if = "Option::is_none"
    )]
    pub disk_usage: Option<f64>,
    /// Backend's own timestamp, passed through untouched.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

impl DeviceStatus {
    pub fn is_running(&self) -> bool {
        self.power_state.as_deref() == Some(POWER_STATE_RUNNING)
    }
}

/// Display value for an optional percentage: absent reads as 0.
pub fn display_percent(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Number or numeric string; anything else (bool, object, garbage text, non-finite) is `None`.
fn lenient_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let percent = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(percent.filter(|p| p.is_finite()))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
