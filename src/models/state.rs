// Per-device poll state held by the store

use chrono::{DateTime, Utc};
use super::DeviceStatus;
use super::health::{HealthLevel, classify};

/// Latest result for one device plus its in-flight flag.
///
/// After a refresh settles exactly one of `status` / `error` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    pub status: Option<DeviceStatus>,
    pub loading: bool,
    pub error: Option<String>,
    /// When the current status or error was recorded.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl DeviceState {
    pub fn health(&self) -> HealthLevel {
        classify(self.status.as_ref(), self.error.as_deref())
    }

    /// Online means the last successful poll reported `running` and no error has replaced it.
    pub fn is_online(&self) -> bool {
        self.error.is_none() && self.status.as_ref().is_some_and(|s| s.is_running())
    }
}
