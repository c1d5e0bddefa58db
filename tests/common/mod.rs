// Shared test helpers: a scripted status source standing in for the backend
#![allow(dead_code)]

use labwatch::error::FetchError;
use labwatch::models::{Device, DeviceStatus};
use labwatch::status_client::{REQUEST_TIMEOUT, StatusSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::time::Duration;

/// What the scripted backend answers for one device.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(DeviceStatus),
    /// Answers with the status after a delay.
    Delayed(Duration, DeviceStatus),
    Server { status: u16, message: Option<String> },
    Transport(String),
    /// Never answers; the request times out after the client budget.
    Hang,
}

#[derive(Default)]
struct Inner {
    replies: Mutex<HashMap<Device, Reply>>,
    calls: Mutex<HashMap<Device, usize>>,
}

/// Clones share the same script and call counters.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    inner: Arc<Inner>,
}

impl ScriptedSource {
    /// Every device answers `reply` until told otherwise.
    pub fn uniform(reply: Reply) -> Self {
        let source = Self::default();
        source.set_all(reply);
        source
    }

    pub fn set(&self, device: Device, reply: Reply) {
        self.inner.replies.lock().unwrap().insert(device, reply);
    }

    pub fn set_all(&self, reply: Reply) {
        for d in Device::ALL {
            self.set(d, reply.clone());
        }
    }

    pub fn calls(&self, device: Device) -> usize {
        self.inner
            .calls
            .lock()
            .unwrap()
            .get(&device)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.inner.calls.lock().unwrap().values().sum()
    }
}

impl StatusSource for ScriptedSource {
    async fn fetch_status(&self, device: Device) -> Result<DeviceStatus, FetchError> {
        let reply = {
            *self.inner.calls.lock().unwrap().entry(device).or_default() += 1;
            self.inner.replies.lock().unwrap().get(&device).cloned()
        };
        match reply {
            Some(Reply::Status(s)) => Ok(s),
            Some(Reply::Delayed(delay, s)) => {
                tokio::time::sleep(delay).await;
                Ok(s)
            }
            Some(Reply::Server { status, message }) => Err(FetchError::Server { status, message }),
            Some(Reply::Transport(m)) => Err(FetchError::Transport(m)),
            Some(Reply::Hang) => {
                tokio::time::sleep(REQUEST_TIMEOUT).await;
                Err(FetchError::Timeout(REQUEST_TIMEOUT))
            }
            None => Err(FetchError::Transport(format!("no reply scripted for {}", device))),
        }
    }
}

pub fn running(cpu: f64, memory: f64, disk: f64) -> DeviceStatus {
    DeviceStatus {
        power_state: Some("running".into()),
        cpu_usage: Some(cpu),
        memory_usage: Some(memory),
        disk_usage: Some(disk),
        last_updated: None,
    }
}

pub fn stopped() -> DeviceStatus {
    DeviceStatus {
        power_state: Some("stopped".into()),
        ..Default::default()
    }
}
