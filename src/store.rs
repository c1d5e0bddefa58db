// Per-device poll state shared between the poller (writer) and the routes (readers)

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::models::{DashboardSnapshot, Device, DeviceState, DeviceStatus};

/// Keyed state for the fixed device set.
///
/// Writes are crate-private and only the poller performs them. Every write replaces one
/// device's entry under a short, non-async critical section and then publishes a fresh
/// [`DashboardSnapshot`] to subscribers.
pub struct StatusStore {
    states: RwLock<HashMap<Device, DeviceState>>,
    updates: broadcast::Sender<DashboardSnapshot>,
}

impl StatusStore {
    pub fn new(broadcast_capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(broadcast_capacity.max(1));
        let states = Device::ALL
            .into_iter()
            .map(|d| (d, DeviceState::default()))
            .collect();
        Self {
            states: RwLock::new(states),
            updates,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardSnapshot> {
        self.updates.subscribe()
    }

    pub fn get(&self, device: Device) -> DeviceState {
        self.read().get(&device).cloned().unwrap_or_default()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let states = self.read();
        DashboardSnapshot::build(Device::ALL.into_iter().map(|d| {
            let state = states.get(&d).unwrap_or(&EMPTY_STATE);
            (d, state)
        }))
    }

    /// Marks `device` as in flight. Returns `None` when a request for it is already
    /// outstanding; the loading flag is cleared when the returned guard drops.
    pub(crate) fn begin_refresh(self: &Arc<Self>, device: Device) -> Option<LoadingGuard> {
        {
            let mut states = self.write();
            let state = states.entry(device).or_default();
            if state.loading {
                return None;
            }
            state.loading = true;
        }
        self.publish();
        Some(LoadingGuard {
            store: Arc::clone(self),
            device,
        })
    }

    pub(crate) fn record_success(&self, device: Device, status: DeviceStatus) {
        self.update(device, |state| {
            state.status = Some(status);
            state.error = None;
        });
    }

    /// Stores the error and drops the previous status so the entry holds exactly one of the two.
    pub(crate) fn record_failure(&self, device: Device, message: String) {
        self.update(device, |state| {
            state.status = None;
            state.error = Some(message);
        });
    }

    fn update(&self, device: Device, apply: impl FnOnce(&mut DeviceState)) {
        {
            let mut states = self.write();
            let state = states.entry(device).or_default();
            apply(state);
            state.fetched_at = Some(Utc::now());
        }
        self.publish();
    }

    fn finish_refresh(&self, device: Device) {
        {
            let mut states = self.write();
            states.entry(device).or_default().loading = false;
        }
        self.publish();
    }

    fn publish(&self) {
        if self.updates.receiver_count() > 0 {
            // A lagging or vanished subscriber is its own problem.
            let _ = self.updates.send(self.snapshot());
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Device, DeviceState>> {
        self.states.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Device, DeviceState>> {
        self.states.write().unwrap_or_else(PoisonError::into_inner)
    }
}

static EMPTY_STATE: DeviceState = DeviceState {
    status: None,
    loading: false,
    error: None,
    fetched_at: None,
};

/// Clears a device's loading flag on drop, whatever the outcome of the request.
pub(crate) struct LoadingGuard {
    store: Arc<StatusStore>,
    device: Device,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.store.finish_refresh(self.device);
    }
}
