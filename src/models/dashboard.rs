// Read-side views handed to the rendering layer

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::health::{HealthLevel, MetricSeverity, metric_severity};
use super::status::display_percent;
use super::{Device, DeviceInventory, DeviceState};

/// One metric as shown on a card: display value (absent = 0) and its band.
/// `severity` is `None` when the backend did not report the metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricView {
    pub value: f64,
    pub severity: Option<MetricSeverity>,
}

impl MetricView {
    fn from_reported(value: Option<f64>) -> Self {
        Self {
            value: display_percent(value),
            severity: value.map(metric_severity),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceView {
    pub device: Device,
    pub inventory: DeviceInventory,
    pub power_state: Option<String>,
    pub cpu: MetricView,
    pub memory: MetricView,
    pub disk: MetricView,
    pub loading: bool,
    pub error: Option<String>,
    pub health: HealthLevel,
    pub online: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub last_updated: Option<String>,
}

impl DeviceView {
    pub fn new(device: Device, state: &DeviceState) -> Self {
        let status = state.status.as_ref();
        Self {
            device,
            inventory: device.inventory(),
            power_state: status.and_then(|s| s.power_state.clone()),
            cpu: MetricView::from_reported(status.and_then(|s| s.cpu_usage)),
            memory: MetricView::from_reported(status.and_then(|s| s.memory_usage)),
            disk: MetricView::from_reported(status.and_then(|s| s.disk_usage)),
            loading: state.loading,
            error: state.error.clone(),
            health: state.health(),
            online: state.is_online(),
            fetched_at: state.fetched_at,
            last_updated: status.and_then(|s| s.last_updated.clone()),
        }
    }
}

/// Fleet-wide counts for the overview strip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
    pub loading: usize,
}

impl FleetSummary {
    pub fn from_views(views: &[DeviceView]) -> Self {
        let mut s = FleetSummary {
            total: views.len(),
            ..Default::default()
        };
        for v in views {
            if v.online {
                s.online += 1;
            } else {
                s.offline += 1;
            }
            match v.health {
                HealthLevel::Healthy => s.healthy += 1,
                HealthLevel::Warning => s.warning += 1,
                HealthLevel::Critical => s.critical += 1,
            }
            if v.loading {
                s.loading += 1;
            }
        }
        s
    }
}

/// Whole-dashboard snapshot: served on GET /api/devices and pushed on /ws/devices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub timestamp: DateTime<Utc>,
    pub devices: Vec<DeviceView>,
    pub summary: FleetSummary,
}

impl DashboardSnapshot {
    /// Builds one view per `(device, state)` pair, keeping the given order.
    pub fn build<'a>(states: impl IntoIterator<Item = (Device, &'a DeviceState)>) -> Self {
        let devices: Vec<DeviceView> = states
            .into_iter()
            .map(|(d, s)| DeviceView::new(d, s))
            .collect();
        let summary = FleetSummary::from_views(&devices);
        Self {
            timestamp: Utc::now(),
            devices,
            summary,
        }
    }

    pub fn device(&self, device: Device) -> Option<&DeviceView> {
        self.devices.iter().find(|v| v.device == device)
    }
}
