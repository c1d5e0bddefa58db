// Domain models: inventory, status payload, poll state, health and dashboard views

mod dashboard;
mod device;
mod health;
mod state;
mod status;

pub use dashboard::{DashboardSnapshot, DeviceView, FleetSummary, MetricView};
pub use device::{Device, DeviceInventory};
pub use health::{
    CRITICAL_THRESHOLD, ELEVATED_THRESHOLD, HealthLevel, MetricSeverity, classify, metric_severity,
};
pub use state::DeviceState;
pub use status::{DeviceStatus, POWER_STATE_RUNNING, display_percent};
