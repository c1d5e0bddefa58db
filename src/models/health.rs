// Health classification: pure functions over a device's latest poll result

use serde::Serialize;

use super::DeviceStatus;

/// Above this a metric is critical (red), and cpu/memory above it put a running VM in warning.
pub const CRITICAL_THRESHOLD: f64 = 70.0;
/// Above this (and up to the critical threshold) a metric is elevated (amber).
pub const ELEVATED_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Healthy,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSeverity {
    Normal,
    Elevated,
    Critical,
}

/// Severity band for one percentage: >70 critical, >50 elevated, otherwise normal.
pub fn metric_severity(percent: f64) -> MetricSeverity {
    if percent > CRITICAL_THRESHOLD {
        MetricSeverity::Critical
    } else if percent > ELEVATED_THRESHOLD {
        MetricSeverity::Elevated
    } else {
        MetricSeverity::Normal
    }
}

/// Overall health of a device.
///
/// Missing data, a recorded error, or any power state other than `running` is critical.
/// A running VM with cpu or memory above 70% is in warning. Unknown metrics never
/// raise the level on their own.
pub fn classify(status: Option<&DeviceStatus>, error: Option<&str>) -> HealthLevel {
    let Some(status) = status else {
        return HealthLevel::Critical;
    };
    if error.is_some() || !status.is_running() {
        return HealthLevel::Critical;
    }
    let pressured = |v: Option<f64>| v.is_some_and(|p| p > CRITICAL_THRESHOLD);
    if pressured(status.cpu_usage) || pressured(status.memory_usage) {
        HealthLevel::Warning
    } else {
        HealthLevel::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_band_edges() {
        assert_eq!(metric_severity(0.0), MetricSeverity::Normal);
        assert_eq!(metric_severity(50.0), MetricSeverity::Normal);
        assert_eq!(metric_severity(50.1), MetricSeverity::Elevated);
        assert_eq!(metric_severity(70.0), MetricSeverity::Elevated);
        assert_eq!(metric_severity(70.1), MetricSeverity::Critical);
    }

    #[test]
    fn thresholds_are_strict() {
        let status = DeviceStatus {
            power_state: Some("running".into()),
            cpu_usage: Some(70.0),
            memory_usage: Some(70.0),
            ..Default::default()
        };
        assert_eq!(classify(Some(&status), None), HealthLevel::Healthy);
    }
}
