// Model tests: backend payload parsing, device names, dashboard view JSON

use labwatch::models::*;

#[test]
fn test_device_status_parses_backend_payload_camel_case() {
    let json = r#"{
        "deviceName": "dc01",
        "powerState": "running",
        "cpuUsage": 55,
        "memoryUsage": 71.5,
        "diskUsage": 12.0,
        "lastUpdated": "2024-05-01T12:00:00",
        "status": "success"
    }"#;
    let status: DeviceStatus = serde_json::from_str(json).unwrap();
    assert!(status.is_running());
    assert_eq!(status.cpu_usage, Some(55.0));
    assert_eq!(status.memory_usage, Some(71.5));
    assert_eq!(classify(Some(&status), None), HealthLevel::Warning);
}

#[test]
fn test_device_status_tolerates_missing_and_null_fields() {
    let status: DeviceStatus =
        serde_json::from_str(r#"{"powerState":"stopped","cpuUsage":null}"#).unwrap();
    assert!(!status.is_running());
    assert_eq!(status.cpu_usage, None);
    assert_eq!(display_percent(status.disk_usage), 0.0);

    let empty: DeviceStatus = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, DeviceStatus::default());
    assert_eq!(classify(Some(&empty), None), HealthLevel::Critical);
}

#[test]
fn test_classify_matches_card_rules() {
    let healthy = DeviceStatus {
        power_state: Some("running".into()),
        cpu_usage: Some(40.0),
        memory_usage: Some(30.0),
        disk_usage: Some(20.0),
        last_updated: None,
    };
    assert_eq!(classify(Some(&healthy), None), HealthLevel::Healthy);
    assert_eq!(
        classify(Some(&healthy), Some("timeout")),
        HealthLevel::Critical
    );
    assert_eq!(classify(None, None), HealthLevel::Critical);

    // Disk pressure alone never moves a running VM out of healthy.
    let full_disk = DeviceStatus {
        disk_usage: Some(99.0),
        ..healthy.clone()
    };
    assert_eq!(classify(Some(&full_disk), None), HealthLevel::Healthy);

    let paused = DeviceStatus {
        power_state: Some("paused".into()),
        ..healthy
    };
    assert_eq!(classify(Some(&paused), None), HealthLevel::Critical);
}

#[test]
fn test_device_serializes_as_endpoint_name() {
    assert_eq!(
        serde_json::to_string(&Device::UbuWebServ).unwrap(),
        "\"UbuWebServ\""
    );
    let d: Device = serde_json::from_str("\"dc01\"").unwrap();
    assert_eq!(d, Device::Dc01);
    assert_eq!(Device::Kali.to_string(), "Kali");
    assert_eq!(Device::Pfsense.inventory().ip, "192.168.0.1");
}

#[test]
fn test_unknown_device_name_is_rejected() {
    let err = "router9".parse::<Device>().unwrap_err();
    assert_eq!(err.to_string(), "unknown device 'router9'");
    assert_eq!(
        labwatch::error::ParseDeviceError::supported(),
        vec!["pfsense", "dc01", "UbuWebServ", "WinWork", "Kali"]
    );
}

#[test]
fn test_device_view_json_shape() {
    let state = DeviceState {
        status: Some(DeviceStatus {
            power_state: Some("running".into()),
            cpu_usage: Some(65.0),
            memory_usage: None,
            disk_usage: Some(80.0),
            last_updated: None,
        }),
        loading: false,
        error: None,
        fetched_at: None,
    };
    let view = DeviceView::new(Device::WinWork, &state);
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["device"], "WinWork");
    assert_eq!(json["powerState"], "running");
    assert_eq!(json["health"], "healthy");
    assert_eq!(json["online"], true);
    assert_eq!(json["cpu"]["severity"], "elevated");
    assert_eq!(json["disk"]["severity"], "critical");
    assert_eq!(json["memory"]["value"], 0.0);
    assert!(json["memory"]["severity"].is_null());
    assert_eq!(json["inventory"]["role"], "Windows Workstation");
}

#[test]
fn test_errored_device_is_offline_in_summary() {
    let ok = DeviceState {
        status: Some(DeviceStatus {
            power_state: Some("running".into()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let failed = DeviceState {
        error: Some("Failed to fetch data".into()),
        ..Default::default()
    };
    let loading = DeviceState {
        loading: true,
        ..Default::default()
    };
    let snap = DashboardSnapshot::build([
        (Device::Pfsense, &ok),
        (Device::Dc01, &failed),
        (Device::Kali, &loading),
    ]);
    assert_eq!(
        snap.summary,
        FleetSummary {
            total: 3,
            online: 1,
            offline: 2,
            healthy: 1,
            warning: 0,
            critical: 2,
            loading: 1,
        }
    );
    assert!(snap.device(Device::WinWork).is_none());
}

#[test]
fn test_mistyped_fields_degrade_to_unknown() {
    let json = r#"{
        "powerState": "running",
        "cpuUsage": {"value": 45},
        "memoryUsage": "30.5",
        "diskUsage": true,
        "lastUpdated": 1714564800
    }"#;
    let status: DeviceStatus = serde_json::from_str(json).unwrap();
    assert_eq!(status.cpu_usage, None);
    assert_eq!(status.memory_usage, Some(30.5));
    assert_eq!(status.disk_usage, None);
    assert_eq!(status.last_updated, None);

    let state = DeviceState {
        status: Some(status),
        ..Default::default()
    };
    let view = DeviceView::new(Device::Dc01, &state);
    assert_eq!(view.health, HealthLevel::Healthy);
    assert!(view.online);
    assert_eq!(view.cpu.value, 0.0);
    assert_eq!(view.cpu.severity, None);
    assert_eq!(view.memory.severity, Some(MetricSeverity::Normal));
}

#[test]
fn test_non_string_power_state_reads_as_offline() {
    let status: DeviceStatus =
        serde_json::from_str(r#"{"powerState":1,"cpuUsage":10}"#).unwrap();
    assert_eq!(status.power_state, None);
    assert_eq!(status.cpu_usage, Some(10.0));
    assert_eq!(classify(Some(&status), None), HealthLevel::Critical);
}
