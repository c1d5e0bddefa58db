// GET/POST handlers: version, device views, manual refresh

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::AppState;
use crate::error::ParseDeviceError;
use crate::models::Device;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/devices — every device view plus the fleet summary.
pub(super) async fn devices_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.snapshot())
}

/// GET /api/devices/{name} — one device view; 404 with the supported names otherwise.
pub(super) async fn device_handler(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> axum::response::Response {
    let device = match name.parse::<Device>() {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "message": e.to_string(),
                    "supportedDevices": ParseDeviceError::supported(),
                })),
            )
                .into_response();
        }
    };
    match state.store.snapshot().device(device) {
        Some(view) => Json(view.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// POST /api/refresh — queues a full refresh round; same effect as a scheduled tick.
pub(super) async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.refresh.trigger() {
        tracing::info!(operation = "manual_refresh", "Manual refresh requested");
        (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "status": "accepted" })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "message": "poller is not running" })),
        )
    }
}
