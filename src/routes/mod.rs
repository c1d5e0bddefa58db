// HTTP + WebSocket routes: the read side of the poll store plus the manual refresh trigger

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tower_http::cors::{Any, CorsLayer};

use crate::poller::RefreshTrigger;
use crate::store::StatusStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<StatusStore>,
    pub(crate) refresh: RefreshTrigger,
    pub(crate) ws_clients: Arc<AtomicUsize>,
}

pub fn app(
    store: Arc<StatusStore>,
    refresh: RefreshTrigger,
    ws_clients: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        store,
        refresh,
        ws_clients,
    };
    Router::new()
        .route("/", get(|| async { "labwatch: lab VM telemetry" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/devices", get(http::devices_handler)) // GET /api/devices
        .route("/api/devices/{name}", get(http::device_handler)) // GET /api/devices/{name}
        .route("/api/refresh", post(http::refresh_handler)) // POST /api/refresh
        .route("/ws/devices", get(ws::ws_devices)) // WS /ws/devices
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
