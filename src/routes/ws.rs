// WebSocket handler: pushes a dashboard snapshot on connect and after every store update

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::DashboardSnapshot;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements the ws client count on drop (connect = +1, drop = -1).
struct WsClientGuard(Arc<AtomicUsize>);

impl Drop for WsClientGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_devices(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let store = state.store.clone();
    let conn_count = state.ws_clients.clone();
    ws.on_upgrade(move |socket| async move {
        // Subscribe before taking the initial snapshot so no update falls in between.
        let mut rx = store.subscribe();
        let initial = store.snapshot();
        if let Err(e) = stream_devices(socket, initial, &mut rx, conn_count).await {
            tracing::info!("Devices stream error: {}", e);
        }
    })
}

async fn stream_devices(
    mut socket: WebSocket,
    initial: DashboardSnapshot,
    rx: &mut broadcast::Receiver<DashboardSnapshot>,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsClientGuard(conn_count);
    tracing::info!("Client connected to devices stream");

    if !send_snapshot(&mut socket, &initial).await? {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                let snapshot = match result {
                    Ok(s) => s,
                    // Only the latest state matters; skip what the client missed.
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::debug!(skipped = n, "devices stream lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if !send_snapshot(&mut socket, &snapshot).await? {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Sends one snapshot as JSON text. `Ok(false)` means the client is gone or too slow.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &DashboardSnapshot) -> anyhow::Result<bool> {
    let json = serde_json::to_string(snapshot)?;
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    Ok(matches!(r, Ok(Ok(()))))
}
