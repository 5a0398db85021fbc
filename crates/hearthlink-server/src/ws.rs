//! `WebSocket` handler for live status snapshots.
//!
//! Clients connect to `GET /ws/status` and first receive the current
//! snapshot, then every snapshot the game server posts afterwards. A
//! session reset arrives as `{}`.
//!
//! If a client falls behind, lagged snapshots are silently skipped and
//! the client resumes from the most recent one.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use hearthlink_types::StatusDocument;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming status snapshots.
///
/// # Route
///
/// `GET /ws/status`
pub async fn ws_status(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: send the current snapshot, then
/// forward each new one as a text frame.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before reading the current snapshot so nothing posted in
    // between is missed.
    let mut rx = state.relay.subscribe_status();
    let current = state.relay.current_status().await;
    if !send_snapshot(&mut socket, &current).await {
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        if !send_snapshot(&mut socket, &snapshot).await {
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("status stream closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Serialize and send one snapshot. Returns `false` once the client is gone.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &StatusDocument) -> bool {
    let json = match serde_json::to_string(snapshot) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize status snapshot: {e}");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!("WebSocket client disconnected (send failed)");
        return false;
    }
    true
}
