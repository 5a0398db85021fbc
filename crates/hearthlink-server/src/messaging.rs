//! Messaging platform endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/webhook` | LINE webhook; `clear` resets the session |
//! | `POST` | `/line-send-message` | Push a message to one user |
//! | `POST` | `/send-message` | Alias of `/line-send-message` |
//! | `POST` | `/line-broadcast` | Broadcast a message to every subscriber |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use hearthlink_types::WebhookPayload;

use crate::error::ApiError;
use crate::handlers::OkResponse;
use crate::state::AppState;

/// Request body for `POST /line-send-message`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Recipient user id.
    #[serde(default)]
    pub user_id: String,
    /// Message text.
    #[serde(default)]
    pub message: String,
}

/// Request body for `POST /line-broadcast`.
#[derive(Debug, serde::Deserialize)]
pub struct BroadcastRequest {
    /// Message text.
    #[serde(default)]
    pub message: String,
}

/// Receive a webhook delivery from the messaging platform.
///
/// Only the first event of the batch is inspected. An empty batch (sent by
/// the platform when verifying the webhook URL) is acknowledged with no
/// effect.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let outcome = state.relay.handle_inbound_events(&body.events).await?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "outcome": outcome,
    })))
}

/// Push a text message to a single user.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    state.relay.notify_user(&body.user_id, &body.message).await?;

    Ok(Json(OkResponse::new("Sent successfully")))
}

/// Broadcast a text message to every subscriber.
pub async fn broadcast(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BroadcastRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    state.relay.notify_all(&body.message).await?;

    Ok(Json(OkResponse::new("Broadcast sent")))
}
