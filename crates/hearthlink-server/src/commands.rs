//! Command queue endpoint handlers.
//!
//! The display client queues commands; the game server polls for `New`
//! ones and reports back on each.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/commands` | Queue a command |
//! | `GET` | `/commands` | List commands (`?status=New` drains the queue) |
//! | `POST` | `/commands/{id}` | Report a command's status |

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hearthlink_types::{CommandId, CommandStatus};

use crate::error::ApiError;
use crate::handlers::parse_optional_body;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /commands`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommandRequest {
    /// Instruction text for the game server.
    #[serde(default)]
    pub command: String,
    /// Messaging-platform user to notify when the command completes.
    #[serde(default)]
    pub user_id: String,
}

/// Request body for `POST /commands/{id}`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UpdateCommandRequest {
    /// New status; absent or empty means `Unknown`.
    pub status: Option<String>,
}

/// Query parameters for `GET /commands`.
#[derive(Debug, serde::Deserialize)]
pub struct CommandsQuery {
    /// Only return commands in this status.
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /commands
// ---------------------------------------------------------------------------

/// Queue a command. Fails with 503 until the game server has registered.
pub async fn create_command(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCommandRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let command = state
        .relay
        .append_command(&body.command, &body.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(command)))
}

// ---------------------------------------------------------------------------
// GET /commands
// ---------------------------------------------------------------------------

/// List commands in insertion order.
///
/// # Query Parameters
///
/// - `status`: filter by status. `New` marks every returned command as
///   `Sent`, so each command is handed to the game server once.
pub async fn list_commands(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CommandsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let filter = params
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(CommandStatus::parse);

    Ok(Json(state.relay.list_commands(filter.as_ref()).await))
}

// ---------------------------------------------------------------------------
// POST /commands/{id}
// ---------------------------------------------------------------------------

/// Report a command's status and notify the user who queued it.
///
/// An empty body is accepted and records `Unknown`. If the notification
/// fails the new status is kept and the request reports the delivery
/// error.
pub async fn update_command(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id_str) = path?;
    let id = parse_command_id(&id_str)?;
    let request: UpdateCommandRequest = parse_optional_body(&body)?.unwrap_or_default();

    let command = state
        .relay
        .update_command(id, request.status.as_deref())
        .await?;

    Ok(Json(command))
}

/// Parse a command id from the request path.
fn parse_command_id(s: &str) -> Result<CommandId, ApiError> {
    s.parse::<CommandId>()
        .map_err(|e| ApiError::BadRequest(format!("invalid command id {s:?}: {e}")))
}
