//! Session and status endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Relay summary |
//! | `POST` | `/init` | Register the game server |
//! | `POST` | `/status` | Replace the status snapshot |
//! | `GET` | `/status` | Current status snapshot |

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /init`.
#[derive(Debug, serde::Deserialize)]
pub struct InitRequest {
    /// Display name of the game server.
    #[serde(default)]
    pub name: String,
}

/// Query parameters for `POST /status`.
#[derive(Debug, serde::Deserialize)]
pub struct StatusQuery {
    /// Why the game server sent this report (e.g. `ms_playerjoined`).
    pub source: Option<String>,
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
pub(crate) struct OkResponse {
    /// Whether the operation succeeded.
    pub(crate) ok: bool,
    /// Human-readable message.
    pub(crate) message: String,
}

impl OkResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report whether a game server is registered and how many commands are
/// queued.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.relay.summary().await)
}

// ---------------------------------------------------------------------------
// POST /init
// ---------------------------------------------------------------------------

/// Register the game server and announce it to every subscriber.
///
/// A second call replaces the name. If the announcement fails the server
/// is still registered and the request reports the delivery error.
pub async fn init(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    state.relay.initialize(&body.name).await?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "message": "Server initialized",
        "name": body.name,
    })))
}

// ---------------------------------------------------------------------------
// POST /status, GET /status
// ---------------------------------------------------------------------------

/// Replace the status snapshot with the posted document.
///
/// The body is read without requiring a JSON content type, since the
/// game server's HTTP client does not always send one.
///
/// # Query Parameters
///
/// - `source`: trigger hint; `ms_playerjoined` and `ms_playerleft` are
///   announced. Falls back to the document's own `source` field.
pub async fn post_status(
    State(state): State<Arc<AppState>>,
    params: Result<Query<StatusQuery>, QueryRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let document: Option<serde_json::Value> = parse_optional_body(&body)?;
    state
        .relay
        .update_status(document, params.source.as_deref())
        .await?;

    Ok(Json(OkResponse::new("Status updated")))
}

/// Return the last status snapshot verbatim, or `{}`.
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.relay.current_status().await)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a JSON body that may legitimately be empty.
///
/// An empty (or whitespace-only) body is `None`; anything else must parse.
pub(crate) fn parse_optional_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}
