//! Axum router construction for the relay API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for the browser-based display client.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{commands, handlers, messaging, ws};

/// Build the complete Axum router for the relay server.
///
/// The router includes:
/// - `GET /health` -- relay summary
/// - `POST /init` -- register the game server
/// - `GET|POST /status` -- status snapshot
/// - `GET /ws/status` -- `WebSocket` status stream
/// - `GET|POST /commands` -- list / queue commands
/// - `POST /commands/{id}` -- report a command's status
/// - `POST /webhook` -- LINE webhook
/// - `POST /line-send-message`, `POST /send-message` -- push a message
/// - `POST /line-broadcast` -- broadcast a message
///
/// CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Session
        .route("/init", post(handlers::init))
        .route("/status", get(handlers::get_status).post(handlers::post_status))
        .route("/ws/status", get(ws::ws_status))
        // Commands
        .route(
            "/commands",
            get(commands::list_commands).post(commands::create_command),
        )
        .route("/commands/{id}", post(commands::update_command))
        // Messaging
        .route("/webhook", post(messaging::webhook))
        .route("/line-send-message", post(messaging::send_message))
        .route("/send-message", post(messaging::send_message))
        .route("/line-broadcast", post(messaging::broadcast))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
