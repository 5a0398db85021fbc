//! Relay API server for Hearthlink.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Session endpoints** for the game server to register itself and
//!   push status snapshots
//! - **Command endpoints** for the display client to queue commands and
//!   for the game server to poll and report on them
//! - **Messaging endpoints** for the LINE webhook and for sending
//!   messages directly
//! - **`WebSocket` endpoint** (`/ws/status`) streaming status snapshots to
//!   display clients
//!
//! # Architecture
//!
//! Handlers are thin: they parse the request, call into the shared
//! [`Relay`](hearthlink_core::Relay), and map [`ApiError`] onto a JSON
//! error response. All state lives in the relay.

pub mod commands;
pub mod error;
pub mod handlers;
pub mod messaging;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
