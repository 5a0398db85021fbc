//! Hearthlink relay entry point.
//!
//! The relay sits between three parties:
//!
//! ```text
//! game server --(status, command polling)--> relay <--(commands, status)-- display client
//!                                              |
//!                                              +--(notifications, webhook)--> LINE
//! ```
//!
//! It keeps the session, the command queue, and the last status snapshot in
//! memory, and forwards the interesting transitions to the messaging
//! platform. Without a LINE access token it runs in dry-run mode, where
//! outbound messages are only logged.

mod error;

use std::sync::Arc;

use hearthlink_core::transport::create_transport;
use hearthlink_core::{Relay, RelayConfig};
use hearthlink_server::{AppState, ServerConfig, start_server};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::StartupError;

/// Application entry point.
///
/// Initializes logging, loads configuration from environment variables,
/// selects the messaging transport, then serves the relay API until
/// `Ctrl-C`.
#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("hearthlink-relay starting");

    let config = RelayConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        status_stream_capacity = config.status_stream_capacity,
        "configuration loaded"
    );

    let transport = create_transport(&config)?;
    if config.is_dry_run() {
        warn!("LINE_CHANNEL_ACCESS_TOKEN not set, messages go to the dry-run outbox");
    }
    info!(transport = transport.name(), "messaging transport configured");

    let relay = Relay::with_status_capacity(transport, config.status_stream_capacity);
    let state = Arc::new(AppState::new(Arc::new(relay)));

    let server_config = ServerConfig::from(&config);
    if let Err(e) = start_server(&server_config, state).await {
        error!(error = %e, "relay server exited with error");
        return Err(e.into());
    }

    info!("hearthlink-relay stopped");
    Ok(())
}
