//! Messaging transport abstraction.
//!
//! The relay needs exactly two operations from the messaging platform: a
//! one-to-one push and a broadcast to every subscriber. Backends are
//! dispatched through an enum rather than a trait object because async
//! methods are not dyn-compatible.
//!
//! - [`line::LineTransport`] calls the LINE Messaging API over HTTPS.
//! - [`outbox::Outbox`] records messages in memory (dry-run mode).

pub mod line;
pub mod outbox;

use tracing::info;

use crate::config::RelayConfig;
use crate::error::RelayError;

pub use line::LineTransport;
pub use outbox::{Delivery, DeliveryTarget, Outbox};

/// A messaging backend the relay can deliver notifications through.
pub enum MessagingTransport {
    /// LINE Messaging API.
    Line(LineTransport),
    /// In-memory dry-run outbox.
    Outbox(Outbox),
}

impl MessagingTransport {
    /// Send `text` to a single user.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Delivery`] if the backend fails.
    pub async fn push(&self, user_id: &str, text: &str) -> Result<(), RelayError> {
        match self {
            Self::Line(backend) => backend.push(user_id, text).await,
            Self::Outbox(backend) => backend.push(user_id, text).await,
        }
    }

    /// Send `text` to every subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Delivery`] if the backend fails.
    pub async fn broadcast(&self, text: &str) -> Result<(), RelayError> {
        match self {
            Self::Line(backend) => backend.broadcast(text).await,
            Self::Outbox(backend) => backend.broadcast(text).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Line(_) => "line",
            Self::Outbox(_) => "outbox",
        }
    }

    /// The dry-run outbox, when that is the active backend.
    pub const fn outbox(&self) -> Option<&Outbox> {
        match self {
            Self::Outbox(outbox) => Some(outbox),
            Self::Line(_) => None,
        }
    }
}

/// Create the transport selected by the configuration.
///
/// A configured channel access token selects LINE; otherwise messages go
/// to the dry-run outbox.
///
/// # Errors
///
/// Returns [`RelayError::Delivery`] if the HTTP client cannot be built.
pub fn create_transport(config: &RelayConfig) -> Result<MessagingTransport, RelayError> {
    let transport = match &config.line {
        Some(line) => MessagingTransport::Line(LineTransport::new(line)?),
        None => MessagingTransport::Outbox(Outbox::new()),
    };
    info!(backend = transport.name(), "messaging transport created");
    Ok(transport)
}
