//! Shared application state for the relay API server.
//!
//! [`AppState`] is a thin handle around the [`Relay`]; everything mutable
//! lives behind the relay's own lock.

use std::sync::Arc;

use hearthlink_core::relay::DEFAULT_STATUS_STREAM_CAPACITY;
use hearthlink_core::transport::{MessagingTransport, Outbox};
use hearthlink_core::Relay;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The relay serving every request.
    pub relay: Arc<Relay>,
}

impl AppState {
    /// Wrap an existing relay.
    pub const fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }

    /// A fresh relay that records messages in an in-memory outbox.
    pub fn dry_run() -> Self {
        let transport = MessagingTransport::Outbox(Outbox::new());
        Self::new(Arc::new(Relay::with_status_capacity(
            transport,
            DEFAULT_STATUS_STREAM_CAPACITY,
        )))
    }

    /// The dry-run outbox, when the relay uses one.
    pub fn outbox(&self) -> Option<&Outbox> {
        self.relay.transport().outbox()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::dry_run()
    }
}
