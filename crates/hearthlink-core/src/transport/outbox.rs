//! In-memory dry-run transport.
//!
//! Used when no LINE credentials are configured, so the relay can run
//! locally against a game server without a bot account. Every message is
//! logged and kept in a bounded buffer. The outbox can be switched offline
//! to rehearse how clients handle a failing transport.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::RelayError;

/// Number of deliveries kept before the oldest are dropped.
pub const OUTBOX_CAPACITY: usize = 500;

/// Who a recorded message was addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "userId", rename_all = "lowercase")]
pub enum DeliveryTarget {
    /// A single user.
    User(String),
    /// Every subscriber.
    Everyone,
}

/// A message recorded by the outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    /// Addressee.
    pub target: DeliveryTarget,
    /// Message text.
    pub text: String,
    /// When the message was recorded.
    pub at: DateTime<Utc>,
}

/// Dry-run messaging backend.
#[derive(Debug, Default)]
pub struct Outbox {
    deliveries: Mutex<VecDeque<Delivery>>,
    offline: AtomicBool,
}

impl Outbox {
    /// An empty, online outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a one-to-one message.
    pub async fn push(&self, user_id: &str, text: &str) -> Result<(), RelayError> {
        self.record(DeliveryTarget::User(user_id.to_owned()), text)
            .await
    }

    /// Record a broadcast.
    pub async fn broadcast(&self, text: &str) -> Result<(), RelayError> {
        self.record(DeliveryTarget::Everyone, text).await
    }

    async fn record(&self, target: DeliveryTarget, text: &str) -> Result<(), RelayError> {
        if self.is_offline() {
            return Err(RelayError::Delivery(String::from("outbox is offline")));
        }

        info!(?target, text, "dry-run delivery");

        let mut deliveries = self.deliveries.lock().await;
        while deliveries.len() >= OUTBOX_CAPACITY {
            deliveries.pop_front();
        }
        deliveries.push_back(Delivery {
            target,
            text: text.to_owned(),
            at: Utc::now(),
        });
        Ok(())
    }

    /// Everything recorded so far, oldest first.
    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().await.iter().cloned().collect()
    }

    /// Make subsequent deliveries fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    /// Whether deliveries currently fail.
    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Acquire)
    }
}
