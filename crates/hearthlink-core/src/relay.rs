//! The relay: shared state plus the messaging gateway.
//!
//! [`Relay`] owns the [`SessionState`] and the [`CommandStore`] behind a
//! single [`RwLock`], and is the only thing that talks to the
//! [`MessagingTransport`]. Every operation follows the same shape:
//!
//! 1. take the lock, apply the state change, derive a [`Notice`], and
//!    publish any new status snapshot
//! 2. drop the lock
//! 3. deliver the notice
//!
//! A delivery failure is returned to the caller, but the state change from
//! step 1 stands.

use hearthlink_types::{Command, CommandId, CommandStatus, InboundEvent, StatusDocument};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::commands::CommandStore;
use crate::error::RelayError;
use crate::notice::Notice;
use crate::session::SessionState;
use crate::transport::MessagingTransport;

/// Inbound text that resets the session.
pub const CONTROL_WORD_CLEAR: &str = "clear";

/// Default capacity of the status snapshot stream.
///
/// A subscriber that falls further behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest snapshot.
pub const DEFAULT_STATUS_STREAM_CAPACITY: usize = 64;

/// Everything guarded by the relay lock.
#[derive(Debug, Default)]
struct RelayState {
    session: SessionState,
    commands: CommandStore,
}

/// What an inbound webhook batch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InboundOutcome {
    /// Nothing relevant in the batch.
    Ignored,
    /// The session and the command queue were reset.
    Cleared,
}

/// Point-in-time view of the relay for health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaySummary {
    /// Whether a game server has registered.
    pub initialized: bool,
    /// Registered server name; empty when uninitialized.
    pub server_name: String,
    /// Total commands in the current session.
    pub commands: usize,
    /// Commands not yet picked up by the game server.
    pub pending: usize,
    /// Active messaging backend.
    pub transport: String,
}

/// Command queue, session state, and messaging gateway.
pub struct Relay {
    state: RwLock<RelayState>,
    transport: MessagingTransport,
    /// Every accepted status snapshot, for live display clients.
    status_tx: broadcast::Sender<StatusDocument>,
}

impl Relay {
    /// Create a relay with an empty, uninitialized session.
    pub fn new(transport: MessagingTransport) -> Self {
        Self::with_status_capacity(transport, DEFAULT_STATUS_STREAM_CAPACITY)
    }

    /// Create a relay whose status stream buffers `capacity` snapshots.
    ///
    /// A zero capacity is raised to 1.
    pub fn with_status_capacity(transport: MessagingTransport, capacity: usize) -> Self {
        let (status_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            state: RwLock::new(RelayState::default()),
            transport,
            status_tx,
        }
    }

    /// Subscribe to status snapshots as they are accepted.
    pub fn subscribe_status(&self) -> broadcast::Receiver<StatusDocument> {
        self.status_tx.subscribe()
    }

    /// Push a snapshot to live subscribers.
    ///
    /// Returns the number of receivers; 0 when nobody is listening.
    fn publish_status(&self, snapshot: StatusDocument) -> usize {
        // send only fails when there are no receivers.
        self.status_tx.send(snapshot).unwrap_or(0)
    }

    /// The messaging backend in use.
    pub const fn transport(&self) -> &MessagingTransport {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Register a game server and announce it to every subscriber.
    pub async fn initialize(&self, name: &str) -> Result<(), RelayError> {
        let notice = self.state.write().await.session.initialize(name)?;
        info!(name, "session initialized");
        self.deliver(&notice, None).await
    }

    /// Replace the status snapshot, announcing player joins and leaves.
    ///
    /// The snapshot reaches live subscribers before the announcement is
    /// attempted.
    pub async fn update_status(
        &self,
        document: Option<Value>,
        source_hint: Option<&str>,
    ) -> Result<(), RelayError> {
        let notice = {
            let mut state = self.state.write().await;
            let notice = state.session.update_status(document, source_hint)?;
            // Published under the guard so subscribers see snapshots in store order.
            let receivers = self.publish_status(state.session.current_status());
            debug!(source = source_hint, receivers, "status snapshot replaced");
            notice
        };

        if let Some(notice) = notice {
            self.deliver(&notice, None).await?;
        }
        Ok(())
    }

    /// The last reported status snapshot, or `{}`.
    pub async fn current_status(&self) -> StatusDocument {
        self.state.read().await.session.current_status()
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Queue a command for the game server.
    ///
    /// # Errors
    ///
    /// [`RelayError::PreconditionFailed`] when no game server has
    /// registered; [`RelayError::Validation`] for empty fields.
    pub async fn append_command(
        &self,
        text: &str,
        originator_id: &str,
    ) -> Result<Command, RelayError> {
        let mut state = self.state.write().await;
        if !state.session.is_initialized() {
            return Err(RelayError::PreconditionFailed(String::from(
                "server is not initialized",
            )));
        }
        let command = state.commands.append(text, originator_id)?;
        info!(id = %command.id, originator = originator_id, "command queued");
        Ok(command)
    }

    /// List commands, optionally filtered by status.
    ///
    /// Filtering on [`CommandStatus::New`] hands the commands to the caller:
    /// they are marked [`CommandStatus::Sent`] under the write lock.
    pub async fn list_commands(&self, filter: Option<&CommandStatus>) -> Vec<Command> {
        match filter {
            None => self.state.read().await.commands.list_all(),
            Some(CommandStatus::New) => {
                let sent = self
                    .state
                    .write()
                    .await
                    .commands
                    .list_by_status(&CommandStatus::New);
                if !sent.is_empty() {
                    info!(count = sent.len(), "pending commands dispatched");
                }
                sent
            }
            Some(status) => self.state.read().await.commands.peek_by_status(status),
        }
    }

    /// Record a status reported by the game server and tell the
    /// originating user.
    ///
    /// # Errors
    ///
    /// [`RelayError::NotFound`] for an unknown id (nothing changes);
    /// [`RelayError::Delivery`] if the notification fails (the status
    /// change stands).
    pub async fn update_command(
        &self,
        id: CommandId,
        status: Option<&str>,
    ) -> Result<Command, RelayError> {
        let command = self.state.write().await.commands.update_status(id, status)?;
        info!(id = %command.id, status = %command.status, "command status updated");

        let notice = Notice::CommandUpdated {
            id: command.id,
            status: command.status.clone(),
        };
        self.deliver(&notice, Some(command.originator_id.as_str())).await?;
        Ok(command)
    }

    // -----------------------------------------------------------------------
    // Gateway
    // -----------------------------------------------------------------------

    /// Send a one-to-one message.
    pub async fn notify_user(&self, user_id: &str, text: &str) -> Result<(), RelayError> {
        if user_id.trim().is_empty() {
            return Err(RelayError::Validation(String::from("userId is required")));
        }
        if text.is_empty() {
            return Err(RelayError::Validation(String::from("message is required")));
        }
        self.transport.push(user_id, text).await.inspect_err(|e| {
            warn!(error = %e, user_id, "push failed");
        })
    }

    /// Send a message to every subscriber.
    pub async fn notify_all(&self, text: &str) -> Result<(), RelayError> {
        if text.is_empty() {
            return Err(RelayError::Validation(String::from("message is required")));
        }
        self.transport.broadcast(text).await.inspect_err(|e| {
            warn!(error = %e, "broadcast failed");
        })
    }

    /// Handle a batch of inbound webhook events.
    ///
    /// Only the first event is inspected. If it is a text message equal to
    /// [`CONTROL_WORD_CLEAR`], the session and the command queue are reset
    /// together and the sender gets a confirmation. An empty batch is a
    /// no-op.
    pub async fn handle_inbound_events(
        &self,
        events: &[InboundEvent],
    ) -> Result<InboundOutcome, RelayError> {
        let Some(event) = events.first() else {
            debug!("empty webhook batch");
            return Ok(InboundOutcome::Ignored);
        };
        if event.text() != Some(CONTROL_WORD_CLEAR) {
            debug!(event_type = %event.event_type, "inbound event ignored");
            return Ok(InboundOutcome::Ignored);
        }

        self.reset().await;
        info!(sender = event.sender_id(), "session cleared from messaging platform");

        self.deliver(&Notice::SessionCleared, event.sender_id()).await?;
        Ok(InboundOutcome::Cleared)
    }

    /// Reset the session and the command queue in one critical section.
    ///
    /// Live subscribers receive the emptied snapshot.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.session.reset();
        state.commands.clear();
        self.publish_status(StatusDocument::new());
    }

    /// Counters for the health endpoint.
    pub async fn summary(&self) -> RelaySummary {
        let state = self.state.read().await;
        RelaySummary {
            initialized: state.session.is_initialized(),
            server_name: state.session.name().to_owned(),
            commands: state.commands.len(),
            pending: state.commands.count_by_status(&CommandStatus::New),
            transport: self.transport.name().to_owned(),
        }
    }

    /// Deliver a notice. Broadcast notices go to everyone, the rest to
    /// `recipient`; a targeted notice without one is dropped with a warning.
    async fn deliver(&self, notice: &Notice, recipient: Option<&str>) -> Result<(), RelayError> {
        let text = notice.to_string();
        if notice.is_broadcast() {
            return self.notify_all(&text).await;
        }
        match recipient {
            Some(user_id) => self.notify_user(user_id, &text).await,
            None => {
                warn!(%notice, "notice has no recipient; skipped");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hearthlink_types::InboundEvent;

    use super::*;
    use crate::transport::{Delivery, DeliveryTarget, Outbox};

    fn relay() -> Relay {
        Relay::new(MessagingTransport::Outbox(Outbox::new()))
    }

    async fn sent(relay: &Relay) -> Vec<Delivery> {
        match relay.transport().outbox() {
            Some(outbox) => outbox.deliveries().await,
            None => Vec::new(),
        }
    }

    fn set_offline(relay: &Relay, offline: bool) {
        if let Some(outbox) = relay.transport().outbox() {
            outbox.set_offline(offline);
        }
    }

    fn user(id: &str) -> DeliveryTarget {
        DeliveryTarget::User(id.to_owned())
    }

    #[tokio::test]
    async fn append_requires_initialized_session() {
        let relay = relay();
        let result = relay.append_command("c_announce('hi')", "U1").await;
        assert!(matches!(result, Err(RelayError::PreconditionFailed(_))));
        assert!(relay.list_commands(None).await.is_empty());
    }

    #[tokio::test]
    async fn command_round_trip_notifies_originator() {
        let relay = relay();
        assert!(relay.initialize("Alice's World").await.is_ok());

        let queued = relay.append_command("c_announce('hi')", "U1").await.ok();
        assert_eq!(queued.map(|c| c.id), Some(CommandId(0)));

        let polled = relay.list_commands(Some(&CommandStatus::New)).await;
        assert_eq!(polled.len(), 1);
        assert_eq!(polled.first().map(|c| &c.status), Some(&CommandStatus::Sent));

        let done = relay.update_command(CommandId(0), Some("Done")).await.ok();
        assert_eq!(
            done.map(|c| (c.id, c.status)),
            Some((CommandId(0), CommandStatus::Done))
        );

        let deliveries = sent(&relay).await;
        let last = deliveries.last().map(|d| (&d.target, d.text.as_str()));
        assert_eq!(last, Some((&user("U1"), "ID: 0, status: Done")));
    }

    #[tokio::test]
    async fn initialize_broadcasts() {
        let relay = relay();
        let _ = relay.initialize("Alice's World").await;

        let deliveries = sent(&relay).await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(
            deliveries.first().map(|d| (&d.target, d.text.as_str())),
            Some((&DeliveryTarget::Everyone, "Server Initialized: Alice's World"))
        );
    }

    #[tokio::test]
    async fn player_join_is_broadcast_and_mirrored() {
        let relay = relay();
        let document = serde_json::json!({
            "source": "ms_playerjoined",
            "player": "Frosty",
            "players": ["Frosty"],
            "day": 3,
        });

        assert!(relay.update_status(Some(document.clone()), None).await.is_ok());
        assert_eq!(relay.current_status().await.into_value(), document);

        let deliveries = sent(&relay).await;
        assert_eq!(
            deliveries.first().map(|d| (&d.target, d.text.as_str())),
            Some((&DeliveryTarget::Everyone, "Player Joined: Frosty"))
        );
    }

    #[tokio::test]
    async fn status_snapshots_reach_subscribers() {
        let relay = relay();
        let mut rx = relay.subscribe_status();

        let _ = relay.update_status(Some(serde_json::json!({"day": 7})), None).await;
        let received = rx.recv().await.ok().map(StatusDocument::into_value);
        assert_eq!(received, Some(serde_json::json!({"day": 7})));

        relay.reset().await;
        assert!(rx.recv().await.is_ok_and(|doc| doc.is_empty()));
    }

    #[tokio::test]
    async fn clear_resets_everything_and_confirms_once() {
        let relay = relay();
        let _ = relay.initialize("Alice's World").await;
        let _ = relay.append_command("c_save()", "U1").await;
        let _ = relay.update_status(Some(serde_json::json!({"day": 1})), None).await;

        let outcome = relay
            .handle_inbound_events(&[InboundEvent::text_message("U9", "clear")])
            .await
            .ok();
        assert_eq!(outcome, Some(InboundOutcome::Cleared));

        let summary = relay.summary().await;
        assert!(!summary.initialized);
        assert_eq!(summary.server_name, "");
        assert_eq!(summary.commands, 0);
        assert!(relay.current_status().await.is_empty());

        let confirmations: Vec<Delivery> = sent(&relay)
            .await
            .into_iter()
            .filter(|d| d.target == user("U9"))
            .collect();
        assert_eq!(confirmations.len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let relay = relay();
        let _ = relay.initialize("Alice's World").await;
        let before = sent(&relay).await.len();

        let outcome = relay.handle_inbound_events(&[]).await.ok();
        assert_eq!(outcome, Some(InboundOutcome::Ignored));
        assert!(relay.summary().await.initialized);
        assert_eq!(sent(&relay).await.len(), before);
    }

    #[tokio::test]
    async fn only_first_event_is_inspected() {
        let relay = relay();
        let _ = relay.initialize("Alice's World").await;

        let batch = [
            InboundEvent::text_message("U1", "hello"),
            InboundEvent::text_message("U9", "clear"),
        ];
        let outcome = relay.handle_inbound_events(&batch).await.ok();
        assert_eq!(outcome, Some(InboundOutcome::Ignored));
        assert!(relay.summary().await.initialized);
    }

    #[tokio::test]
    async fn ids_restart_after_clear() {
        let relay = relay();
        let _ = relay.initialize("Alice's World").await;
        let _ = relay.append_command("a", "U1").await;
        let _ = relay.append_command("b", "U1").await;

        let _ = relay
            .handle_inbound_events(&[InboundEvent::text_message("U9", "clear")])
            .await;
        assert!(matches!(
            relay.append_command("c", "U1").await,
            Err(RelayError::PreconditionFailed(_))
        ));

        let _ = relay.initialize("Alice's World").await;
        let next = relay.append_command("c", "U1").await.ok();
        assert_eq!(next.map(|c| c.id), Some(CommandId(0)));
    }

    #[tokio::test]
    async fn failed_notification_keeps_status_change() {
        let relay = relay();
        let _ = relay.initialize("Alice's World").await;
        let _ = relay.append_command("c_save()", "U1").await;

        set_offline(&relay, true);
        let result = relay.update_command(CommandId(0), Some("Done")).await;
        assert!(matches!(result, Err(RelayError::Delivery(_))));

        let commands = relay.list_commands(Some(&CommandStatus::Done)).await;
        assert_eq!(commands.len(), 1);
    }

    #[tokio::test]
    async fn failed_init_broadcast_keeps_session() {
        let relay = relay();
        set_offline(&relay, true);

        let result = relay.initialize("Alice's World").await;
        assert!(matches!(result, Err(RelayError::Delivery(_))));
        assert!(relay.summary().await.initialized);
    }

    #[tokio::test]
    async fn unknown_command_is_not_found_and_silent() {
        let relay = relay();
        let _ = relay.initialize("Alice's World").await;
        let before = sent(&relay).await.len();

        let result = relay.update_command(CommandId(5), Some("Done")).await;
        assert!(matches!(result, Err(RelayError::NotFound(CommandId(5)))));
        assert_eq!(sent(&relay).await.len(), before);
    }

    #[tokio::test]
    async fn concurrent_appends_get_unique_sequential_ids() {
        let relay = std::sync::Arc::new(relay());
        let _ = relay.initialize("Alice's World").await;

        let mut handles = Vec::new();
        for i in 0..32 {
            let relay = std::sync::Arc::clone(&relay);
            handles.push(tokio::spawn(async move {
                relay.append_command(&format!("cmd {i}"), "U1").await
            }));
        }
        for handle in handles {
            let _ = handle.await;
        }

        let mut ids: Vec<u64> = relay
            .list_commands(None)
            .await
            .iter()
            .map(|c| c.id.into_inner())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..32).collect::<Vec<u64>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_status_posts_stream_in_store_order() {
        let relay = std::sync::Arc::new(relay());
        let mut rx = relay.subscribe_status();

        let mut handles = Vec::new();
        for day in 0..16 {
            let relay = std::sync::Arc::clone(&relay);
            handles.push(tokio::spawn(async move {
                relay
                    .update_status(Some(serde_json::json!({"day": day})), None)
                    .await
            }));
        }
        let reset = std::sync::Arc::clone(&relay);
        handles.push(tokio::spawn(async move {
            reset.reset().await;
            Ok(())
        }));
        for handle in handles {
            let _ = handle.await;
        }

        let mut last = None;
        while let Ok(snapshot) = rx.try_recv() {
            last = Some(snapshot);
        }
        assert_eq!(last, Some(relay.current_status().await));
    }

    #[tokio::test]
    async fn clear_without_sender_skips_confirmation() {
        let relay = relay();
        let _ = relay.initialize("Alice's World").await;
        let before = sent(&relay).await.len();

        let mut event = InboundEvent::text_message("U9", "clear");
        event.source = None;
        let outcome = relay.handle_inbound_events(&[event]).await.ok();

        assert_eq!(outcome, Some(InboundOutcome::Cleared));
        assert!(!relay.summary().await.initialized);
        assert_eq!(sent(&relay).await.len(), before);
    }

    #[tokio::test]
    async fn notify_user_requires_recipient() {
        let relay = relay();
        assert!(matches!(
            relay.notify_user("", "hi").await,
            Err(RelayError::Validation(_))
        ));
        assert!(matches!(
            relay.notify_all("").await,
            Err(RelayError::Validation(_))
        ));
    }
}
