//! Inbound webhook events from the LINE Messaging API.
//!
//! Only the fields the relay reads are modelled; everything else in the
//! platform payload is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Body of a webhook delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Bot user id the events were addressed to.
    #[serde(default)]
    pub destination: Option<String>,
    /// Delivered events. May be empty (the platform sends an empty batch
    /// when verifying the webhook URL).
    #[serde(default)]
    pub events: Vec<InboundEvent>,
}

/// A single webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    /// Event type (`message`, `follow`, `unfollow`, ...).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Message content for `message` events.
    #[serde(default)]
    pub message: Option<InboundMessage>,
    /// Who sent the event.
    #[serde(default)]
    pub source: Option<EventSource>,
    /// Token for replying to this event.
    #[serde(default)]
    pub reply_token: Option<String>,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Message content of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Message type (`text`, `sticker`, `image`, ...).
    #[serde(rename = "type")]
    pub message_type: String,
    /// Platform message id.
    #[serde(default)]
    pub id: Option<String>,
    /// Text body for `text` messages.
    #[serde(default)]
    pub text: Option<String>,
}

/// Origin of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    /// Source type (`user`, `group`, `room`).
    #[serde(rename = "type")]
    pub source_type: String,
    /// Sending user, when the platform discloses it.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Group the event came from, for group sources.
    #[serde(default)]
    pub group_id: Option<String>,
}

impl InboundEvent {
    /// A plain text `message` event.
    pub fn text_message(user_id: &str, text: &str) -> Self {
        Self {
            event_type: String::from("message"),
            message: Some(InboundMessage {
                message_type: String::from("text"),
                id: None,
                text: Some(text.to_owned()),
            }),
            source: Some(EventSource {
                source_type: String::from("user"),
                user_id: Some(user_id.to_owned()),
                group_id: None,
            }),
            reply_token: None,
            timestamp: None,
        }
    }

    /// The text body, if this is a text message event.
    pub fn text(&self) -> Option<&str> {
        if self.event_type != "message" {
            return None;
        }
        self.message
            .as_ref()
            .filter(|m| m.message_type == "text")
            .and_then(|m| m.text.as_deref())
    }

    /// The sending user id, if known.
    pub fn sender_id(&self) -> Option<&str> {
        self.source
            .as_ref()
            .and_then(|s| s.user_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_text_event() {
        let raw = serde_json::json!({
            "destination": "Ubot",
            "events": [{
                "type": "message",
                "mode": "active",
                "timestamp": 1_700_000_000_000_i64,
                "replyToken": "r1",
                "source": {"type": "user", "userId": "U9"},
                "message": {"type": "text", "id": "m1", "text": "clear"}
            }]
        });

        let payload: WebhookPayload = serde_json::from_value(raw).unwrap_or_default();
        let first = payload.events.first();
        assert_eq!(first.and_then(InboundEvent::text), Some("clear"));
        assert_eq!(first.and_then(InboundEvent::sender_id), Some("U9"));
    }

    #[test]
    fn missing_events_is_an_empty_batch() {
        let payload: Result<WebhookPayload, _> =
            serde_json::from_value(serde_json::json!({"destination": "Ubot"}));
        assert!(payload.is_ok_and(|p| p.events.is_empty()));
    }

    #[test]
    fn non_text_events_have_no_text() {
        let mut event = InboundEvent::text_message("U1", "clear");
        event.event_type = String::from("follow");
        assert_eq!(event.text(), None);

        let mut sticker = InboundEvent::text_message("U1", "clear");
        if let Some(m) = sticker.message.as_mut() {
            m.message_type = String::from("sticker");
        }
        assert_eq!(sticker.text(), None);
    }
}
