//! Status documents reported by the game server.
//!
//! The relay treats a [`StatusDocument`] as opaque: whatever object the
//! game server posts is stored and served back verbatim. Only two fields
//! are read, `source` and `player`, and only to decide whether a status
//! change should be announced.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Source marker sent by the game server when a player joins.
pub const PLAYER_JOINED_SOURCE: &str = "ms_playerjoined";

/// Source marker sent by the game server when a player leaves.
pub const PLAYER_LEFT_SOURCE: &str = "ms_playerleft";

/// An arbitrary JSON object reported by the game server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusDocument(Map<String, Value>);

impl StatusDocument {
    /// An empty document (`{}`).
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The `source` discriminator, if present and a string.
    pub fn source(&self) -> Option<&str> {
        self.0.get("source").and_then(Value::as_str)
    }

    /// The `player` field, if present and a string.
    pub fn player(&self) -> Option<&str> {
        self.0.get("player").and_then(Value::as_str)
    }

    /// Borrow the underlying JSON object.
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into a plain JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for StatusDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Interpretation of a status update's source hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSource {
    /// A player joined the server.
    PlayerJoined,
    /// A player left the server.
    PlayerLeft,
    /// Any other source; never announced.
    Other(String),
}

impl StatusSource {
    /// Classify a raw source hint.
    pub fn from_hint(hint: &str) -> Self {
        match hint {
            PLAYER_JOINED_SOURCE => Self::PlayerJoined,
            PLAYER_LEFT_SOURCE => Self::PlayerLeft,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_objects_are_documents() {
        assert!(StatusDocument::from_value(serde_json::json!({"day": 3})).is_some());
        assert!(StatusDocument::from_value(serde_json::json!([1, 2])).is_none());
        assert!(StatusDocument::from_value(Value::Null).is_none());
        assert!(StatusDocument::from_value(serde_json::json!("up")).is_none());
    }

    #[test]
    fn trigger_fields_are_read_as_strings() {
        let doc = StatusDocument::from_value(serde_json::json!({
            "source": "ms_playerjoined",
            "player": "Frosty",
            "players": ["Frosty", "Wilson"],
        }))
        .unwrap_or_default();

        assert_eq!(doc.source(), Some("ms_playerjoined"));
        assert_eq!(doc.player(), Some("Frosty"));

        let numeric = StatusDocument::from_value(serde_json::json!({"player": 7}))
            .unwrap_or_default();
        assert_eq!(numeric.player(), None);
    }

    #[test]
    fn source_hints_classify() {
        assert_eq!(StatusSource::from_hint("ms_playerjoined"), StatusSource::PlayerJoined);
        assert_eq!(StatusSource::from_hint("ms_playerleft"), StatusSource::PlayerLeft);
        assert_eq!(
            StatusSource::from_hint("ms_cycleschanged"),
            StatusSource::Other(String::from("ms_cycleschanged"))
        );
    }

    #[test]
    fn document_round_trips_verbatim() {
        let raw = serde_json::json!({"mods": {"workshop-1": true}, "day": 12});
        let doc: StatusDocument = serde_json::from_value(raw.clone()).unwrap_or_default();
        assert_eq!(doc.into_value(), raw);
    }
}
