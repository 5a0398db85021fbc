//! Commands queued for execution by the game server.
//!
//! A [`Command`] is submitted by the display client on behalf of a
//! messaging-platform user, picked up by the game server when it polls for
//! [`CommandStatus::New`] work, and finally reported back with whatever
//! status the game server chooses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Sequential command identifier.
///
/// Ids start at 0 for each session and are never reused until the session
/// is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub u64);

impl CommandId {
    /// The first id handed out in a fresh session.
    pub const FIRST: Self = Self(0);

    /// Return the inner integer value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` on overflow.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }
}

impl core::fmt::Display for CommandId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CommandId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl core::str::FromStr for CommandId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

/// Lifecycle status of a [`Command`].
///
/// The relay itself only ever assigns `New`, `Sent`, and `Unknown`. The
/// game server may report any string; well-known names map onto their
/// variants and everything else is kept verbatim in [`CommandStatus::Other`].
///
/// Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommandStatus {
    /// Submitted, not yet handed to the game server.
    New,
    /// Returned to the game server by a `New`-filtered poll.
    Sent,
    /// Reported complete by the game server.
    Done,
    /// Updated without a status.
    Unknown,
    /// Any other status reported by the game server.
    Other(String),
}

impl CommandStatus {
    /// The wire name of this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Sent => "Sent",
            Self::Done => "Done",
            Self::Unknown => "Unknown",
            Self::Other(s) => s,
        }
    }

    /// Parse a status reported by a caller.
    ///
    /// Matching is case-sensitive. An empty (or whitespace-only) string is
    /// [`CommandStatus::Unknown`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "Unknown" => Self::Unknown,
            "New" => Self::New,
            "Sent" => Self::Sent,
            "Done" => Self::Done,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl core::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CommandStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for CommandStatus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<CommandStatus> for String {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

/// A command queued for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Command {
    /// Sequential id within the current session.
    #[ts(type = "number")]
    pub id: CommandId,
    /// Opaque instruction text forwarded to the game server.
    #[serde(rename = "command")]
    pub text: String,
    /// Current lifecycle status.
    #[ts(as = "String")]
    pub status: CommandStatus,
    /// Messaging-platform user who submitted the command.
    #[serde(rename = "userId")]
    pub originator_id: String,
    /// When the command was submitted.
    pub created_at: DateTime<Utc>,
    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_parse_to_variants() {
        assert_eq!(CommandStatus::parse("New"), CommandStatus::New);
        assert_eq!(CommandStatus::parse("Sent"), CommandStatus::Sent);
        assert_eq!(CommandStatus::parse("Done"), CommandStatus::Done);
        assert_eq!(CommandStatus::parse("Unknown"), CommandStatus::Unknown);
    }

    #[test]
    fn empty_status_is_unknown() {
        assert_eq!(CommandStatus::parse(""), CommandStatus::Unknown);
        assert_eq!(CommandStatus::parse("   "), CommandStatus::Unknown);
    }

    #[test]
    fn status_parsing_is_case_sensitive() {
        assert_eq!(
            CommandStatus::parse("done"),
            CommandStatus::Other(String::from("done"))
        );
    }

    #[test]
    fn command_serializes_with_wire_names() {
        let now = Utc::now();
        let command = Command {
            id: CommandId(3),
            text: String::from("c_announce('hi')"),
            status: CommandStatus::Other(String::from("Failed")),
            originator_id: String::from("U1"),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&command).unwrap_or_default();
        assert_eq!(json.get("id"), Some(&serde_json::json!(3)));
        assert_eq!(json.get("command"), Some(&serde_json::json!("c_announce('hi')")));
        assert_eq!(json.get("status"), Some(&serde_json::json!("Failed")));
        assert_eq!(json.get("userId"), Some(&serde_json::json!("U1")));
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn command_id_parses_from_path_segment() {
        assert_eq!("7".parse::<CommandId>().ok(), Some(CommandId(7)));
        assert!("seven".parse::<CommandId>().is_err());
        assert_eq!(CommandId(u64::MAX).next(), None);
        assert_eq!(CommandId::FIRST.next(), Some(CommandId(1)));
    }
}
