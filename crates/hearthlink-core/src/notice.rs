//! User-facing notification texts.
//!
//! Every message the relay sends originates as a [`Notice`]. Rendering
//! happens through [`Display`](core::fmt::Display) so the wording lives in
//! one place.

use hearthlink_types::{CommandId, CommandStatus};

/// Rendered in place of a player name the game server did not report.
pub const UNKNOWN_PLAYER: &str = "unknown";

/// Something worth telling a messaging-platform user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A game server registered with the relay.
    ServerInitialized {
        /// The server's display name.
        name: String,
    },
    /// A player joined the game server.
    PlayerJoined {
        /// The player's name.
        player: String,
    },
    /// A player left the game server.
    PlayerLeft {
        /// The player's name.
        player: String,
    },
    /// The game server reported a new status for a command.
    CommandUpdated {
        /// The command's id.
        id: CommandId,
        /// Its new status.
        status: CommandStatus,
    },
    /// The session was reset from the messaging platform.
    SessionCleared,
}

impl Notice {
    /// Whether this notice goes to every subscriber rather than one user.
    pub const fn is_broadcast(&self) -> bool {
        matches!(
            self,
            Self::ServerInitialized { .. } | Self::PlayerJoined { .. } | Self::PlayerLeft { .. }
        )
    }
}

impl core::fmt::Display for Notice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ServerInitialized { name } => write!(f, "Server Initialized: {name}"),
            Self::PlayerJoined { player } => write!(f, "Player Joined: {player}"),
            Self::PlayerLeft { player } => write!(f, "Player Left: {player}"),
            Self::CommandUpdated { id, status } => write!(f, "ID: {id}, status: {status}"),
            Self::SessionCleared => f.write_str("Server state cleared."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_update_wording() {
        let notice = Notice::CommandUpdated {
            id: CommandId(0),
            status: CommandStatus::Done,
        };
        assert_eq!(notice.to_string(), "ID: 0, status: Done");
        assert!(!notice.is_broadcast());
    }

    #[test]
    fn player_notices_are_broadcast() {
        let joined = Notice::PlayerJoined {
            player: String::from("Frosty"),
        };
        assert_eq!(joined.to_string(), "Player Joined: Frosty");
        assert!(joined.is_broadcast());

        let left = Notice::PlayerLeft {
            player: String::from("Frosty"),
        };
        assert_eq!(left.to_string(), "Player Left: Frosty");
    }
}
