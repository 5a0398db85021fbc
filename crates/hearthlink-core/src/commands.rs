//! In-memory command queue with lifecycle status.
//!
//! The [`CommandStore`] is plain data: it knows nothing about sessions,
//! locking, or notifications. [`Relay`](crate::relay::Relay) checks the
//! session precondition, holds the lock, and sends notifications after a
//! status change.
//!
//! # Lifecycle
//!
//! ```text
//! New --(polled with status=New)--> Sent --(update by id)--> <any status>
//! ```

use chrono::Utc;
use hearthlink_types::{Command, CommandId, CommandStatus};

use crate::error::RelayError;

/// Ordered collection of commands for the current session.
#[derive(Debug, Clone)]
pub struct CommandStore {
    /// Commands in insertion order. Ids are strictly increasing.
    commands: Vec<Command>,
    /// Id assigned to the next appended command.
    next_id: CommandId,
}

impl CommandStore {
    /// Create an empty store whose first id is 0.
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
            next_id: CommandId::FIRST,
        }
    }

    /// Append a new command with status [`CommandStatus::New`].
    ///
    /// Does not check whether the session is initialized; that is the
    /// caller's job.
    pub fn append(&mut self, text: &str, originator_id: &str) -> Result<Command, RelayError> {
        if text.trim().is_empty() {
            return Err(RelayError::Validation(String::from("command is required")));
        }
        if originator_id.trim().is_empty() {
            return Err(RelayError::Validation(String::from("userId is required")));
        }

        let id = self.next_id;
        let next = id
            .next()
            .ok_or_else(|| RelayError::PreconditionFailed(String::from("command ids exhausted")))?;

        let now = Utc::now();
        let command = Command {
            id,
            text: text.to_owned(),
            status: CommandStatus::New,
            originator_id: originator_id.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.commands.push(command.clone());
        self.next_id = next;

        Ok(command)
    }

    /// All commands in insertion order.
    pub fn list_all(&self) -> Vec<Command> {
        self.commands.clone()
    }

    /// Commands with the given status, in insertion order.
    ///
    /// Filtering on [`CommandStatus::New`] drains the pending queue: every
    /// returned command is flipped to [`CommandStatus::Sent`] before this
    /// returns, so a repeated poll never hands out the same command twice.
    /// The returned copies carry the `Sent` status.
    pub fn list_by_status(&mut self, status: &CommandStatus) -> Vec<Command> {
        if *status != CommandStatus::New {
            return self
                .commands
                .iter()
                .filter(|c| c.status == *status)
                .cloned()
                .collect();
        }

        let now = Utc::now();
        self.commands
            .iter_mut()
            .filter(|c| c.status == CommandStatus::New)
            .map(|c| {
                c.status = CommandStatus::Sent;
                c.updated_at = now;
                c.clone()
            })
            .collect()
    }

    /// Commands with the given status, without side effects.
    pub fn peek_by_status(&self, status: &CommandStatus) -> Vec<Command> {
        self.commands
            .iter()
            .filter(|c| c.status == *status)
            .cloned()
            .collect()
    }

    /// Set the status of a command and return the updated copy.
    ///
    /// `None` and empty strings become [`CommandStatus::Unknown`]. An
    /// unknown id leaves the store untouched.
    pub fn update_status(
        &mut self,
        id: CommandId,
        status: Option<&str>,
    ) -> Result<Command, RelayError> {
        let command = self
            .commands
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RelayError::NotFound(id))?;

        command.status = status.map_or(CommandStatus::Unknown, CommandStatus::parse);
        command.updated_at = Utc::now();

        Ok(command.clone())
    }

    /// Drop every command and restart id sequencing at 0.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.next_id = CommandId::FIRST;
    }

    /// Number of commands in the store.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the store holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands currently in the given status.
    pub fn count_by_status(&self, status: &CommandStatus) -> usize {
        self.commands.iter().filter(|c| c.status == *status).count()
    }
}

impl Default for CommandStore {
    fn default() -> Self {
        Self::new()
    }
}
