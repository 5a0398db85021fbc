//! The single game-server session tracked by the relay.
//!
//! A session is uninitialized while its name is empty. `initialize` sets
//! the name (last caller wins), `reset` empties it again.
//!
//! ```text
//! Uninitialized --initialize--> Initialized --reset--> Uninitialized
//! ```

use hearthlink_types::StatusDocument;
use serde_json::Value;

use crate::error::RelayError;
use crate::mirror::StatusMirror;
use crate::notice::Notice;

/// Name and latest status snapshot of the registered game server.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    name: String,
    mirror: StatusMirror,
}

impl SessionState {
    /// A fresh, uninitialized session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game server by name.
    ///
    /// Overwrites any existing name. Returns the broadcast to send.
    pub fn initialize(&mut self, name: &str) -> Result<Notice, RelayError> {
        if name.trim().is_empty() {
            return Err(RelayError::Validation(String::from("name is required")));
        }
        name.clone_into(&mut self.name);
        Ok(Notice::ServerInitialized {
            name: name.to_owned(),
        })
    }

    /// Replace the status snapshot.
    ///
    /// The document must be present and a JSON object. Returns the
    /// broadcast to send, if the source hint calls for one.
    pub fn update_status(
        &mut self,
        document: Option<Value>,
        source_hint: Option<&str>,
    ) -> Result<Option<Notice>, RelayError> {
        let document = document
            .ok_or_else(|| RelayError::Validation(String::from("status document is required")))?;
        let document = StatusDocument::from_value(document).ok_or_else(|| {
            RelayError::Validation(String::from("status document must be a JSON object"))
        })?;
        Ok(self.mirror.replace(document, source_hint))
    }

    /// The last reported snapshot, or `{}`.
    pub fn current_status(&self) -> StatusDocument {
        self.mirror.current().clone()
    }

    /// Return to the uninitialized state and forget the snapshot.
    ///
    /// Does not touch the command queue.
    pub fn reset(&mut self) {
        self.name.clear();
        self.mirror.clear();
    }

    /// Whether a game server has registered.
    pub fn is_initialized(&self) -> bool {
        !self.name.is_empty()
    }

    /// The registered server name; empty when uninitialized.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized_with_empty_status() {
        let session = SessionState::new();
        assert!(!session.is_initialized());
        assert_eq!(session.name(), "");
        assert!(session.current_status().is_empty());
    }

    #[test]
    fn initialize_requires_name() {
        let mut session = SessionState::new();
        assert!(matches!(session.initialize(""), Err(RelayError::Validation(_))));
        assert!(matches!(session.initialize("  "), Err(RelayError::Validation(_))));
        assert!(!session.is_initialized());
    }

    #[test]
    fn last_initialize_wins() {
        let mut session = SessionState::new();
        let _ = session.initialize("Alice's World");
        let notice = session.initialize("Bob's World").ok();
        assert_eq!(session.name(), "Bob's World");
        assert_eq!(
            notice.map(|n| n.to_string()),
            Some(String::from("Server Initialized: Bob's World"))
        );
    }

    #[test]
    fn status_must_be_an_object() {
        let mut session = SessionState::new();
        assert!(matches!(
            session.update_status(None, None),
            Err(RelayError::Validation(_))
        ));
        assert!(matches!(
            session.update_status(Some(serde_json::json!([1])), None),
            Err(RelayError::Validation(_))
        ));
    }

    #[test]
    fn status_is_accepted_before_initialize() {
        let mut session = SessionState::new();
        let result = session.update_status(Some(serde_json::json!({"day": 1})), None);
        assert!(matches!(result, Ok(None)));
        assert_eq!(
            session.current_status().into_value(),
            serde_json::json!({"day": 1})
        );
    }

    #[test]
    fn reset_clears_name_and_status() {
        let mut session = SessionState::new();
        let _ = session.initialize("Alice's World");
        let _ = session.update_status(Some(serde_json::json!({"day": 9})), None);

        session.reset();
        assert!(!session.is_initialized());
        assert!(session.current_status().is_empty());
    }
}
