//! Status mirror: the last status document reported by the game server.
//!
//! Documents are stored wholesale and served back verbatim. The only
//! interpretation is the trigger check in [`StatusMirror::replace`], which
//! turns player join/leave reports into a [`Notice`].

use hearthlink_types::{StatusDocument, StatusSource};

use crate::notice::{Notice, UNKNOWN_PLAYER};

/// Holder for the most recent status snapshot.
#[derive(Debug, Clone, Default)]
pub struct StatusMirror {
    snapshot: StatusDocument,
}

impl StatusMirror {
    /// An empty mirror serving `{}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot and report whether it should be announced.
    ///
    /// `source_hint` takes precedence over the document's own `source`
    /// field. Unrecognized or absent sources yield `None`.
    pub fn replace(&mut self, document: StatusDocument, source_hint: Option<&str>) -> Option<Notice> {
        let notice = announcement(&document, source_hint);
        self.snapshot = document;
        notice
    }

    /// The current snapshot.
    pub const fn current(&self) -> &StatusDocument {
        &self.snapshot
    }

    /// Forget the snapshot.
    pub fn clear(&mut self) {
        self.snapshot = StatusDocument::new();
    }
}

/// Decide which notice, if any, a status report triggers.
fn announcement(document: &StatusDocument, source_hint: Option<&str>) -> Option<Notice> {
    let hint = source_hint
        .filter(|h| !h.is_empty())
        .or_else(|| document.source())?;

    let player = document.player().unwrap_or(UNKNOWN_PLAYER).to_owned();
    match StatusSource::from_hint(hint) {
        StatusSource::PlayerJoined => Some(Notice::PlayerJoined { player }),
        StatusSource::PlayerLeft => Some(Notice::PlayerLeft { player }),
        StatusSource::Other(_) => None,
    }
}
