//! Shared type definitions for the Hearthlink relay.
//!
//! This crate is the single source of truth for the data that flows between
//! the game server, the display client, and the messaging platform. Types
//! that the display client consumes are exported to `TypeScript` via
//! `ts-rs`.
//!
//! # Modules
//!
//! - [`command`] -- Queued commands and their lifecycle status
//! - [`status`] -- Opaque status documents reported by the game server
//! - [`webhook`] -- Inbound webhook events from the messaging platform

pub mod command;
pub mod status;
pub mod webhook;

// Re-export all public types at crate root for convenience.
pub use command::{Command, CommandId, CommandStatus};
pub use status::{StatusDocument, StatusSource};
pub use webhook::{EventSource, InboundEvent, InboundMessage, WebhookPayload};
