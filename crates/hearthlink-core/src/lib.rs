//! Command queue, session state, and messaging relay for Hearthlink.
//!
//! Hearthlink sits between a game server and a LINE bot account. The game
//! server reports its status and polls for queued commands; users on the
//! messaging platform receive notifications when the server starts, when
//! players come and go, and when their commands finish.
//!
//! # Architecture
//!
//! All mutable state lives in a single [`relay::Relay`]: the
//! [`commands::CommandStore`] and the [`session::SessionState`] sit behind
//! one `RwLock`, and the [`transport::MessagingTransport`] is only called
//! after the lock is released. The HTTP layer in `hearthlink-server` owns
//! an `Arc<Relay>` and nothing else.

pub mod commands;
pub mod config;
pub mod error;
pub mod mirror;
pub mod notice;
pub mod relay;
pub mod session;
pub mod transport;

pub use config::RelayConfig;
pub use error::RelayError;
pub use relay::{InboundOutcome, Relay, RelaySummary};
pub use transport::MessagingTransport;
