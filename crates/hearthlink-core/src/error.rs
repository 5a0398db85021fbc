//! Error types for the relay core.
//!
//! Uses `thiserror` for typed errors that surface unchanged to the HTTP
//! layer, which maps each variant onto a status code. Nothing here is
//! retried internally.

use hearthlink_types::CommandId;

/// Errors that can occur in relay operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A required field was missing or empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation requires an initialized session.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// No command has the requested id.
    #[error("command {0} not found")]
    NotFound(CommandId),

    /// The messaging transport rejected or failed to deliver a message.
    #[error("delivery error: {0}")]
    Delivery(String),
}
