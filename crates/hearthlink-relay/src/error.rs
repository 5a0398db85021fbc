//! Error types for the relay binary.
//!
//! [`StartupError`] wraps every failure mode between process start and
//! server exit so `main` can propagate with `?`.

/// Top-level error for the relay binary.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hearthlink_core::config::ConfigError,
    },

    /// The messaging transport could not be constructed.
    #[error("transport error: {source}")]
    Transport {
        /// The underlying relay error.
        #[from]
        source: hearthlink_core::RelayError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: hearthlink_server::ServerError,
    },
}
