//! Configuration for the relay process.
//!
//! All configuration is loaded from environment variables. The relay needs
//! to know where to listen and how to reach the LINE Messaging API. When no
//! channel access token is configured the relay runs in dry-run mode and
//! records outgoing messages in memory instead of sending them.

use std::time::Duration;

use crate::relay::DEFAULT_STATUS_STREAM_CAPACITY;

/// Default LINE Messaging API base URL.
pub const DEFAULT_LINE_API_BASE: &str = "https://api.line.me/v2/bot";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid {name}: {message}")]
    Invalid {
        /// The offending variable name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// Complete relay configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Address to bind the HTTP server to.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// LINE credentials; `None` selects the dry-run outbox.
    pub line: Option<LineConfig>,
    /// Buffer size of the status snapshot stream for `WebSocket` clients.
    pub status_stream_capacity: usize,
}

/// Connection settings for the LINE Messaging API.
#[derive(Clone, PartialEq, Eq)]
pub struct LineConfig {
    /// Channel access token sent as a bearer token.
    pub access_token: String,
    /// API base URL, without a trailing slash.
    pub api_base: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl core::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineConfig")
            .field("access_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8888,
            line: None,
            status_stream_capacity: DEFAULT_STATUS_STREAM_CAPACITY,
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `HEARTHLINK_HOST` -- bind address (default `0.0.0.0`)
    /// - `PORT` -- listen port (default `8888`)
    /// - `LINE_CHANNEL_ACCESS_TOKEN` -- enables LINE delivery when non-empty
    /// - `LINE_API_BASE` -- API base URL (default [`DEFAULT_LINE_API_BASE`])
    /// - `LINE_REQUEST_TIMEOUT_MS` -- per-request timeout (default `10000`)
    /// - `STATUS_STREAM_CAPACITY` -- `WebSocket` status buffer (default `64`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HEARTHLINK_HOST").unwrap_or(defaults.host);
        let port = parse_or("PORT", var("PORT"), defaults.port)?;
        let status_stream_capacity = parse_or(
            "STATUS_STREAM_CAPACITY",
            var("STATUS_STREAM_CAPACITY"),
            defaults.status_stream_capacity,
        )?;
        if status_stream_capacity == 0 {
            return Err(ConfigError::Invalid {
                name: "STATUS_STREAM_CAPACITY",
                message: String::from("must be at least 1"),
            });
        }

        let line = match var("LINE_CHANNEL_ACCESS_TOKEN") {
            Some(access_token) => {
                let api_base = var("LINE_API_BASE")
                    .unwrap_or_else(|| DEFAULT_LINE_API_BASE.to_owned())
                    .trim_end_matches('/')
                    .to_owned();
                let timeout_ms: u64 =
                    parse_or("LINE_REQUEST_TIMEOUT_MS", var("LINE_REQUEST_TIMEOUT_MS"), 10_000)?;
                Some(LineConfig {
                    access_token,
                    api_base,
                    request_timeout: Duration::from_millis(timeout_ms),
                })
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            line,
            status_stream_capacity,
        })
    }

    /// Whether outgoing messages are only recorded, not sent.
    pub const fn is_dry_run(&self) -> bool {
        self.line.is_none()
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.map_or(Ok(default), |value| {
        value.trim().parse().map_err(|e| ConfigError::Invalid {
            name,
            message: format!("{value:?}: {e}"),
        })
    })
}
