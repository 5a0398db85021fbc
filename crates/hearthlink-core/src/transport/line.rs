//! LINE Messaging API backend.
//!
//! Sends text messages through the push and broadcast endpoints:
//!
//! - `POST {api_base}/message/push` with `{to, messages}`
//! - `POST {api_base}/message/broadcast` with `{messages}`
//!
//! Both authenticate with the channel access token as a bearer token.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::LineConfig;
use crate::error::RelayError;

/// A text message object as the Messaging API expects it.
#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> TextMessage<'a> {
    const fn new(text: &'a str) -> Self {
        Self { kind: "text", text }
    }
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct BroadcastRequest<'a> {
    messages: [TextMessage<'a>; 1],
}

/// Backend for the LINE Messaging API.
pub struct LineTransport {
    client: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl LineTransport {
    /// Create a new LINE backend.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Delivery`] if the HTTP client cannot be built.
    pub fn new(config: &LineConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RelayError::Delivery(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Push a text message to one user.
    pub async fn push(&self, user_id: &str, text: &str) -> Result<(), RelayError> {
        let body = PushRequest {
            to: user_id,
            messages: [TextMessage::new(text)],
        };
        self.post("message/push", &body).await
    }

    /// Broadcast a text message to every friend of the bot.
    pub async fn broadcast(&self, text: &str) -> Result<(), RelayError> {
        let body = BroadcastRequest {
            messages: [TextMessage::new(text)],
        };
        self.post("message/broadcast", &body).await
    }

    async fn post<B: Serialize + Sync>(&self, endpoint: &str, body: &B) -> Result<(), RelayError> {
        let url = format!("{}/{endpoint}", self.api_base);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::Delivery(format!("LINE request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            warn!(%status, endpoint, "LINE API rejected message");
            return Err(RelayError::Delivery(format!(
                "LINE returned {status}: {error_body}"
            )));
        }

        debug!(%status, endpoint, "LINE API accepted message");
        Ok(())
    }
}
