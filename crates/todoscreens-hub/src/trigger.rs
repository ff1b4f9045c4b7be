//! Outbound webhook calls

use crate::button::HubAction;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Failures firing a trigger
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Connection, TLS or timeout failure
    #[error("Webhook transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered but did not accept the trigger
    #[error("Webhook rejected trigger with HTTP {status}: {body}")]
    Rejected {
        /// HTTP status
        status: u16,
        /// Response body
        body: String,
    },
}

/// The server's answer to an accepted trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerReply {
    /// HTTP status
    pub status: u16,
    /// Response body, e.g. `Updated`
    pub body: String,
}

/// Fires actions at the webhook server
#[async_trait]
pub trait TriggerClient: Send + Sync {
    /// Ask the server to perform `action`
    async fn fire(&self, action: HubAction) -> Result<TriggerReply, TriggerError>;
}

/// Where the webhook server lives
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Server root, e.g. `http://192.168.1.10:8000`
    pub base_url: String,
    /// Shared secret placed in the webhook path
    pub token: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            token: String::new(),
        }
    }
}

/// Posts actions to the webhook server with an empty body
#[derive(Debug, Clone)]
pub struct HttpTrigger {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl HttpTrigger {
    /// Build the HTTP client
    pub fn new(config: WebhookConfig) -> Result<Self, TriggerError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("todoscreens-hub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Full URL for `action`
    pub fn url(&self, action: HubAction) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            action.path(&self.config.token)
        )
    }
}

#[async_trait]
impl TriggerClient for HttpTrigger {
    async fn fire(&self, action: HubAction) -> Result<TriggerReply, TriggerError> {
        let response = self
            .client
            .post(self.url(action))
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if (200..300).contains(&status) {
            Ok(TriggerReply { status, body })
        } else {
            Err(TriggerError::Rejected { status, body })
        }
    }
}
