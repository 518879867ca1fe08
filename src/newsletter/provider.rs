//! The seam between the gateway and whatever accepts subscriptions

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::NewsletterConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Credentials or endpoint missing on the side holding the secrets
    #[error("Newsletter provider is not configured: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

/// Campaign attribution sent along with every signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribution {
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
}

impl From<&NewsletterConfig> for Attribution {
    fn from(config: &NewsletterConfig) -> Self {
        Self {
            utm_source: config.utm_source.clone(),
            utm_medium: config.utm_medium.clone(),
            utm_campaign: config.utm_campaign.clone(),
        }
    }
}

/// One validated signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionRequest {
    pub email: String,
    #[serde(flatten)]
    pub attribution: Attribution,
}

/// Raw answer of the provider; classification happens in the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: Value,
}

impl ProviderReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    /// Send a single subscription request. No retries.
    async fn subscribe(&self, request: &SubscriptionRequest) -> Result<ProviderReply, ProviderError>;
}

/// Decode a JSON body, keeping non-JSON text as a string value
pub(crate) async fn read_reply(response: reqwest::Response) -> Result<ProviderReply, ProviderError> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok(ProviderReply { status, body })
}
