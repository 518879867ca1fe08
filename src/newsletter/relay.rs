//! Client for the subscription relay. Carries no provider secrets.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::provider::{
    read_reply, ProviderError, ProviderReply, SubscriptionProvider, SubscriptionRequest,
};

/// Status the relay answers with when it has no provider credentials
pub const RELAY_UNCONFIGURED_STATUS: u16 = 503;

pub struct RelayClient {
    url: String,
    client: reqwest::Client,
}

impl RelayClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl SubscriptionProvider for RelayClient {
    async fn subscribe(&self, request: &SubscriptionRequest) -> Result<ProviderReply, ProviderError> {
        // Attribution is added by the relay from its own configuration
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "email": request.email }))
            .send()
            .await?;

        let reply = read_reply(response).await?;
        if reply.status == RELAY_UNCONFIGURED_STATUS {
            return Err(ProviderError::Configuration(
                "relay has no provider credentials".to_string(),
            ));
        }
        Ok(reply)
    }
}
