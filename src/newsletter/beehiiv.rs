//! Beehiiv v2 API client. Holds the API key, so only ever runs server-side.

use anyhow::Result;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::provider::{
    read_reply, ProviderError, ProviderReply, SubscriptionProvider, SubscriptionRequest,
};
use crate::config::{NewsletterConfig, NewsletterCredentials};

/// Email addresses as a path segment: everything but `[A-Za-z0-9._-]` escaped
const EMAIL_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-').remove(b'_');

/// Body of `POST /publications/{id}/subscriptions`
#[derive(Serialize)]
struct CreateSubscription<'a> {
    #[serde(flatten)]
    request: &'a SubscriptionRequest,
    reactivate_existing: bool,
    send_welcome_email: bool,
}

/// Whether an address is already on the list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionStatus {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

pub struct BeehiivClient {
    api_base: String,
    credentials: NewsletterCredentials,
    client: reqwest::Client,
}

impl BeehiivClient {
    pub fn new(credentials: NewsletterCredentials, config: &NewsletterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    fn subscriptions_url(&self) -> String {
        format!(
            "{}/publications/{}/subscriptions",
            self.api_base, self.credentials.publication_id
        )
    }

    /// Look up an address. Any failure reads as "not subscribed".
    pub async fn subscription_status(&self, email: &str) -> SubscriptionStatus {
        let url = format!(
            "{}/by_email/{}",
            self.subscriptions_url(),
            utf8_percent_encode(email.trim(), EMAIL_SEGMENT)
        );

        let response = match self
            .client
            .get(&url)
            .bearer_auth(&self.credentials.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Error checking subscription status: {}", e);
                return SubscriptionStatus { exists: false, data: None };
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Subscription lookup returned {}", response.status());
            return SubscriptionStatus { exists: false, data: None };
        }

        match response.json::<Value>().await {
            Ok(data) => SubscriptionStatus { exists: true, data: Some(data) },
            Err(e) => {
                tracing::warn!("Unreadable subscription lookup response: {}", e);
                SubscriptionStatus { exists: false, data: None }
            }
        }
    }
}

#[async_trait]
impl SubscriptionProvider for BeehiivClient {
    async fn subscribe(&self, request: &SubscriptionRequest) -> Result<ProviderReply, ProviderError> {
        let body = CreateSubscription {
            request,
            reactivate_existing: false,
            send_welcome_email: true,
        };

        let response = self
            .client
            .post(self.subscriptions_url())
            .bearer_auth(&self.credentials.api_key)
            .json(&body)
            .send()
            .await?;

        let reply = read_reply(response).await?;
        tracing::debug!("Beehiiv responded with {}", reply.status);
        Ok(reply)
    }
}
