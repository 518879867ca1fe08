//! Subscription gateway: validates an email, sends it once, and normalizes
//! whatever comes back into a [`SubscribeOutcome`].

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::provider::{
    Attribution, ProviderError, ProviderReply, SubscriptionProvider, SubscriptionRequest,
};
use crate::config::NewsletterConfig;

pub const SUBSCRIBED_MESSAGE: &str = "You've been successfully subscribed to our newsletter!";
pub const ALREADY_SUBSCRIBED_MESSAGE: &str = "This email is already subscribed to our newsletter!";
pub const MISSING_EMAIL_MESSAGE: &str = "Please enter your email address.";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const NOT_CONFIGURED_MESSAGE: &str =
    "The newsletter service is unavailable right now. Please try again later.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const FAILED_MESSAGE: &str = "Failed to subscribe. Please try again later.";

/// Provider phrases meaning the address is on the list already
const ALREADY_SUBSCRIBED_MARKERS: [&str; 2] = ["already exists", "already subscribed"];

/// Normalized result of one signup attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubscribeOutcome {
    Subscribed { message: String },
    AlreadySubscribed { message: String },
    InvalidEmail { message: String },
    /// Provider secrets are missing; deliberately does not say which
    ConfigurationError { message: String },
    Failed { status: u16, message: String },
    NetworkError { message: String },
}

impl SubscribeOutcome {
    pub fn message(&self) -> &str {
        match self {
            SubscribeOutcome::Subscribed { message }
            | SubscribeOutcome::AlreadySubscribed { message }
            | SubscribeOutcome::InvalidEmail { message }
            | SubscribeOutcome::ConfigurationError { message }
            | SubscribeOutcome::Failed { message, .. }
            | SubscribeOutcome::NetworkError { message } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubscribeOutcome::Subscribed { .. })
    }

    pub fn configuration_error() -> Self {
        SubscribeOutcome::ConfigurationError {
            message: NOT_CONFIGURED_MESSAGE.to_string(),
        }
    }
}

/// Minimal check: present and containing `@`. Returns the trimmed address.
pub fn validate_email(email: &str) -> Result<&str, SubscribeOutcome> {
    let email = email.trim();
    if email.is_empty() {
        return Err(SubscribeOutcome::InvalidEmail {
            message: MISSING_EMAIL_MESSAGE.to_string(),
        });
    }
    if !email.contains('@') {
        return Err(SubscribeOutcome::InvalidEmail {
            message: INVALID_EMAIL_MESSAGE.to_string(),
        });
    }
    Ok(email)
}

#[derive(Clone)]
pub struct SubscriptionGateway {
    provider: Arc<dyn SubscriptionProvider>,
    attribution: Attribution,
}

impl SubscriptionGateway {
    pub fn new(provider: Arc<dyn SubscriptionProvider>, config: &NewsletterConfig) -> Self {
        Self {
            provider,
            attribution: Attribution::from(config),
        }
    }

    /// Submit one address. Invalid input never reaches the provider.
    pub async fn subscribe(&self, email: &str) -> SubscribeOutcome {
        let email = match validate_email(email) {
            Ok(email) => email,
            Err(outcome) => return outcome,
        };

        let request = SubscriptionRequest {
            email: email.to_string(),
            attribution: self.attribution.clone(),
        };

        let outcome = match self.provider.subscribe(&request).await {
            Ok(reply) => classify(&reply),
            Err(ProviderError::Configuration(reason)) => {
                tracing::error!("Newsletter provider not configured: {}", reason);
                SubscribeOutcome::configuration_error()
            }
            Err(e) => {
                tracing::warn!("Newsletter signup failed to reach provider: {}", e);
                SubscribeOutcome::NetworkError {
                    message: NETWORK_ERROR_MESSAGE.to_string(),
                }
            }
        };

        tracing::info!(outcome = outcome_name(&outcome), "Newsletter signup processed");
        outcome
    }
}

/// Map a provider reply onto an outcome
pub fn classify(reply: &ProviderReply) -> SubscribeOutcome {
    if reply.is_success() {
        return SubscribeOutcome::Subscribed {
            message: SUBSCRIBED_MESSAGE.to_string(),
        };
    }

    let detail = error_detail(&reply.body);
    if let Some(detail) = &detail {
        let lower = detail.to_lowercase();
        if ALREADY_SUBSCRIBED_MARKERS.iter().any(|m| lower.contains(m)) {
            return SubscribeOutcome::AlreadySubscribed {
                message: ALREADY_SUBSCRIBED_MESSAGE.to_string(),
            };
        }
    }

    tracing::debug!("Provider rejected signup with {}: {:?}", reply.status, detail);
    SubscribeOutcome::Failed {
        status: reply.status,
        message: detail.unwrap_or_else(|| FAILED_MESSAGE.to_string()),
    }
}

/// Pull a human readable error out of a provider or relay body.
///
/// Tries `errors[0].detail`, then all `errors[*].message` joined, then
/// top-level `message`, then top-level `error`.
pub fn error_detail(body: &Value) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if let Some(detail) = errors.first().and_then(|e| e.get("detail")).and_then(non_empty) {
            return Some(detail);
        }

        let messages: Vec<String> = errors
            .iter()
            .filter_map(|e| e.get("message").and_then(non_empty).or_else(|| non_empty(e)))
            .collect();
        if !messages.is_empty() {
            return Some(messages.join(", "));
        }
    }

    body.get("message")
        .and_then(non_empty)
        .or_else(|| body.get("error").and_then(non_empty))
}

fn outcome_name(outcome: &SubscribeOutcome) -> &'static str {
    match outcome {
        SubscribeOutcome::Subscribed { .. } => "subscribed",
        SubscribeOutcome::AlreadySubscribed { .. } => "already_subscribed",
        SubscribeOutcome::InvalidEmail { .. } => "invalid_email",
        SubscribeOutcome::ConfigurationError { .. } => "configuration_error",
        SubscribeOutcome::Failed { .. } => "failed",
        SubscribeOutcome::NetworkError { .. } => "network_error",
    }
}
