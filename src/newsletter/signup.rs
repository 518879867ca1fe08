//! Signup form state machine
//!
//! ```text
//! Idle ──begin_submit──> Submitting ──finish──> Success | AlreadySubscribed | Error
//!   ^                                                     │
//!   └──────────────── begin_submit (retry) ───────────────┘
//! ```
//!
//! A second `begin_submit` while a request is in flight is refused, which is
//! what keeps repeated clicks from sending duplicate signups.

use super::gateway::{validate_email, SubscribeOutcome, SubscriptionGateway};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupState {
    Idle,
    Submitting,
    Success(String),
    AlreadySubscribed(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct SignupForm {
    email: String,
    state: SignupState,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            state: SignupState::Idle,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn state(&self) -> &SignupState {
        &self.state
    }

    /// The submit trigger is disabled while this is true
    pub fn is_submitting(&self) -> bool {
        self.state == SignupState::Submitting
    }

    /// Enter `Submitting` and hand out the address to send.
    ///
    /// Returns `None` when a request is already in flight, or when the input
    /// fails validation (the form then shows the validation error).
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.is_submitting() {
            tracing::debug!("Ignoring duplicate signup submission");
            return None;
        }

        match validate_email(&self.email) {
            Ok(email) => {
                let email = email.to_string();
                self.state = SignupState::Submitting;
                Some(email)
            }
            Err(outcome) => {
                self.state = SignupState::Error(outcome.message().to_string());
                None
            }
        }
    }

    /// Leave `Submitting` according to the gateway's outcome
    pub fn finish(&mut self, outcome: SubscribeOutcome) {
        if !self.is_submitting() {
            tracing::debug!("Signup outcome arrived without a pending submission");
            return;
        }

        self.state = match outcome {
            SubscribeOutcome::Subscribed { message } => {
                self.email.clear();
                SignupState::Success(message)
            }
            SubscribeOutcome::AlreadySubscribed { message } => SignupState::AlreadySubscribed(message),
            other => SignupState::Error(other.message().to_string()),
        };
    }

    /// Run a full submit cycle against `gateway`
    pub async fn submit(&mut self, gateway: &SubscriptionGateway) -> &SignupState {
        if let Some(email) = self.begin_submit() {
            let outcome = gateway.subscribe(&email).await;
            self.finish(outcome);
        }
        &self.state
    }
}
