//! Newsletter signup against Beehiiv

mod beehiiv;
pub mod gateway;
mod provider;
mod relay;
mod signup;

pub use beehiiv::{BeehiivClient, SubscriptionStatus};
pub use gateway::{classify, error_detail, validate_email, SubscribeOutcome, SubscriptionGateway};
pub use provider::{
    Attribution, ProviderError, ProviderReply, SubscriptionProvider, SubscriptionRequest,
};
pub use relay::{RelayClient, RELAY_UNCONFIGURED_STATUS};
pub use signup::{SignupForm, SignupState};
