//! Newsletter signup from the command line

use anyhow::Result;

use crate::newsletter::{SignupForm, SignupState};
use crate::Site;

/// Subscribe `email`, through `relay` when given
pub async fn run(site: &Site, email: &str, relay: Option<&str>) -> Result<()> {
    let gateway = site.gateway(relay)?;

    let mut form = SignupForm::new();
    form.set_email(email);

    match form.submit(&gateway).await {
        SignupState::Success(message) | SignupState::AlreadySubscribed(message) => {
            println!("{}", message);
            Ok(())
        }
        SignupState::Error(message) => anyhow::bail!("{}", message),
        SignupState::Idle | SignupState::Submitting => {
            anyhow::bail!("Signup did not complete")
        }
    }
}

/// Report whether `email` is on the list. Needs the provider secrets.
pub async fn status(site: &Site, email: &str) -> Result<()> {
    let client = site.beehiiv_client()?;
    let status = client.subscription_status(email).await;

    if status.exists {
        println!("{} is subscribed", email.trim());
        if let Some(data) = status.data {
            tracing::debug!("Subscription record: {}", data);
        }
    } else {
        println!("{} is not subscribed", email.trim());
    }

    Ok(())
}
