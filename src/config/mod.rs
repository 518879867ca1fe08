//! Configuration module

mod secrets;
mod site;

pub use secrets::{ConfigError, NewsletterCredentials};
pub use site::ContentConfig;
pub use site::NewsletterConfig;
pub use site::SiteConfig;
