//! Newsletter provider secrets
//!
//! Secrets are only ever read from the environment of the process that talks
//! to the provider (the relay or the CLI). They are never part of `_config.yml`.

use std::fmt;
use thiserror::Error;

pub const API_KEY_VAR: &str = "BEEHIIV_API_KEY";
pub const PUBLICATION_ID_VAR: &str = "BEEHIIV_PUBLICATION_ID";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing secret: {0}")]
    MissingSecret(&'static str),
}

/// Beehiiv API key and publication id
#[derive(Clone, PartialEq, Eq)]
pub struct NewsletterCredentials {
    pub api_key: String,
    pub publication_id: String,
}

impl NewsletterCredentials {
    pub fn new(api_key: impl Into<String>, publication_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            publication_id: publication_id.into(),
        }
    }

    /// Read credentials from `BEEHIIV_API_KEY` and `BEEHIIV_PUBLICATION_ID`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    /// Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingSecret(name))
        };

        Ok(Self {
            api_key: read(API_KEY_VAR)?,
            publication_id: read(PUBLICATION_ID_VAR)?,
        })
    }
}

// Keep the key out of logs and panics
impl fmt::Debug for NewsletterCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsletterCredentials")
            .field("api_key", &"<redacted>")
            .field("publication_id", &self.publication_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_credentials_from_lookup() {
        let creds = NewsletterCredentials::from_lookup(lookup(&[
            (API_KEY_VAR, "key-123"),
            (PUBLICATION_ID_VAR, "pub-456"),
        ]))
        .unwrap();
        assert_eq!(creds.api_key, "key-123");
        assert_eq!(creds.publication_id, "pub-456");
    }

    #[test]
    fn test_missing_and_blank_secrets() {
        let err = NewsletterCredentials::from_lookup(lookup(&[(PUBLICATION_ID_VAR, "pub")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingSecret(API_KEY_VAR));

        let err = NewsletterCredentials::from_lookup(lookup(&[
            (API_KEY_VAR, "key"),
            (PUBLICATION_ID_VAR, "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingSecret(PUBLICATION_ID_VAR));
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = NewsletterCredentials::new("super-secret", "pub");
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("pub"));
    }
}
