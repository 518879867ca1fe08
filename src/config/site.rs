//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Directory
    pub public_dir: String,

    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub newsletter: NewsletterConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Tech with Dikshant".to_string(),
            description: "DevOps and cloud tutorials".to_string(),
            author: "Dikshant".to_string(),
            url: "http://localhost:8080".to_string(),
            public_dir: "public".to_string(),
            content: ContentConfig::default(),
            newsletter: NewsletterConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded site config from {:?}", path.as_ref());
        Ok(config)
    }
}

/// Where blog posts come from and how missing metadata is derived
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding the markdown posts, relative to the site directory
    pub posts_dir: String,
    /// Load posts over HTTP from this base URL instead of the filesystem
    pub base_url: Option<String>,
    /// Explicit list of post filenames; replaces directory listing
    pub manifest: Option<Vec<String>>,
    pub default_tag: String,
    pub words_per_minute: usize,
    pub excerpt_length: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_dir: "public/blog-posts".to_string(),
            base_url: None,
            manifest: None,
            default_tag: "Blog".to_string(),
            words_per_minute: 200,
            excerpt_length: 150,
        }
    }
}

/// Newsletter provider settings. Credentials are never read from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub api_base: String,
    /// Relay endpoint used by clients that must not hold provider secrets
    pub relay_url: Option<String>,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub timeout_secs: u64,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.beehiiv.com/v2".to_string(),
            relay_url: None,
            utm_source: "website".to_string(),
            utm_medium: "newsletter_signup".to_string(),
            utm_campaign: "tech_with_dikshant".to_string(),
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content.posts_dir, "public/blog-posts");
        assert_eq!(config.content.words_per_minute, 200);
        assert_eq!(config.newsletter.timeout_secs, 10);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
content:
  default_tag: Notes
  manifest:
    - a.md
    - b.md
newsletter:
  utm_campaign: spring
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.content.default_tag, "Notes");
        assert_eq!(
            config.content.manifest,
            Some(vec!["a.md".to_string(), "b.md".to_string()])
        );
        // untouched keys keep their defaults
        assert_eq!(config.content.excerpt_length, 150);
        assert_eq!(config.newsletter.utm_campaign, "spring");
        assert_eq!(config.newsletter.utm_source, "website");
    }
}
