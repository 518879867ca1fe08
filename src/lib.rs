//! devblog-rs: content and newsletter backend for a personal tech blog
//!
//! Loads markdown posts (frontmatter, derived metadata, tags) from disk or
//! over HTTP and relays newsletter signups to Beehiiv without exposing the
//! provider credentials to clients.

pub mod commands;
pub mod config;
pub mod content;
pub mod newsletter;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use content::{ContentLoader, ContentSource, FsSource, HttpSource};
use newsletter::{BeehiivClient, RelayClient, SubscriptionGateway};

/// The site context shared by commands and the server
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Static files served by `server`
    pub public_dir: PathBuf,
    /// Markdown posts
    pub posts_dir: PathBuf,
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        let posts_dir = base_dir.join(&config.content.posts_dir);

        Self {
            config,
            base_dir,
            public_dir,
            posts_dir,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.newsletter.timeout_secs)
    }

    /// Loader over `content.base_url` when set, otherwise over `posts_dir`
    pub fn content_loader(&self) -> Result<ContentLoader> {
        let content = &self.config.content;
        let source: Arc<dyn ContentSource> = match &content.base_url {
            Some(base_url) => {
                let manifest = content.manifest.clone().unwrap_or_else(|| {
                    tracing::warn!("content.base_url is set without a manifest; only direct lookups will work");
                    Vec::new()
                });
                Arc::new(HttpSource::new(base_url.clone(), manifest, self.timeout())?)
            }
            None => Arc::new(FsSource::new(&self.posts_dir, content.manifest.clone())),
        };

        Ok(ContentLoader::new(source, content.clone()))
    }

    /// Gateway talking to Beehiiv directly with credentials from the environment
    pub fn beehiiv_client(&self) -> Result<BeehiivClient> {
        let credentials = config::NewsletterCredentials::from_env()?;
        BeehiivClient::new(credentials, &self.config.newsletter)
    }

    /// Gateway for this process.
    ///
    /// An explicit relay URL wins, then `newsletter.relay_url`; without either
    /// the provider is called directly, which needs the secrets in the
    /// environment.
    pub fn gateway(&self, relay_url: Option<&str>) -> Result<SubscriptionGateway> {
        let newsletter = &self.config.newsletter;
        let relay_url = relay_url.or(newsletter.relay_url.as_deref());

        let gateway = match relay_url {
            Some(url) => {
                tracing::debug!("Subscribing through relay {}", url);
                SubscriptionGateway::new(Arc::new(RelayClient::new(url, self.timeout())?), newsletter)
            }
            None => SubscriptionGateway::new(Arc::new(self.beehiiv_client()?), newsletter),
        };
        Ok(gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.public_dir, dir.path().join("public"));
        assert_eq!(site.posts_dir, dir.path().join("public/blog-posts"));
    }

    #[test]
    fn test_reads_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "public_dir: dist\ncontent:\n  posts_dir: posts\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.public_dir, dir.path().join("dist"));
        assert_eq!(site.posts_dir, dir.path().join("posts"));
        assert_eq!(site.config.content.default_tag, "Blog");
    }

    #[test]
    fn test_relay_gateway_needs_no_secrets() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(site.gateway(Some("http://127.0.0.1:9/api/newsletter-subscribe")).is_ok());
    }
}
