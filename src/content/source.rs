//! Where markdown files come from
//!
//! A [`ContentSource`] lists candidate filenames and fetches their text.
//! Missing files are `Ok(None)`, never errors.

use anyhow::Result;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use walkdir::WalkDir;

use super::slug::is_markdown_file;

/// Characters escaped when a filename becomes a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'`');

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Candidate filenames in a stable order
    async fn list(&self) -> Result<Vec<String>>;

    /// Raw text of `name`, or `None` when it does not exist
    async fn fetch(&self, name: &str) -> Result<Option<String>>;
}

/// Markdown files in a local directory
pub struct FsSource {
    root: PathBuf,
    manifest: Option<Vec<String>>,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>, manifest: Option<Vec<String>>) -> Self {
        Self {
            root: root.into(),
            manifest,
        }
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        // Never escape the posts directory
        let relative = std::path::Path::new(name);
        let escapes = relative.components().any(|c| {
            !matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir)
        });
        (!escapes).then(|| self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for FsSource {
    async fn list(&self) -> Result<Vec<String>> {
        if let Some(manifest) = &self.manifest {
            return Ok(manifest.clone());
        }
        if !self.root.exists() {
            tracing::debug!("Posts directory {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                let relative = path.strip_prefix(&self.root).unwrap_or(path);
                names.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }

        Ok(names)
    }

    async fn fetch(&self, name: &str) -> Result<Option<String>> {
        let Some(path) = self.resolve(name) else {
            tracing::warn!("Refusing to read {:?} outside the posts directory", name);
            return Ok(None);
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Markdown files served by a static host under a base URL.
///
/// Static hosts cannot list directories, so the manifest names the files.
pub struct HttpSource {
    base_url: String,
    manifest: Vec<String>,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, manifest: Vec<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            manifest,
            client,
        })
    }

    fn url_for(&self, name: &str) -> String {
        let encoded: Vec<String> = name
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect();
        format!("{}/{}", self.base_url.trim_end_matches('/'), encoded.join("/"))
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.manifest.clone())
    }

    async fn fetch(&self, name: &str) -> Result<Option<String>> {
        let url = self.url_for(name);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            tracing::debug!("GET {} returned {}", url, response.status());
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}
