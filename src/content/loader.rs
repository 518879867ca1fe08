//! Content loader - discovers, parses and sorts blog posts

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

use super::slug::filename_candidates;
use super::source::ContentSource;
use super::Post;
use crate::config::ContentConfig;

/// Loads posts from a [`ContentSource`]
#[derive(Clone)]
pub struct ContentLoader {
    source: Arc<dyn ContentSource>,
    config: ContentConfig,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(source: Arc<dyn ContentSource>, config: ContentConfig) -> Self {
        Self { source, config }
    }

    /// Load every post, newest first.
    ///
    /// Files that are missing, unreadable or not markdown are skipped; this
    /// never fails as a whole. Posts with equal dates keep listing order.
    pub async fn load_posts(&self) -> Vec<Post> {
        let names = match self.source.list().await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Failed to list posts: {}", e);
                return Vec::new();
            }
        };

        let mut tasks = JoinSet::new();
        for (index, name) in names.into_iter().enumerate() {
            let source = Arc::clone(&self.source);
            let config = self.config.clone();
            tasks.spawn(async move { (index, load_one(source.as_ref(), &name, &config).await) });
        }

        let mut loaded = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(post))) => loaded.push((index, post)),
                Ok((_, None)) => {}
                Err(e) => tracing::warn!("Post loading task failed: {}", e),
            }
        }

        // Restore encounter order so the date sort below breaks ties by it
        loaded.sort_by_key(|(index, _)| *index);
        let mut posts: Vec<Post> = loaded.into_iter().map(|(_, post)| post).collect();
        warn_duplicate_ids(&posts);

        posts.sort_by_cached_key(|post| Reverse(post.sort_key()));
        tracing::debug!("Loaded {} posts", posts.len());
        posts
    }

    /// Find a post by id.
    ///
    /// Falls back to reading filenames the id could have come from when the
    /// listing does not contain it (e.g. a static host without a manifest entry).
    pub async fn load_post(&self, id: &str) -> Option<Post> {
        let posts = self.load_posts().await;
        self.find_post(&posts, id).await
    }

    /// Like [`load_post`](Self::load_post), over an already loaded listing
    pub async fn find_post(&self, posts: &[Post], id: &str) -> Option<Post> {
        if let Some(post) = posts.iter().rev().find(|p| p.id == id) {
            return Some(post.clone());
        }

        for candidate in filename_candidates(id) {
            if let Some(post) = load_one(self.source.as_ref(), &candidate, &self.config).await {
                tracing::debug!("Resolved {} via {}", id, candidate);
                return Some(post);
            }
        }

        tracing::debug!("Post not found: {}", id);
        None
    }
}

/// Fetch and parse one file; every failure becomes `None`
async fn load_one(source: &dyn ContentSource, name: &str, config: &ContentConfig) -> Option<Post> {
    match source.fetch(name).await {
        Ok(Some(text)) if looks_like_markdown(&text) => Some(Post::from_markdown(name, &text, config)),
        Ok(Some(_)) => {
            tracing::debug!("Skipping {}: not a markdown document", name);
            None
        }
        Ok(None) => {
            tracing::debug!("Skipping {}: not found", name);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to load post {:?}: {}", name, e);
            None
        }
    }
}

/// Static hosts answer unknown paths with the app's index.html, so a
/// successful fetch alone does not mean we got a post.
pub fn looks_like_markdown(text: &str) -> bool {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let head: String = trimmed.chars().take(64).collect::<String>().to_ascii_lowercase();
    if head.starts_with("<!doctype") || head.starts_with("<html") {
        return false;
    }

    trimmed.starts_with("---") || trimmed.lines().any(|line| line.trim_start().starts_with('#'))
}

fn warn_duplicate_ids(posts: &[Post]) {
    let mut seen = HashSet::new();
    for post in posts {
        if !seen.insert(post.id.as_str()) {
            tracing::warn!("Duplicate post id {} (from {})", post.id, post.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source; `None` entries are listed but missing
    struct MemorySource {
        files: Vec<(String, Option<String>)>,
        broken: Vec<String>,
        fetches: AtomicUsize,
    }

    impl MemorySource {
        fn new(files: &[(&str, Option<&str>)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(n, c)| (n.to_string(), c.map(|c| c.to_string())))
                    .collect(),
                broken: Vec::new(),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentSource for MemorySource {
        async fn list(&self) -> anyhow::Result<Vec<String>> {
            Ok(self.files.iter().map(|(n, _)| n.clone()).collect())
        }

        async fn fetch(&self, name: &str) -> anyhow::Result<Option<String>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.broken.iter().any(|b| b == name) {
                return Err(anyhow!("connection reset"));
            }
            let files: HashMap<_, _> = self.files.iter().cloned().collect();
            Ok(files.get(name).cloned().flatten())
        }
    }

    fn loader(source: MemorySource) -> ContentLoader {
        ContentLoader::new(Arc::new(source), ContentConfig::default())
    }

    fn dated(date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\nbody", date, date)
    }

    #[tokio::test]
    async fn test_sorted_newest_first() {
        let older = dated("2025-01-10");
        let newer = dated("2025-01-15");
        let posts = loader(MemorySource::new(&[
            ("older.md", Some(older.as_str())),
            ("newer.md", Some(newer.as_str())),
        ]))
        .load_posts()
        .await;

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_ties_keep_listing_order() {
        let same = dated("2025-01-10");
        let names = ["c.md", "a.md", "b.md", "d.md"];
        let files: Vec<_> = names.iter().map(|n| (*n, Some(same.as_str()))).collect();
        let posts = loader(MemorySource::new(&files)).load_posts().await;

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_skipped() {
        let a = dated("2025-01-01");
        let b = dated("2025-02-01");
        let posts = loader(MemorySource::new(&[
            ("a.md", Some(a.as_str())),
            ("missing.md", None),
            ("b.md", Some(b.as_str())),
        ]))
        .load_posts()
        .await;

        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.id != "missing"));
    }

    #[tokio::test]
    async fn test_html_and_errors_are_skipped() {
        let mut source = MemorySource::new(&[
            ("spa.md", Some("<!DOCTYPE html><html><style>#root{}</style></html>")),
            ("plain.md", Some("just words, no heading")),
            ("broken.md", Some("# never read")),
            ("ok.md", Some("# Fine")),
        ]);
        source.broken.push("broken.md".to_string());

        let posts = loader(source).load_posts().await;
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
    }

    #[tokio::test]
    async fn test_load_post_by_id() {
        let source = MemorySource::new(&[("Docker Tips.md", Some("# Docker Tips"))]);
        let post = loader(source).load_post("docker-tips").await.unwrap();
        assert_eq!(post.title, "Docker Tips");
        assert!(post.tags.contains(&"Docker".to_string()));
    }

    #[tokio::test]
    async fn test_load_post_filename_fallback() {
        // Not listed, but fetchable under an underscore spelling
        struct Unlisted;

        #[async_trait]
        impl ContentSource for Unlisted {
            async fn list(&self) -> anyhow::Result<Vec<String>> {
                Ok(Vec::new())
            }

            async fn fetch(&self, name: &str) -> anyhow::Result<Option<String>> {
                Ok((name == "my_post.md").then(|| "# My Post\n\nHello".to_string()))
            }
        }

        let loader = ContentLoader::new(Arc::new(Unlisted), ContentConfig::default());
        let post = loader.load_post("my-post").await.unwrap();
        assert_eq!(post.id, "my-post");
        assert_eq!(post.source, "my_post.md");
        assert!(loader.load_post("nope").await.is_none());
    }

    #[test]
    fn test_looks_like_markdown() {
        assert!(looks_like_markdown("---\ntitle: x\n---\n"));
        assert!(looks_like_markdown("intro\n\n## Heading"));
        assert!(!looks_like_markdown("<!doctype html>\n<html>#app</html>"));
        assert!(!looks_like_markdown("plain text only"));
    }

    #[tokio::test]
    async fn test_find_post_reuses_listing() {
        let a = dated("2025-01-10");
        let b = dated("2025-01-15");
        let source = Arc::new(MemorySource::new(&[
            ("a.md", Some(a.as_str())),
            ("b.md", Some(b.as_str())),
        ]));
        let loader = ContentLoader::new(source.clone(), ContentConfig::default());

        let posts = loader.load_posts().await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);

        let post = loader.find_post(&posts, "a").await.unwrap();
        assert_eq!(post.date, "2025-01-10");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }
}
