//! Filtering and grouping over loaded posts

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::tags::TagInfo;
use super::Post;

/// Listing filter: free-text search over title/excerpt plus an exact tag
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl PostQuery {
    pub fn matches(&self, post: &Post) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                post.title.to_lowercase().contains(&term)
                    || post.excerpt.to_lowercase().contains(&term)
            }
        };

        let tag_ok = match self.tag.as_deref() {
            None | Some("") => true,
            Some(tag) => post.has_tag(tag),
        };

        search_ok && tag_ok
    }

    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|p| self.matches(p)).collect()
    }
}

/// A tag with the number of posts carrying it
#[derive(Debug, Clone, Serialize)]
pub struct TagCount {
    #[serde(flatten)]
    pub tag: TagInfo,
    pub count: usize,
}

/// Every tag used by `posts`, in first-seen order
pub fn collect_tags(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(name, count)| TagCount {
            tag: TagInfo::new(name),
            count,
        })
        .collect()
}

/// Up to `limit` other posts, in listing order
pub fn related_posts<'a>(posts: &'a [Post], id: &str, limit: usize) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.id != id).take(limit).collect()
}
