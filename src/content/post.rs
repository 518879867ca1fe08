//! Post model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::derive::{self, FALLBACK_DATE};
use super::frontmatter::{parse_date_string, FrontMatter};
use super::slug;
use super::tags::detect_tags;
use crate::config::ContentConfig;

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Slug derived from the filename
    pub id: String,

    pub title: String,

    /// Short summary for listings
    pub excerpt: String,

    /// Publication date as written in the front-matter
    pub date: String,

    /// e.g. "5 min read"
    pub read_time: String,

    pub tags: Vec<String>,

    /// Markdown body without front-matter
    pub content: String,

    /// File the post was loaded from
    pub source: String,
}

impl Post {
    /// Build a post from a markdown file, deriving every field the
    /// front-matter leaves out.
    pub fn from_markdown(filename: &str, raw: &str, config: &ContentConfig) -> Self {
        let (fm, body) = FrontMatter::parse(raw);

        let title = fm
            .title
            .or_else(|| derive::first_heading(body))
            .or_else(|| slug::title_from_filename(filename))
            .unwrap_or_else(|| "Untitled".to_string());

        let excerpt = fm
            .excerpt
            .or_else(|| derive::first_paragraph(body, config.excerpt_length))
            .unwrap_or_else(|| title.clone());

        let date = fm.date.unwrap_or_else(|| FALLBACK_DATE.to_string());

        let read_time = fm
            .read_time
            .unwrap_or_else(|| derive::read_time(body, config.words_per_minute));

        let tags = detect_tags(&fm.tags, filename, raw, &config.default_tag);

        Self {
            id: slug::post_id(filename),
            title,
            excerpt,
            date,
            read_time,
            tags,
            content: body.to_string(),
            source: filename.to_string(),
        }
    }

    /// Timestamp used for ordering; unparseable dates sort as the fallback date
    pub fn sort_key(&self) -> NaiveDateTime {
        parse_date_string(&self.date)
            .or_else(|| parse_date_string(FALLBACK_DATE))
            .unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
