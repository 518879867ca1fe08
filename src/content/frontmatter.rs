//! Front-matter parsing
//!
//! Posts may start with a block delimited by `---` lines holding flat
//! `key: value` pairs. Only the keys in [`FrontMatterKey`] are recognized;
//! anything else is ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

const DELIMITER: &str = "---";

/// Keys understood in a post's front-matter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontMatterKey {
    Title,
    Excerpt,
    Date,
    ReadTime,
    Tags,
}

impl FrontMatterKey {
    pub const ALL: [FrontMatterKey; 5] = [
        FrontMatterKey::Title,
        FrontMatterKey::Excerpt,
        FrontMatterKey::Date,
        FrontMatterKey::ReadTime,
        FrontMatterKey::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrontMatterKey::Title => "title",
            FrontMatterKey::Excerpt => "excerpt",
            FrontMatterKey::Date => "date",
            FrontMatterKey::ReadTime => "readTime",
            FrontMatterKey::Tags => "tags",
        }
    }
}

impl FromStr for FrontMatterKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(FrontMatterKey::Title),
            "excerpt" => Ok(FrontMatterKey::Excerpt),
            "date" => Ok(FrontMatterKey::Date),
            "readTime" | "read_time" => Ok(FrontMatterKey::ReadTime),
            "tags" => Ok(FrontMatterKey::Tags),
            other => Err(format!("unknown front-matter key: {}", other)),
        }
    }
}

impl fmt::Display for FrontMatterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    pub read_time: Option<String>,
    pub tags: Vec<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some((block, body)) = split_block(content) else {
            return (FrontMatter::default(), content);
        };

        // A `---` pair around prose is a pair of thematic breaks, not metadata
        if !block.trim().is_empty() && !block.lines().any(is_key_value_line) {
            return (FrontMatter::default(), content);
        }

        let mut fm = FrontMatter::default();
        for line in block.lines() {
            let Some(colon) = line.find(':').filter(|&i| i > 0) else {
                continue;
            };
            let key = line[..colon].trim();
            let value = line[colon + 1..].trim();
            match key.parse::<FrontMatterKey>() {
                Ok(key) => fm.set(key, value),
                Err(e) => tracing::trace!("{}", e),
            }
        }

        (fm, body.trim_start_matches(['\n', '\r']))
    }

    /// Assign a raw (possibly quoted) value to a recognized key.
    /// Empty values leave the field unset.
    pub fn set(&mut self, key: FrontMatterKey, raw: &str) {
        let value = unquote(raw.trim()).trim();
        let value = (!value.is_empty()).then(|| value.to_string());
        match key {
            FrontMatterKey::Title => self.title = value,
            FrontMatterKey::Excerpt => self.excerpt = value,
            FrontMatterKey::Date => self.date = value,
            FrontMatterKey::ReadTime => self.read_time = value,
            FrontMatterKey::Tags => self.tags = parse_tag_list(raw),
        }
    }

    /// The string value of a scalar key; tags are joined with `, `
    pub fn get(&self, key: FrontMatterKey) -> Option<String> {
        match key {
            FrontMatterKey::Title => self.title.clone(),
            FrontMatterKey::Excerpt => self.excerpt.clone(),
            FrontMatterKey::Date => self.date.clone(),
            FrontMatterKey::ReadTime => self.read_time.clone(),
            FrontMatterKey::Tags => (!self.tags.is_empty()).then(|| self.tags.join(", ")),
        }
    }

    /// Parse the date string into a sortable timestamp
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }

    /// Serialize the recognized fields back into a delimited block.
    ///
    /// Values are written double-quoted, which `parse` strips again. Values
    /// must be single-line and tags must not contain commas.
    pub fn to_block(&self) -> String {
        let mut out = String::from(DELIMITER);
        out.push('\n');

        for key in FrontMatterKey::ALL {
            if key == FrontMatterKey::Tags {
                if !self.tags.is_empty() {
                    let items: Vec<String> =
                        self.tags.iter().map(|t| format!("\"{}\"", t)).collect();
                    out.push_str(&format!("{}: [{}]\n", key, items.join(", ")));
                }
            } else if let Some(value) = self.get(key) {
                out.push_str(&format!("{}: \"{}\"\n", key, value));
            }
        }

        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

/// Locate the block between the opening and closing delimiter lines
fn split_block(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER || !first.ends_with('\n') {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some((&content[start..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    // No closing ---, treat as no front-matter
    None
}

/// `key:value` with a plain identifier key, not a URL scheme
fn is_key_value_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let Some(colon) = trimmed.find(':') else {
        return false;
    };
    let key = &trimmed[..colon];
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp")
}

/// Strip one pair of matching single or double quotes
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// `[a, "b", 'c']` -> `["a", "b", "c"]`; a bare value is a single tag
fn parse_tag_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let items: Vec<&str> = match raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        Some(inner) => inner.split(',').collect(),
        None => vec![unquote(raw)],
    };

    items
        .into_iter()
        .map(|item| strip_tag_quotes(item.trim()).to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Drop one leading and one trailing quote character independently
fn strip_tag_quotes(item: &str) -> &str {
    let item = item
        .strip_prefix('"')
        .or_else(|| item.strip_prefix('\''))
        .unwrap_or(item);
    item.strip_suffix('"')
        .or_else(|| item.strip_suffix('\''))
        .unwrap_or(item)
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, e.g. 2025-01-15T08:00:00.000Z
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}
