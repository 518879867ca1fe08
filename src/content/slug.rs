//! Post identifiers derived from filenames

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Check if a file name has a markdown extension
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MARKDOWN_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// File name without directories or markdown extension
pub fn file_stem(filename: &str) -> &str {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    MARKDOWN_EXTENSIONS
        .iter()
        .find_map(|ext| {
            name.strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))
        })
        .unwrap_or(name)
}

/// Normalize a filename into a post id.
///
/// `Getting_Started with Docker.md` -> `getting-started-with-docker`
pub fn post_id(filename: &str) -> String {
    let lower = file_stem(filename).to_lowercase();
    let id = NON_ALNUM.replace_all(&lower, "-");
    let id = id.trim_matches('-');
    if id.is_empty() {
        "untitled".to_string()
    } else {
        id.to_string()
    }
}

/// Human readable title from a filename: `my_first-post.md` -> `My First Post`
pub fn title_from_filename(filename: &str) -> Option<String> {
    let words: Vec<String> = file_stem(filename)
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// Filenames an id may have been derived from, most likely first.
///
/// identity, `_` for `-`, space for `-`, Title-Cased with hyphens,
/// Title Cased with spaces.
pub fn filename_candidates(id: &str) -> Vec<String> {
    let words: Vec<&str> = id.split('-').filter(|w| !w.is_empty()).collect();
    let title_words: Vec<String> = words.iter().map(|w| capitalize(w)).collect();

    let stems = [
        id.to_string(),
        words.join("_"),
        words.join(" "),
        title_words.join("-"),
        title_words.join(" "),
    ];

    let mut candidates: Vec<String> = Vec::with_capacity(stems.len());
    for stem in stems {
        if stem.is_empty() {
            continue;
        }
        let filename = format!("{}.md", stem);
        if !candidates.contains(&filename) {
            candidates.push(filename);
        }
    }
    candidates
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
