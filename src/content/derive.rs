//! Metadata derived from the markdown body when front-matter omits it

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Date used for posts without one. Fixed so repeated loads sort the same way.
pub const FALLBACK_DATE: &str = "1970-01-01";

const ELLIPSIS: &str = "...";

/// Text of the first level-1 heading
pub fn first_heading(markdown: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_heading = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let title = collapse_whitespace(&text);
                if !title.is_empty() {
                    return Some(title);
                }
                in_heading = false;
                text.clear();
            }
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            _ => {}
        }
    }

    None
}

/// Plain text of the first paragraph, shortened to `max_chars`.
///
/// Headings, fenced/indented code and thematic breaks never produce
/// paragraphs, so they are skipped naturally.
pub fn first_paragraph(markdown: &str, max_chars: usize) -> Option<String> {
    let mut in_paragraph = false;
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Paragraph) => {
                in_paragraph = true;
                text.clear();
            }
            Event::End(TagEnd::Paragraph) => {
                let paragraph = collapse_whitespace(&text);
                if !paragraph.is_empty() {
                    return Some(truncate(&paragraph, max_chars));
                }
                in_paragraph = false;
            }
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    None
}

/// `"<N> min read"` at `words_per_minute`, rounded up, at least one minute
pub fn read_time(markdown: &str, words_per_minute: usize) -> String {
    let wpm = words_per_minute.max(1);
    let words = markdown.split_whitespace().count();
    let minutes = words.div_ceil(wpm).max(1);
    format!("{} min read", minutes)
}

/// Cut to `max_chars` characters and mark the cut with `...`
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_heading() {
        let md = "Intro line\n\n## Sub\n\n# Main `Title`\n\n# Second";
        assert_eq!(first_heading(md).as_deref(), Some("Main Title"));
        assert_eq!(first_heading("## only h2"), None);
    }

    #[test]
    fn test_first_paragraph_skips_code_and_rules() {
        let md = "# Title\n\n```bash\necho not this\n```\n\n---\n\n    indented code\n\nThe **real**\nfirst paragraph.\n\nSecond.";
        assert_eq!(
            first_paragraph(md, 150).as_deref(),
            Some("The real first paragraph.")
        );
    }

    #[test]
    fn test_excerpt_truncation() {
        let long = "word ".repeat(60);
        let excerpt = first_paragraph(&long, 150).unwrap();
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= 153);

        assert_eq!(truncate("short", 150), "short");
    }

    #[test]
    fn test_read_time() {
        assert_eq!(read_time("", 200), "1 min read");
        assert_eq!(read_time(&"w ".repeat(200), 200), "1 min read");
        assert_eq!(read_time(&"w ".repeat(201), 200), "2 min read");
        assert_eq!(read_time(&"w ".repeat(1000), 200), "5 min read");
    }
}
