//! Content module - discovers markdown posts and derives their metadata

pub mod derive;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod query;
pub mod slug;
pub mod source;
pub mod tags;

pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterKey};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::Post;
pub use query::PostQuery;
pub use source::{ContentSource, FsSource, HttpSource};
