//! Show a single post

use anyhow::Result;

use crate::content::query::related_posts;
use crate::content::MarkdownRenderer;
use crate::Site;

const RELATED_LIMIT: usize = 2;

/// Print one post; `html` renders the body instead of echoing the markdown
pub async fn run(site: &Site, id: &str, html: bool) -> Result<()> {
    let loader = site.content_loader()?;
    let posts = loader.load_posts().await;
    let Some(post) = loader.find_post(&posts, id).await else {
        anyhow::bail!("Post not found: {}", id);
    };

    println!("{}", post.title);
    println!("{} · {} · {}", post.date, post.read_time, post.tags.join(", "));
    println!();

    if html {
        println!("{}", MarkdownRenderer::new().render(&post.content)?);
    } else {
        println!("{}", post.content);
    }

    let related = related_posts(&posts, &post.id, RELATED_LIMIT);
    if !related.is_empty() {
        println!();
        println!("Related:");
        for other in related {
            println!("  {} [{}]", other.title, other.id);
        }
    }

    Ok(())
}
