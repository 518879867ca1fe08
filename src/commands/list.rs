//! List posts

use anyhow::Result;

use crate::content::PostQuery;
use crate::Site;

/// Print the posts matching `query`, newest first
pub async fn run(site: &Site, query: &PostQuery) -> Result<()> {
    let loader = site.content_loader()?;
    let posts = loader.load_posts().await;
    let posts = query.apply(&posts);

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {} [{}] ({})",
            post.date,
            post.title,
            post.id,
            post.tags.join(", ")
        );
    }

    Ok(())
}
