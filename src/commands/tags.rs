//! List tags in use

use anyhow::Result;

use crate::content::query::collect_tags;
use crate::Site;

pub async fn run(site: &Site) -> Result<()> {
    let posts = site.content_loader()?.load_posts().await;
    let mut tags = collect_tags(&posts);
    // Most used first; equal counts keep first-seen order
    tags.sort_by(|a, b| b.count.cmp(&a.count));

    println!("Tags ({}):", tags.len());
    for entry in tags {
        match &entry.tag.description {
            Some(description) => println!("  {} ({}) - {}", entry.tag.name, entry.count, description),
            None => println!("  {} ({})", entry.tag.name, entry.count),
        }
    }

    Ok(())
}
