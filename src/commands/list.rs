//! List site content

use anyhow::Result;

use crate::Folio;

/// List site content by type.
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let service = folio.service();

    match content_type {
        "post" | "posts" => {
            let posts = service.list_metadata(None);
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = if post.published_at.is_empty() {
                    "(undated)"
                } else {
                    post.published_at.as_str()
                };
                println!("  {} - {} [{}]", date, post.title, post.file);
            }
        }
        "tag" | "tags" => {
            let posts = service.list_metadata(None);
            let tags = service.list_tags();
            println!("Tags ({}):", tags.len());
            for tag in tags {
                let count = posts.iter().filter(|p| p.tags.contains(&tag)).count();
                println!("  {} ({})", tag, count);
            }
        }
        "slug" | "slugs" => {
            let slugs = service.list_slugs();
            println!("Slugs ({}):", slugs.len());
            for slug in slugs {
                println!("  {}", slug);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, slug",
                content_type
            );
        }
    }

    Ok(())
}
