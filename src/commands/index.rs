//! Build the durable content cache

use anyhow::Result;

use crate::content::indexer::Indexer;
use crate::Folio;

/// Build the index from the source files and write the durable cache. Always
/// a fresh build; the point is to capture the current state of the content
/// directory, not to reuse a previous run.
pub fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let store = folio.store();
    let index = Indexer::new(store.paths()).build();
    store.write_durable(&index)?;

    println!(
        "Indexed {} posts ({} slugs, {} tags) in {:.2}s",
        index.posts.len(),
        index.slugs.len(),
        index.tags.len(),
        start.elapsed().as_secs_f64()
    );
    println!("Cache written to {}", store.cache_dir().display());

    Ok(())
}
