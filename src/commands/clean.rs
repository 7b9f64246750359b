//! Remove the durable cache

use std::fs;

use anyhow::Result;

use crate::Folio;

/// Delete the durable cache directory. In-memory caches belong to whatever
/// process holds them; this only clears what `index` wrote to disk.
pub fn run(folio: &Folio) -> Result<()> {
    if folio.cache_dir.exists() {
        fs::remove_dir_all(&folio.cache_dir)?;
        tracing::info!("removed {}", folio.cache_dir.display());
    }
    Ok(())
}
