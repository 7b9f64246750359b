//! Three-tier index cache
//!
//! Tier order on read: the process-lifetime memory tier, then the durable
//! JSON files written ahead of time by `folio-rs index`, then a runtime
//! build from the source files. The durable tier is trusted as-is (no
//! staleness check) and is never written from the serve path; a durable hit
//! is promoted into the memory tier. This lets the same retrieval code run
//! in a pre-built deployment and in a bare checkout without branching call
//! sites.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::content::error::Result;
use crate::content::indexer::{ContentIndex, Indexer};
use crate::content::paths::ContentPaths;
use crate::content::post::PostMeta;

const INDEX_FILE: &str = "index.json";
const SLUGS_FILE: &str = "slugs.json";
const TAGS_FILE: &str = "tags.json";

/// Owns the cached index. Constructed once per process and injected into
/// the service so tests can build a fresh store per case.
pub struct ContentStore {
    paths: ContentPaths,
    cache_dir: PathBuf,
    memory: RwLock<Option<Arc<ContentIndex>>>,
    rebuilds: AtomicUsize,
}

/// Cache diagnostics for logs and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub durable_cache: bool,
    pub total_posts: usize,
    pub total_slugs: usize,
    pub total_tags: usize,
    pub tier: &'static str,
}

impl ContentStore {
    pub fn new(paths: ContentPaths, cache_dir: PathBuf) -> Self {
        Self {
            paths,
            cache_dir,
            memory: RwLock::new(None),
            rebuilds: AtomicUsize::new(0),
        }
    }

    /// The cached index, building it if this is the first access.
    ///
    /// Two requests racing through a cold start may both build; each result
    /// is internally consistent and the later store replaces the earlier
    /// one wholesale. Accepted for read-only content.
    pub fn index(&self) -> Arc<ContentIndex> {
        if let Some(index) = self
            .memory
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return index;
        }

        let index = Arc::new(self.load_or_build());
        *self.memory.write().unwrap_or_else(|e| e.into_inner()) = Some(index.clone());
        index
    }

    pub fn slugs(&self) -> Vec<String> {
        self.index().slugs.clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.index().tags.clone()
    }

    /// Drop the memory tier and the directory memo. Durable files are
    /// untouched; the next access rebuilds or re-reads them.
    pub fn clear(&self) {
        *self.memory.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.paths.clear();
        tracing::debug!("content cache cleared");
    }

    /// Runtime index builds performed so far. Durable-tier hits do not
    /// count; listing twice without `clear` must not add one.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        let durable = self.cache_dir.join(INDEX_FILE).is_file();
        let index = self.index();
        CacheStats {
            durable_cache: durable,
            total_posts: index.posts.len(),
            total_slugs: index.slugs.len(),
            total_tags: index.tags.len(),
            tier: if durable { "build-time" } else { "runtime" },
        }
    }

    pub fn paths(&self) -> &ContentPaths {
        &self.paths
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Serialize all three projections of one index build. This is the
    /// build step's half of the durable-tier contract; the serve path only
    /// ever reads these files.
    pub fn write_durable(&self, index: &ContentIndex) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(
            self.cache_dir.join(INDEX_FILE),
            serde_json::to_string_pretty(&index.posts)?,
        )?;
        fs::write(
            self.cache_dir.join(SLUGS_FILE),
            serde_json::to_string_pretty(&index.slugs)?,
        )?;
        fs::write(
            self.cache_dir.join(TAGS_FILE),
            serde_json::to_string_pretty(&index.tags)?,
        )?;
        tracing::info!("wrote content cache to {}", self.cache_dir.display());
        Ok(())
    }

    fn load_or_build(&self) -> ContentIndex {
        match self.load_durable() {
            Ok(Some(index)) => {
                tracing::debug!("using durable content cache");
                return index;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("durable cache unreadable, rebuilding: {}", e),
        }

        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("generating content index at runtime");
        Indexer::new(&self.paths).build()
    }

    /// Read the durable tier. `Ok(None)` when absent, `Err` when the index
    /// file is corrupt; either way the caller falls through to a runtime
    /// build. A missing or corrupt companion file is re-derived from the
    /// posts rather than failing the whole tier.
    fn load_durable(&self) -> Result<Option<ContentIndex>> {
        let index_path = self.cache_dir.join(INDEX_FILE);
        if !index_path.is_file() {
            return Ok(None);
        }

        let posts: Vec<PostMeta> = serde_json::from_str(&fs::read_to_string(&index_path)?)?;
        let derived = ContentIndex::from_posts(posts);

        let slugs = read_string_list(&self.cache_dir.join(SLUGS_FILE))
            .unwrap_or_else(|| derived.slugs.clone());
        let tags = read_string_list(&self.cache_dir.join(TAGS_FILE))
            .unwrap_or_else(|| derived.tags.clone());

        Ok(Some(ContentIndex {
            posts: derived.posts,
            slugs,
            tags,
        }))
    }
}

fn read_string_list(path: &Path) -> Option<Vec<String>> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(list) => Some(list),
        Err(e) => {
            tracing::warn!("ignoring corrupt cache file {}: {}", path.display(), e);
            None
        }
    }
}
