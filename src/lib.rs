//! folio-rs: Markdown content backend for a portfolio blog
//!
//! Discovers Markdown posts with YAML front-matter across deployment-
//! dependent content locations, builds a sorted index with slug and tag
//! projections, and serves metadata and rendered posts through a cached,
//! fallback-first content store.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod server;
pub mod service;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use cache::ContentStore;
use content::paths::ContentPaths;
use service::ContentService;

/// The application: configuration plus derived directories.
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Durable cache directory
    pub cache_dir: PathBuf,
}

impl Folio {
    /// Create an instance rooted at `base_dir`, reading `folio.yml` when
    /// present and falling back to defaults otherwise.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("folio.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let cache_dir = base_dir.join(&config.cache_dir);

        Ok(Self {
            config,
            base_dir,
            cache_dir,
        })
    }

    /// A fresh content store wired from this configuration.
    pub fn store(&self) -> ContentStore {
        let paths = ContentPaths::from_config(&self.config, &self.base_dir);
        ContentStore::new(paths, self.cache_dir.clone())
    }

    /// The content service facade over a fresh store.
    pub fn service(&self) -> Arc<ContentService> {
        Arc::new(ContentService::new(Arc::new(self.store())))
    }
}
