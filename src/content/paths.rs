//! Content directory resolution across deployment layouts
//!
//! The content directory is not in one fixed place: a local checkout, a
//! pre-built deployment and a serverless mount each lay the tree out
//! differently. The candidates are ordered configuration data probed at
//! runtime; the first hit is memoized for the rest of the process.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::config::SiteConfig;

/// Resolves and memoizes the content directory.
#[derive(Debug)]
pub struct ContentPaths {
    candidates: Vec<PathBuf>,
    extension: String,
    resolved: RwLock<Option<PathBuf>>,
}

impl ContentPaths {
    pub fn new(candidates: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            candidates,
            extension: extension.into(),
            resolved: RwLock::new(None),
        }
    }

    /// Candidate list from configuration: relative roots are joined to the
    /// base directory, absolute roots (serverless mounts) are used as-is.
    pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Self {
        let candidates = config
            .content_roots
            .iter()
            .map(|root| {
                let p = Path::new(root);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    base_dir.join(p)
                }
            })
            .collect();
        Self::new(candidates, config.content_ext.clone())
    }

    /// First candidate that exists and holds at least one content file.
    /// Inaccessible paths just move on to the next candidate; no match
    /// returns `None` so callers can degrade to an empty index.
    pub fn resolve(&self) -> Option<PathBuf> {
        if let Some(found) = self
            .resolved
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Some(found);
        }

        for candidate in &self.candidates {
            if self.has_content(candidate) {
                tracing::debug!("using content directory: {}", candidate.display());
                *self.resolved.write().unwrap_or_else(|e| e.into_inner()) =
                    Some(candidate.clone());
                return Some(candidate.clone());
            }
        }

        tracing::warn!(
            "no content directory found among {} candidates",
            self.candidates.len()
        );
        None
    }

    /// Forget the memoized directory. Paired with cache clearing.
    pub fn clear(&self) {
        *self.resolved.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Expected content file extension (without the dot).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn has_content(&self, dir: &Path) -> bool {
        let Ok(entries) = fs::read_dir(dir) else {
            return false;
        };
        entries.filter_map(|e| e.ok()).any(|e| {
            let path = e.path();
            path.is_file()
                && path.extension().and_then(|x| x.to_str()) == Some(self.extension.as_str())
        })
    }
}
