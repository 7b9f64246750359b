//! Content service - the facade pages and API routes depend on
//!
//! Every method degrades instead of failing: an empty listing, a `None`
//! lookup. A broken post can make itself disappear but never takes the
//! site down with it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::cache::ContentStore;
use crate::content::error::{ContentError, Result};
use crate::content::frontmatter;
use crate::content::markdown::MarkdownRenderer;
use crate::content::post::{Post, PostMeta};

pub struct ContentService {
    store: Arc<ContentStore>,
    renderer: MarkdownRenderer,
    /// Fully-loaded posts, keyed by slug. Bodies are read and rendered on
    /// first request, then held for the process.
    loaded: RwLock<HashMap<String, Arc<Post>>>,
}

impl ContentService {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self {
            store,
            renderer: MarkdownRenderer::new(),
            loaded: RwLock::new(HashMap::new()),
        }
    }

    /// Sorted metadata listing, no bodies. `limit` truncates post-sort:
    /// `None` is the full list and `Some(0)` is empty.
    pub fn list_metadata(&self, limit: Option<usize>) -> Vec<PostMeta> {
        let index = self.store.index();
        match limit {
            Some(n) => index.posts.iter().take(n).cloned().collect(),
            None => index.posts.clone(),
        }
    }

    /// Slugs in index order; used to enumerate static pages at build time.
    pub fn list_slugs(&self) -> Vec<String> {
        self.store.slugs()
    }

    /// Distinct tags in first-seen index order; feeds the tag filter UI.
    pub fn list_tags(&self) -> Vec<String> {
        self.store.tags()
    }

    /// Full post by slug: loaded-post cache, then index lookup, then an
    /// on-demand read of the underlying file. A file that vanished since
    /// indexing is "not found", not an error.
    pub fn get_by_slug(&self, slug: &str) -> Option<Arc<Post>> {
        if let Some(post) = self
            .loaded
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(slug)
            .cloned()
        {
            return Some(post);
        }

        let index = self.store.index();
        let meta = index.find(slug)?.clone();

        match self.load_body(&meta) {
            Ok(post) => {
                let post = Arc::new(post);
                self.loaded
                    .write()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(slug.to_string(), post.clone());
                Some(post)
            }
            Err(e) => {
                tracing::warn!("failed to load post {:?}: {}", slug, e);
                None
            }
        }
    }

    /// Drop every in-memory cache: loaded posts, the index, the directory
    /// memo. Development aid; durable files are untouched.
    pub fn clear(&self) {
        self.loaded
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.store.clear();
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    fn load_body(&self, meta: &PostMeta) -> Result<Post> {
        let dir = self.store.paths().resolve().ok_or_else(|| {
            ContentError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "content directory not found",
            ))
        })?;

        let (_, raw) = frontmatter::parse_file(&dir.join(&meta.file))?;
        let content = self.renderer.render(&raw);

        Ok(Post {
            meta: meta.clone(),
            raw,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::paths::ContentPaths;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, title: &str, date: &str) {
        fs::write(
            dir.join(name),
            format!("---\ntitle: {title}\ndate: {date}\n---\n## Section\n\nBody of {title}.\n"),
        )
        .unwrap();
    }

    fn service_for(tmp: &TempDir) -> ContentService {
        let store = ContentStore::new(
            ContentPaths::new(vec![tmp.path().to_path_buf()], "md"),
            tmp.path().join(".cache"),
        );
        ContentService::new(Arc::new(store))
    }

    fn populated(tmp: &TempDir) -> ContentService {
        write_post(tmp.path(), "a.md", "A", "2024-01-01");
        write_post(tmp.path(), "b.md", "B", "2024-03-01");
        write_post(tmp.path(), "c.md", "C", "2024-02-01");
        write_post(tmp.path(), "d.md", "D", "2023-12-01");
        write_post(tmp.path(), "e.md", "E", "2023-11-01");
        service_for(tmp)
    }

    #[test]
    fn test_list_metadata_full_and_limited() {
        let tmp = TempDir::new().unwrap();
        let service = populated(&tmp);

        let all = service.list_metadata(None);
        assert_eq!(all.len(), 5);

        let titles: Vec<&str> = all.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["B", "C", "A", "D", "E"]);

        // Truncation happens after sorting.
        let two = service.list_metadata(Some(2));
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].title, "B");
        assert_eq!(two[1].title, "C");

        // limit 0 means an empty list, not the full one.
        assert!(service.list_metadata(Some(0)).is_empty());

        // A limit past the end is just the full list.
        assert_eq!(service.list_metadata(Some(99)).len(), 5);
    }

    #[test]
    fn test_slugs_match_metadata_order() {
        let tmp = TempDir::new().unwrap();
        let service = populated(&tmp);

        let metas = service.list_metadata(None);
        let slugs = service.list_slugs();
        assert_eq!(slugs.len(), metas.len());
        for (meta, slug) in metas.iter().zip(&slugs) {
            assert_eq!(&meta.slug, slug);
        }
    }

    #[test]
    fn test_listing_is_idempotent_without_clear() {
        let tmp = TempDir::new().unwrap();
        let service = populated(&tmp);

        let first = service.list_metadata(None);
        let second = service.list_metadata(None);
        assert_eq!(first, second);
        assert_eq!(service.store().rebuilds(), 1);

        service.clear();
        service.list_metadata(None);
        assert_eq!(service.store().rebuilds(), 2);
    }

    #[test]
    fn test_get_by_slug_loads_and_renders_body() {
        let tmp = TempDir::new().unwrap();
        let service = populated(&tmp);

        let post = service.get_by_slug("b").unwrap();
        assert_eq!(post.meta.title, "B");
        assert!(post.raw.contains("Body of B."));
        assert!(post.content.contains("<p>Body of B.</p>"));
        assert!(post.content.contains("id=\"section\""));

        // Second request hits the loaded-post cache.
        let again = service.get_by_slug("b").unwrap();
        assert!(Arc::ptr_eq(&post, &again));
    }

    #[test]
    fn test_get_by_slug_unknown_is_none() {
        let tmp = TempDir::new().unwrap();
        let service = populated(&tmp);
        assert!(service.get_by_slug("nonexistent").is_none());
    }

    #[test]
    fn test_indexed_but_deleted_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let service = populated(&tmp);

        // Index first, then pull the file out from under it.
        assert_eq!(service.list_metadata(None).len(), 5);
        fs::remove_file(tmp.path().join("c.md")).unwrap();
        assert!(service.get_by_slug("c").is_none());
    }

    #[test]
    fn test_empty_world_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let service = service_for(&tmp);
        assert!(service.list_metadata(None).is_empty());
        assert!(service.list_slugs().is_empty());
        assert!(service.list_tags().is_empty());
    }

    #[test]
    fn test_clear_drops_loaded_posts() {
        let tmp = TempDir::new().unwrap();
        let service = populated(&tmp);

        let before = service.get_by_slug("a").unwrap();
        service.clear();
        let after = service.get_by_slug("a").unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
