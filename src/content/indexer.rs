//! Index building: enumerate, parse, sort, derive

use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::error::Result;
use super::frontmatter;
use super::paths::ContentPaths;
use super::post::{sort_posts, PostMeta};

/// The sorted index plus its derived projections. Built once and treated as
/// immutable; the projections are computed from the final sorted order so
/// they cannot drift from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentIndex {
    pub posts: Vec<PostMeta>,
    pub slugs: Vec<String>,
    pub tags: Vec<String>,
}

impl ContentIndex {
    /// Derive the slug and tag projections from an already-sorted sequence.
    /// Slugs follow index order; tags are deduplicated in first-seen order.
    pub fn from_posts(posts: Vec<PostMeta>) -> Self {
        let slugs = posts.iter().map(|p| p.slug.clone()).collect();
        let tags: IndexSet<String> = posts
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect();
        Self {
            posts,
            slugs,
            tags: tags.into_iter().collect(),
        }
    }

    pub fn find(&self, slug: &str) -> Option<&PostMeta> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Builds a [`ContentIndex`] from the resolved content directory.
pub struct Indexer<'a> {
    paths: &'a ContentPaths,
}

impl<'a> Indexer<'a> {
    pub fn new(paths: &'a ContentPaths) -> Self {
        Self { paths }
    }

    /// Build a fresh index. Infallible by design: a missing directory is an
    /// empty index, and a file that fails to parse is skipped with a
    /// warning while the batch continues.
    pub fn build(&self) -> ContentIndex {
        let Some(dir) = self.paths.resolve() else {
            return ContentIndex::default();
        };
        self.build_in(&dir)
    }

    fn build_in(&self, dir: &Path) -> ContentIndex {
        // Keyed by slug: a later file claiming an already-seen slug replaces
        // the earlier record but keeps its position. Enumeration is sorted
        // by file name, so the winner is deterministic.
        let mut by_slug: IndexMap<String, PostMeta> = IndexMap::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !self.matches_extension(path) {
                continue;
            }
            match read_meta(path) {
                Ok(meta) => {
                    if let Some(prev) = by_slug.insert(meta.slug.clone(), meta) {
                        tracing::warn!(
                            "duplicate slug {:?}: {} shadowed by a later file",
                            prev.slug,
                            prev.file
                        );
                    }
                }
                Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
            }
        }

        let mut posts: Vec<PostMeta> = by_slug.into_values().collect();
        sort_posts(&mut posts);

        let index = ContentIndex::from_posts(posts);
        tracing::info!("indexed {} posts, {} tags", index.len(), index.tags.len());
        index
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.paths.extension())
    }
}

/// Parse one file into normalized metadata; the body is discarded here and
/// re-read on demand when a full post is requested.
fn read_meta(path: &Path) -> Result<PostMeta> {
    let (fm, _body) = frontmatter::parse_file(path)?;

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string());

    Ok(fm.into_meta(&stem, &file_name, file_mtime(path)))
}

fn file_mtime(path: &Path) -> String {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(|t| chrono::DateTime::<chrono::Local>::from(t).to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn indexer_for(dir: PathBuf) -> ContentPaths {
        ContentPaths::new(vec![dir], "md")
    }

    #[test]
    fn test_missing_directory_is_empty_index() {
        let paths = indexer_for(PathBuf::from("/no/such/directory"));
        let index = Indexer::new(&paths).build();
        assert!(index.is_empty());
        assert!(index.slugs.is_empty());
        assert!(index.tags.is_empty());
    }

    #[test]
    fn test_build_sorts_and_derives() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "a.md",
            "---\ntitle: A\ndate: 2024-01-01\ntags: [rust]\n---\nbody a\n",
        );
        write_post(
            tmp.path(),
            "b.md",
            "---\ntitle: B\ndate: 2024-03-01\ntags: [rust, web]\n---\nbody b\n",
        );
        write_post(
            tmp.path(),
            "c.md",
            "---\ntitle: C\ndate: 2024-02-01\ntags: [web, cache]\n---\nbody c\n",
        );

        let paths = indexer_for(tmp.path().to_path_buf());
        let index = Indexer::new(&paths).build();

        let titles: Vec<&str> = index.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["B", "C", "A"]);

        // Slugs mirror the sorted index order exactly.
        assert_eq!(index.slugs, ["b", "c", "a"]);

        // Tags are distinct, first-seen order over the sorted index.
        assert_eq!(index.tags, ["rust", "web", "cache"]);
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "good.md",
            "---\ntitle: Good\ndate: 2024-01-01\n---\nok\n",
        );
        write_post(tmp.path(), "bad.md", "---\ntitle: [unterminated\n---\nnope\n");
        write_post(tmp.path(), "unclosed.md", "---\ntitle: Never closed\n");

        let paths = indexer_for(tmp.path().to_path_buf());
        let index = Indexer::new(&paths).build();

        assert_eq!(index.len(), 1);
        assert_eq!(index.posts[0].title, "Good");
    }

    #[test]
    fn test_non_content_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "post.md", "---\ntitle: P\n---\nok\n");
        write_post(tmp.path(), "README.txt", "not content");

        let paths = indexer_for(tmp.path().to_path_buf());
        let index = Indexer::new(&paths).build();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_slug_collision_last_file_wins() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "first.md",
            "---\ntitle: First\nslug: shared\ndate: 2024-01-01\n---\none\n",
        );
        write_post(
            tmp.path(),
            "second.md",
            "---\ntitle: Second\nslug: shared\ndate: 2024-01-02\n---\ntwo\n",
        );

        let paths = indexer_for(tmp.path().to_path_buf());
        let index = Indexer::new(&paths).build();

        assert_eq!(index.len(), 1);
        assert_eq!(index.posts[0].title, "Second");
        assert_eq!(index.posts[0].file, "second.md");
    }

    #[test]
    fn test_file_without_frontmatter_still_indexes() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "bare.md", "Just text, no metadata.\n");

        let paths = indexer_for(tmp.path().to_path_buf());
        let index = Indexer::new(&paths).build();

        assert_eq!(index.len(), 1);
        assert_eq!(index.posts[0].slug, "bare");
        assert_eq!(index.posts[0].title, "");
    }
}
