//! Content module - front-matter, models, path resolution and indexing

pub mod error;
pub mod frontmatter;
pub mod indexer;
pub mod markdown;
pub mod paths;
pub mod post;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use indexer::{ContentIndex, Indexer};
pub use markdown::MarkdownRenderer;
pub use paths::ContentPaths;
pub use post::{Post, PostMeta};
