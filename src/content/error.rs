//! Error types for the content subsystem
//!
//! Every failure here is recoverable: the service boundary absorbs these
//! into empty listings or "not found" results instead of propagating them.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `ContentError`.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Failure modes of content loading and caching.
#[derive(Error, Debug)]
pub enum ContentError {
    /// File system I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Front-matter block present but malformed.
    #[error("front-matter error in {path}: {message}")]
    Frontmatter { path: PathBuf, message: String },

    /// JSON (de)serialization error from the durable cache files.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContentError {
    /// Create a front-matter error for a file.
    pub fn frontmatter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_error_names_the_file() {
        let err = ContentError::frontmatter("blogs/post.md", "unclosed block");
        assert!(err.to_string().contains("blogs/post.md"));
        assert!(err.to_string().contains("unclosed block"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ContentError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
