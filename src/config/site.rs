//! Site configuration (folio.yml)

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    /// Content directory candidates, probed in order. Relative entries are
    /// joined to the base directory; absolute entries cover serverless
    /// mounts and other fixed deployment layouts.
    pub content_roots: Vec<String>,
    /// Content file extension (without the dot).
    pub content_ext: String,

    /// Where `folio-rs index` writes the durable cache.
    pub cache_dir: String,

    /// Additional fields kept as-is.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: String::new(),
            url: "http://localhost".to_string(),
            content_roots: vec![
                "content/blogs".to_string(),
                "public/blog".to_string(),
                "src/data/blogs".to_string(),
                "/var/task/content/blogs".to_string(),
                "/var/task/public/blog".to_string(),
            ],
            content_ext: "md".to_string(),
            cache_dir: ".folio-cache".to_string(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.content_ext, "md");
        assert_eq!(config.cache_dir, ".folio-cache");
        assert_eq!(config.content_roots[0], "content/blogs");
    }

    #[test]
    fn test_load_partial_yaml_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("folio.yml");
        fs::write(
            &path,
            "title: My Site\ncontent_roots:\n  - posts\ntheme_color: blue\n",
        )
        .unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "My Site");
        assert_eq!(config.content_roots, vec!["posts"]);
        assert_eq!(config.content_ext, "md");
        // Unknown keys land in extra instead of failing the load.
        assert!(config.extra.contains_key("theme_color"));
    }
}
