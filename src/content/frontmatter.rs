//! Front-matter parsing and normalization

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::{ContentError, Result};
use super::post::PostMeta;

/// Accept both `tags: rust` and `tags: [rust, web]`.
fn string_or_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

/// Raw front-matter fields as they appear in a content file. All optional;
/// [`FrontMatter::into_meta`] applies the defaults exactly once so nothing
/// downstream deals with absent fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(rename = "readTime")]
    pub read_time: Option<String>,
    pub author: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub image: Option<String>,
    /// Explicit slug override; the filename stem is used otherwise.
    pub slug: Option<String>,

    /// Additional custom fields, kept but not indexed.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split `content` into front-matter and body.
    ///
    /// A file without a leading `---` block parses to defaults with the full
    /// text as body. A block that is present but broken (invalid YAML or a
    /// missing closing delimiter) is an error; the caller skips that file.
    pub fn parse<'a>(path: &Path, content: &'a str) -> Result<(Self, &'a str)> {
        let Some(rest) = content.trim_start().strip_prefix("---") else {
            return Ok((Self::default(), content));
        };
        if !rest.starts_with('\n') && !rest.starts_with("\r\n") {
            // A thematic break or similar, not a front-matter opener.
            return Ok((Self::default(), content));
        }

        // Keep the leading newline so an empty block ("---\n---") still
        // matches the closing delimiter search.
        let Some(end) = rest.find("\n---") else {
            return Err(ContentError::frontmatter(
                path,
                "unclosed front-matter block",
            ));
        };

        let yaml = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\r', '\n']);

        if yaml.trim().is_empty() {
            return Ok((Self::default(), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)
            .map_err(|e| ContentError::frontmatter(path, e.to_string()))?;
        Ok((fm, body))
    }

    /// Normalize into a fully-populated record. `stem` is the filename
    /// without extension (the slug fallback), `file_name` the name inside
    /// the content directory.
    pub fn into_meta(self, stem: &str, file_name: &str, last_modified: String) -> PostMeta {
        let date = self.date.unwrap_or_default();
        let published_at = self
            .published_at
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| date.clone());

        PostMeta {
            slug: self
                .slug
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| stem.to_string()),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            date,
            published_at,
            read_time: self.read_time.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            tags: self.tags,
            image: self.image,
            file: file_name.to_string(),
            last_modified,
        }
    }
}

/// Read a content file and split it into front-matter and body.
pub fn parse_file(path: &Path) -> Result<(FrontMatter, String)> {
    let text = fs::read_to_string(path)?;
    let (fm, body) = FrontMatter::parse(path, &text)?;
    Ok((fm, body.to_string()))
}
