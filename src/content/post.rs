//! Post metadata and full-post models

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Metadata for one content file, fully populated at parse time.
///
/// Date fields are opaque strings: they render as written and are parsed
/// into timestamps only when sorting. Unparseable dates never fail; the
/// record just sorts after the dated ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub published_at: String,
    pub read_time: String,
    pub author: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// File name inside the content directory; used for body re-reads,
    /// not user-visible.
    #[serde(rename = "_file")]
    pub file: String,
    /// Modification time captured at index-build time, informational only.
    #[serde(rename = "_lastModified")]
    pub last_modified: String,
}

impl PostMeta {
    /// Effective publish timestamp: `publishedAt`, falling back to `date`.
    pub fn effective_date(&self) -> Option<DateTime<Local>> {
        parse_date_string(&self.published_at).or_else(|| parse_date_string(&self.date))
    }
}

/// A full post: indexed metadata plus the body loaded on demand. Bodies are
/// never held in the index itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,
    /// Raw Markdown body.
    pub raw: String,
    /// Rendered HTML body.
    pub content: String,
}

/// Sort newest-first by effective publish date. Undated records go after all
/// dated ones; ties and undated runs keep their incoming order (stable).
pub fn sort_posts(posts: &mut Vec<PostMeta>) {
    let mut keyed: Vec<(Option<DateTime<Local>>, PostMeta)> =
        posts.drain(..).map(|p| (p.effective_date(), p)).collect();

    keyed.sort_by(|a, b| match (&a.0, &b.0) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    posts.extend(keyed.into_iter().map(|(_, p)| p));
}

/// Parse a date string in the formats content authors actually use.
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_from_naive(dt);
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return local_from_naive(d.and_hms_opt(0, 0, 0)?);
        }
    }

    None
}

fn local_from_naive(dt: NaiveDateTime) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&dt).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(slug: &str, published_at: &str) -> PostMeta {
        PostMeta {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            description: String::new(),
            date: String::new(),
            published_at: published_at.to_string(),
            read_time: String::new(),
            author: String::new(),
            tags: Vec::new(),
            image: None,
            file: format!("{slug}.md"),
            last_modified: String::new(),
        }
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date_string("2024-01-15").is_some());
        assert!(parse_date_string("2024/01/15").is_some());
        assert!(parse_date_string("2024-01-15 10:30:00").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00+07:00").is_some());
        assert!(parse_date_string("January 15, 2024").is_some());
    }

    #[test]
    fn test_parse_date_garbage_is_none() {
        assert!(parse_date_string("").is_none());
        assert!(parse_date_string("someday").is_none());
        assert!(parse_date_string("15th of March").is_none());
    }

    #[test]
    fn test_sort_newest_first() {
        // A, B, C dated 2024-01-01, 2024-03-01, 2024-02-01.
        let mut posts = vec![
            meta("a", "2024-01-01"),
            meta("b", "2024-03-01"),
            meta("c", "2024-02-01"),
        ];
        sort_posts(&mut posts);
        let order: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn test_undated_sort_last_in_stable_order() {
        let mut posts = vec![
            meta("x", "not a date"),
            meta("a", "2024-01-01"),
            meta("y", ""),
            meta("b", "2024-03-01"),
        ];
        sort_posts(&mut posts);
        let order: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, ["b", "a", "x", "y"]);
    }

    #[test]
    fn test_published_at_defaulted_equals_explicit() {
        // A record whose publishedAt was defaulted from date must sort
        // exactly like one carrying the same value explicitly.
        let mut defaulted = meta("p", "2024-02-10");
        defaulted.date = "2024-02-10".to_string();
        let mut explicit = meta("p", "2024-02-10");
        explicit.date = "2024-06-01".to_string();
        assert_eq!(defaulted.effective_date(), explicit.effective_date());
    }

    #[test]
    fn test_effective_date_falls_back_to_date() {
        let mut post = meta("p", "never");
        post.date = "2024-02-10".to_string();
        assert_eq!(
            post.effective_date(),
            parse_date_string("2024-02-10"),
        );
    }
}
