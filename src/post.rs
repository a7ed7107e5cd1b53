//! The post entity and the request shapes that create, patch and order it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A blog post. Serialises as `{"id": 1, "title": "...", "content": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
}

impl Post {
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id, title: title.into(), content: content.into() }
    }

    /// Case-insensitive substring match on title or content. `needle` must
    /// already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }

    fn field(&self, field: SortField) -> &str {
        match field {
            SortField::Title => &self.title,
            SortField::Content => &self.content,
        }
    }
}

/// Optional title/content pair carried by create and update bodies.
///
/// Only string values count: a field that is absent, `null`, or any other
/// JSON type is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPayload {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);
        Self { title: text("title"), content: text("content") }
    }
}

/// A post field the collection can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
}

impl SortField {
    /// Accepts `title` or `content`, ignoring case and surrounding space.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "title" => Some(Self::Title),
            "content" => Some(Self::Content),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` (any case) is descending; everything else is ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// How a read of the collection should be ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    /// `None` when `sort` is absent or names no known field: the caller
    /// falls back to stored order.
    pub fn from_query(sort: Option<&str>, direction: Option<&str>) -> Option<Self> {
        let field = SortField::parse(sort?)?;
        let direction = direction.map(SortDirection::parse).unwrap_or_default();
        Some(Self { field, direction })
    }

    /// Stable sort on the lower-cased field. Descending reverses the
    /// comparison, so ties keep their stored order either way.
    pub fn apply(self, posts: &mut [Post]) {
        let key = |post: &Post| post.field(self.field).to_lowercase();
        posts.sort_by_cached_key(|post| SortKey(key(post), self.direction));
    }
}

/// Lower-cased sort key that compares according to a direction.
#[derive(PartialEq, Eq)]
struct SortKey(String, SortDirection);

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.1 {
            SortDirection::Asc => self.0.cmp(&other.0),
            SortDirection::Desc => other.0.cmp(&self.0),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn titled(titles: &[&str]) -> Vec<Post> {
        titles.iter().enumerate()
            .map(|(i, t)| Post::new(i as u64 + 1, *t, format!("body {i}")))
            .collect()
    }

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn payload_keeps_only_string_fields() {
        let body = json!({"title": "Hello", "content": null, "extra": 1});
        let payload = PostPayload::from_object(body.as_object().unwrap());
        assert_eq!(payload.title.as_deref(), Some("Hello"));
        assert_eq!(payload.content, None);

        let body = json!({"title": 42, "content": ""});
        let payload = PostPayload::from_object(body.as_object().unwrap());
        assert_eq!(payload.title, None);
        assert_eq!(payload.content.as_deref(), Some(""));
    }

    #[test]
    fn sort_order_parsing() {
        assert_eq!(
            SortOrder::from_query(Some(" Title "), None),
            Some(SortOrder { field: SortField::Title, direction: SortDirection::Asc })
        );
        assert_eq!(
            SortOrder::from_query(Some("content"), Some("DESC")),
            Some(SortOrder { field: SortField::Content, direction: SortDirection::Desc })
        );
        assert_eq!(SortOrder::from_query(Some("id"), Some("desc")), None);
        assert_eq!(SortOrder::from_query(None, Some("desc")), None);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Asc);
    }

    #[test]
    fn sorts_case_insensitively_both_ways() {
        let mut posts = titled(&["second post", "First post", "third"]);
        SortOrder { field: SortField::Title, direction: SortDirection::Asc }.apply(&mut posts);
        assert_eq!(titles(&posts), ["First post", "second post", "third"]);

        SortOrder { field: SortField::Title, direction: SortDirection::Desc }.apply(&mut posts);
        assert_eq!(titles(&posts), ["third", "second post", "First post"]);
    }

    #[test]
    fn ties_keep_stored_order_in_both_directions() {
        let base = titled(&["b", "A", "a", "B"]);

        let mut asc = base.clone();
        SortOrder { field: SortField::Title, direction: SortDirection::Asc }.apply(&mut asc);
        assert_eq!(asc.iter().map(|p| p.id).collect::<Vec<_>>(), [2, 3, 1, 4]);

        let mut desc = base;
        SortOrder { field: SortField::Title, direction: SortDirection::Desc }.apply(&mut desc);
        assert_eq!(desc.iter().map(|p| p.id).collect::<Vec<_>>(), [1, 4, 2, 3]);
    }

    #[test]
    fn matches_either_field() {
        let post = Post::new(1, "Rust Tips", "Borrowing explained");
        assert!(post.matches("rust"));
        assert!(post.matches("borrow"));
        assert!(post.matches(""));
        assert!(!post.matches("python"));
    }
}
