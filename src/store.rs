//! In-memory post store.

use parking_lot::RwLock;
use tracing::debug;

use crate::post::{Post, PostPayload, SortOrder};

/// Thread-safe, ordered collection of posts.
///
/// Reads take a shared lock and copy out; every read-modify-write sequence
/// (id allocation + append, lookup + remove, lookup + patch) runs under one
/// exclusive lock.
#[derive(Debug, Default)]
pub struct PostStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    posts: Vec<Post>,
    /// Highest id ever handed out, so a deleted id is never reissued.
    high_water: u64,
}

impl PostStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `posts` in the given order.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let high_water = posts.iter().map(|p| p.id).max().unwrap_or(0);
        Self { inner: RwLock::new(Inner { posts, high_water }) }
    }

    /// The two posts every process starts with.
    pub fn seeded() -> Self {
        Self::with_posts(vec![
            Post::new(1, "First post", "This is the first post."),
            Post::new(2, "Second post", "This is the second post."),
        ])
    }

    /// Snapshot of the collection, in stored order or ordered by `sort`.
    /// The stored order itself is never changed.
    pub fn list(&self, sort: Option<SortOrder>) -> Vec<Post> {
        let mut posts = self.inner.read().posts.clone();
        if let Some(order) = sort {
            order.apply(&mut posts);
        }
        posts
    }

    /// Appends a post under a fresh id and returns the whole collection.
    pub fn create(&self, title: String, content: String) -> Vec<Post> {
        let mut inner = self.inner.write();
        let max_present = inner.posts.iter().map(|p| p.id).max().unwrap_or(0);
        let id = inner.high_water.max(max_present) + 1;
        inner.high_water = id;
        inner.posts.push(Post { id, title, content });
        debug!(post_id = id, total = inner.posts.len(), "post created");
        inner.posts.clone()
    }

    /// Removes the post with `id`. Returns it, or `None` if no post matched.
    pub fn delete(&self, id: u64) -> Option<Post> {
        let mut inner = self.inner.write();
        let index = inner.posts.iter().position(|p| p.id == id)?;
        let removed = inner.posts.remove(index);
        debug!(post_id = id, total = inner.posts.len(), "post deleted");
        Some(removed)
    }

    /// Overwrites whichever fields `patch` carries and returns the result.
    /// Empty strings are accepted as-is.
    pub fn update(&self, id: u64, patch: PostPayload) -> Option<Post> {
        let mut inner = self.inner.write();
        let post = inner.posts.iter_mut().find(|p| p.id == id)?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        debug!(post_id = id, "post updated");
        Some(post.clone())
    }

    /// Posts whose title or content contains `query`, ignoring case and
    /// surrounding whitespace, in stored order. An empty query matches all.
    pub fn search(&self, query: &str) -> Vec<Post> {
        let needle = query.trim().to_lowercase();
        self.inner.read().posts.iter()
            .filter(|p| p.matches(&needle))
            .cloned()
            .collect()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.inner.read().posts.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
