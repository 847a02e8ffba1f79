//! Blog content collaborator.
//!
//! Posts are authored as a JSON array of sections pasted into the admin
//! panel.  Storage sits behind [`ContentStore`]; [`MemoryContentStore`] is the
//! in-process implementation.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Heading,
    Subheading,
    Paragraph,
    Image,
    Code,
    Note,
    Link,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Section {
    pub fn new(kind: SectionKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            caption: None,
            language: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u32,
    pub slug: String,
    pub title: String,
    pub sections: Vec<Section>,
}

/// Draft of a post before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostKey {
    Id(u32),
    Slug(String),
}

impl PostKey {
    fn matches(&self, post: &Post) -> bool {
        match self {
            PostKey::Id(id) => post.id == *id,
            PostKey::Slug(slug) => post.slug == *slug,
        }
    }
}

impl fmt::Display for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostKey::Id(id) => write!(f, "id {id}"),
            PostKey::Slug(slug) => write!(f, "slug '{slug}'"),
        }
    }
}

/// Parse pasted section JSON.  Malformed input is logged and yields no
/// sections.
pub fn parse_sections(raw: &str) -> Vec<Section> {
    match serde_json::from_str(raw) {
        Ok(sections) => sections,
        Err(err) => {
            tracing::warn!(error = %err, "discarding malformed post sections");
            Vec::new()
        }
    }
}

pub trait ContentStore: Send + Sync {
    fn list(&self) -> Result<Vec<Post>, ContentError>;

    fn get_by_key(&self, key: &PostKey) -> Result<Post, ContentError>;

    fn insert(&self, post: NewPost) -> Result<Post, ContentError>;

    /// Replace the post matching `key`; its id never changes.
    fn update(&self, key: &PostKey, post: NewPost) -> Result<Post, ContentError>;

    fn delete(&self, key: &PostKey) -> Result<Post, ContentError>;
}

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    inner: Mutex<Posts>,
}

#[derive(Debug, Default)]
struct Posts {
    next_id: u32,
    posts: Vec<Post>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryContentStore {
    fn list(&self) -> Result<Vec<Post>, ContentError> {
        let inner = self.inner.lock().map_err(|_| ContentError::Poisoned)?;
        Ok(inner.posts.clone())
    }

    fn get_by_key(&self, key: &PostKey) -> Result<Post, ContentError> {
        let inner = self.inner.lock().map_err(|_| ContentError::Poisoned)?;
        inner
            .posts
            .iter()
            .find(|p| key.matches(p))
            .cloned()
            .ok_or_else(|| ContentError::NotFound(key.to_string()))
    }

    fn insert(&self, post: NewPost) -> Result<Post, ContentError> {
        let mut inner = self.inner.lock().map_err(|_| ContentError::Poisoned)?;
        if inner.posts.iter().any(|p| p.slug == post.slug) {
            return Err(ContentError::DuplicateSlug(post.slug));
        }
        inner.next_id += 1;
        let stored = Post {
            id: inner.next_id,
            slug: post.slug,
            title: post.title,
            sections: post.sections,
        };
        inner.posts.push(stored.clone());
        tracing::info!(id = stored.id, slug = %stored.slug, "post created");
        Ok(stored)
    }

    fn update(&self, key: &PostKey, post: NewPost) -> Result<Post, ContentError> {
        let mut inner = self.inner.lock().map_err(|_| ContentError::Poisoned)?;
        let index = inner
            .posts
            .iter()
            .position(|p| key.matches(p))
            .ok_or_else(|| ContentError::NotFound(key.to_string()))?;
        let id = inner.posts[index].id;
        if inner.posts.iter().any(|p| p.slug == post.slug && p.id != id) {
            return Err(ContentError::DuplicateSlug(post.slug));
        }
        let stored = Post {
            id,
            slug: post.slug,
            title: post.title,
            sections: post.sections,
        };
        inner.posts[index] = stored.clone();
        Ok(stored)
    }

    fn delete(&self, key: &PostKey) -> Result<Post, ContentError> {
        let mut inner = self.inner.lock().map_err(|_| ContentError::Poisoned)?;
        let index = inner
            .posts
            .iter()
            .position(|p| key.matches(p))
            .ok_or_else(|| ContentError::NotFound(key.to_string()))?;
        Ok(inner.posts.remove(index))
    }
}
