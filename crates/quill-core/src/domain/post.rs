use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a post. The only transition is `Draft -> Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Published
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Published => write!(f, "published"),
        }
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// Post entity - an author-owned rich-text document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    /// Liked-by set. Order is insertion order; membership is unique.
    pub likes: Vec<Uuid>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID, empty likes and timestamps.
    pub fn new(
        author_id: Uuid,
        title: String,
        content: String,
        tags: Vec<String>,
        cover_image: Option<String>,
        status: PostStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            cover_image,
            tags,
            likes: Vec::new(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Ownership guard: may `user_id` mutate this post?
    pub fn is_author(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_author_owns_the_post() {
        let author = Uuid::new_v4();
        let post = Post::new(
            author,
            "Hello".into(),
            "World content here".into(),
            vec![],
            None,
            PostStatus::Published,
        );

        assert!(post.is_author(author));
        assert!(!post.is_author(Uuid::new_v4()));
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!("draft".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert_eq!(PostStatus::Published.to_string(), "published");
        assert!("archived".parse::<PostStatus>().is_err());
    }
}
