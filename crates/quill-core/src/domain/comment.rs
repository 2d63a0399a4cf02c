use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - author-owned, post-scoped, optionally threaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    /// Self-reference for threading. Listing stays flat; clients rebuild the tree.
    pub parent_id: Option<Uuid>,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, content: String, parent_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content,
            parent_id,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Ownership guard: may `user_id` mutate this comment?
    pub fn is_author(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
