use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with identity-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their normalized email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All published posts, newest-created-first.
    async fn list_published(&self) -> Result<Vec<Post>, RepoError>;

    /// One author's published posts, newest-created-first.
    async fn list_published_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Atomically flip `user_id`'s membership in the post's liked-by set.
    ///
    /// The whole toggle must be one store-level critical section so that
    /// concurrent retries from the same identity cannot duplicate an entry.
    /// Returns `None` when the post does not exist.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// All comments on a post, newest-created-first, flat.
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Same contract as [`PostRepository::toggle_like`].
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Comment>, RepoError>;
}
