//! In-memory repositories - used when no database is configured, and by the
//! test suite.
//!
//! Each store is a `HashMap` behind an async `RwLock`. Conflicting writes to
//! the same document serialize on the write lock, and the like toggle runs
//! entirely inside one write-lock critical section, which is what keeps the
//! liked-by set duplicate-free under concurrent toggles.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{self, Comment, Post, PostStatus, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, UserRepository,
};

/// In-memory user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.write().await;

        // Mirror the unique indexes the relational store enforces.
        for other in rows.values() {
            if other.id == user.id {
                continue;
            }
            if other.username == user.username {
                return Err(RepoError::Constraint("Username already taken".into()));
            }
            if other.email == user.email {
                return Err(RepoError::Constraint("Email already registered".into()));
            }
        }

        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|u| u.username == username).cloned())
    }
}

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    rows: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        // The toggle is the only writer of the liked-by set; a save from a
        // stale copy keeps whatever the toggle has written since.
        if let Some(existing) = rows.get(&post.id) {
            post.likes = existing.likes.clone();
        }
        rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.read().await;
        let mut posts: Vec<Post> = rows
            .values()
            .filter(|p| p.status == PostStatus::Published)
            .cloned()
            .collect();
        drop(rows);
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_published_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.read().await;
        let mut posts: Vec<Post> = rows
            .values()
            .filter(|p| p.status == PostStatus::Published && p.author_id == author_id)
            .cloned()
            .collect();
        drop(rows);
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut rows = self.rows.write().await;
        let Some(post) = rows.get_mut(&id) else {
            return Ok(None);
        };
        domain::like::toggle(&mut post.likes, user_id);
        Ok(Some(post.clone()))
    }
}

/// In-memory comment store.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    rows: RwLock<HashMap<Uuid, Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows.get(&comment.id) {
            comment.likes = existing.likes.clone();
        }
        rows.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = self.rows.read().await;
        let mut comments: Vec<Comment> = rows
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        drop(rows);
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Comment>, RepoError> {
        let mut rows = self.rows.write().await;
        let Some(comment) = rows.get_mut(&id) else {
            return Ok(None);
        };
        domain::like::toggle(&mut comment.likes, user_id);
        Ok(Some(comment.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn sample_post(author: Uuid) -> Post {
        Post::new(
            author,
            "Hello".into(),
            "World content here".into(),
            vec![],
            None,
            PostStatus::Published,
        )
    }

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let repo = InMemoryPostRepository::new();
        let post = sample_post(Uuid::new_v4());

        let saved = repo.save(post.clone()).await.unwrap();
        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();

        assert_eq!(found.title, "Hello");
    }

    #[tokio::test]
    async fn duplicate_username_hits_the_constraint() {
        let repo = InMemoryUserRepository::new();
        repo.save(User::new("alice".into(), "alice@x.com".into(), "h".into()))
            .await
            .unwrap();

        let err = repo
            .save(User::new("alice".into(), "other@x.com".into(), "h".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn listing_skips_drafts_and_sorts_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();

        let older = repo.save(sample_post(author)).await.unwrap();
        let mut draft = sample_post(author);
        draft.status = PostStatus::Draft;
        repo.save(draft).await.unwrap();
        let mut newer = sample_post(author);
        newer.created_at = older.created_at + chrono::TimeDelta::seconds(1);
        let newer = repo.save(newer).await.unwrap();

        let listed = repo.list_published().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn save_from_a_stale_copy_keeps_likes_written_by_the_toggle() {
        let repo = InMemoryPostRepository::new();
        let user = Uuid::new_v4();
        let post = repo.save(sample_post(Uuid::new_v4())).await.unwrap();
        repo.toggle_like(post.id, user).await.unwrap();

        // An editor still holding the pre-toggle copy.
        let mut stale = post.clone();
        stale.title = "Renamed".into();
        let saved = repo.save(stale).await.unwrap();

        assert_eq!(saved.title, "Renamed");
        assert_eq!(saved.likes, vec![user]);
    }

    #[tokio::test]
    async fn toggle_like_on_missing_post_is_none() {
        let repo = InMemoryPostRepository::new();
        let result = repo.toggle_like(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_never_duplicate_a_like() {
        let repo = Arc::new(InMemoryPostRepository::new());
        let user = Uuid::new_v4();
        let post = repo.save(sample_post(Uuid::new_v4())).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let repo = Arc::clone(&repo);
            let post_id = post.id;
            handles.push(tokio::spawn(async move {
                repo.toggle_like(post_id, user).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let final_post = repo.find_by_id(post.id).await.unwrap().unwrap();
        let occurrences = final_post.likes.iter().filter(|id| **id == user).count();
        assert!(occurrences <= 1, "found {occurrences} entries for one user");
        // 32 toggles is an even number: the set is back where it started.
        assert_eq!(occurrences, 0);
    }
}
