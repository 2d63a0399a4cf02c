//! Content service - ownership-aware CRUD and like toggles for posts and comments.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorRef, Comment, Post, PostStatus};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

const MIN_TITLE_LEN: usize = 3;
const MIN_CONTENT_LEN: usize = 10;

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
}

/// Whitelisted patch for updating a post. Absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `Some("")` clears the cover image.
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
}

/// Input for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
}

/// A post with its author resolved to public display fields.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: AuthorRef,
}

/// A comment with its author resolved to public display fields.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: AuthorRef,
}

/// Orchestrates the content stores, the ownership guard and the like toggle.
pub struct ContentService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl ContentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    pub async fn create_post(
        &self,
        author_id: Uuid,
        input: NewPost,
    ) -> Result<PostWithAuthor, DomainError> {
        let title = validate_title(&input.title)?;
        let content = validate_post_content(&input.content)?;
        let tags = trim_tags(input.tags);
        let cover_image = input.cover_image.filter(|url| !url.trim().is_empty());
        let status = input.status.unwrap_or_default();

        let post = Post::new(author_id, title, content, tags, cover_image, status);
        let saved = self.posts.save(post).await?;

        let author = self.author_ref(saved.author_id).await?;
        Ok(PostWithAuthor {
            post: saved,
            author,
        })
    }

    /// Published posts only, newest first.
    pub async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, DomainError> {
        let posts = self.posts.list_published().await?;
        self.resolve_post_authors(posts).await
    }

    /// One author's published posts, newest first.
    pub async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<PostWithAuthor>, DomainError> {
        let posts = self.posts.list_published_by_author(author_id).await?;
        self.resolve_post_authors(posts).await
    }

    /// Single post by id, any status.
    pub async fn get_post(&self, id: Uuid) -> Result<PostWithAuthor, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "post", id })?;
        let author = self.author_ref(post.author_id).await?;
        Ok(PostWithAuthor { post, author })
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        acting_user: Uuid,
        patch: PostPatch,
    ) -> Result<PostWithAuthor, DomainError> {
        // Fetch fresh so ownership cannot be forged from request input.
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "post", id })?;
        if !post.is_author(acting_user) {
            return Err(DomainError::Forbidden);
        }

        if let Some(title) = patch.title {
            post.title = validate_title(&title)?;
        }
        if let Some(content) = patch.content {
            post.content = validate_post_content(&content)?;
        }
        if let Some(tags) = patch.tags {
            post.tags = trim_tags(tags);
        }
        if let Some(cover_image) = patch.cover_image {
            let trimmed = cover_image.trim();
            post.cover_image = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(status) = patch.status {
            if post.status == PostStatus::Published && status == PostStatus::Draft {
                return Err(DomainError::Validation(
                    "a published post cannot return to draft".into(),
                ));
            }
            post.status = status;
        }
        post.touch();

        let saved = self.posts.save(post).await?;
        let author = self.author_ref(saved.author_id).await?;
        Ok(PostWithAuthor {
            post: saved,
            author,
        })
    }

    /// Permanent removal. Comments on the post are left in place; they stay
    /// addressable under a post id that no longer resolves.
    pub async fn delete_post(&self, id: Uuid, acting_user: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "post", id })?;
        if !post.is_author(acting_user) {
            return Err(DomainError::Forbidden);
        }

        self.posts.delete(id).await?;
        Ok(())
    }

    /// Any authenticated identity may like; ownership is not required.
    pub async fn like_post(
        &self,
        id: Uuid,
        acting_user: Uuid,
    ) -> Result<PostWithAuthor, DomainError> {
        let post = self
            .posts
            .toggle_like(id, acting_user)
            .await?
            .ok_or(DomainError::NotFound { entity: "post", id })?;
        let author = self.author_ref(post.author_id).await?;
        Ok(PostWithAuthor { post, author })
    }

    pub async fn create_comment(
        &self,
        author_id: Uuid,
        input: NewComment,
    ) -> Result<CommentWithAuthor, DomainError> {
        let content = validate_comment_content(&input.content)?;

        // Referential integrity is enforced at write time: the post must exist.
        if self.posts.find_by_id(input.post_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "post",
                id: input.post_id,
            });
        }
        if let Some(parent_id) = input.parent_id {
            let parent = self.comments.find_by_id(parent_id).await?.ok_or(
                DomainError::NotFound {
                    entity: "comment",
                    id: parent_id,
                },
            )?;
            if parent.post_id != input.post_id {
                return Err(DomainError::Validation(
                    "parent comment belongs to a different post".into(),
                ));
            }
        }

        let comment = Comment::new(input.post_id, author_id, content, input.parent_id);
        let saved = self.comments.save(comment).await?;
        let author = self.author_ref(saved.author_id).await?;
        Ok(CommentWithAuthor {
            comment: saved,
            author,
        })
    }

    /// Flat newest-first list; threading is reconstructed by the caller.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, DomainError> {
        let comments = self.comments.list_by_post(post_id).await?;

        let mut authors: HashMap<Uuid, AuthorRef> = HashMap::new();
        let mut resolved = Vec::with_capacity(comments.len());
        for comment in comments {
            let author = match authors.get(&comment.author_id) {
                Some(author) => author.clone(),
                None => {
                    let author = self.author_ref(comment.author_id).await?;
                    authors.insert(comment.author_id, author.clone());
                    author
                }
            };
            resolved.push(CommentWithAuthor { comment, author });
        }
        Ok(resolved)
    }

    pub async fn update_comment(
        &self,
        id: Uuid,
        acting_user: Uuid,
        content: String,
    ) -> Result<CommentWithAuthor, DomainError> {
        let mut comment = self.comments.find_by_id(id).await?.ok_or(
            DomainError::NotFound {
                entity: "comment",
                id,
            },
        )?;
        if !comment.is_author(acting_user) {
            return Err(DomainError::Forbidden);
        }

        comment.content = validate_comment_content(&content)?;
        comment.touch();

        let saved = self.comments.save(comment).await?;
        let author = self.author_ref(saved.author_id).await?;
        Ok(CommentWithAuthor {
            comment: saved,
            author,
        })
    }

    pub async fn delete_comment(&self, id: Uuid, acting_user: Uuid) -> Result<(), DomainError> {
        let comment = self.comments.find_by_id(id).await?.ok_or(
            DomainError::NotFound {
                entity: "comment",
                id,
            },
        )?;
        if !comment.is_author(acting_user) {
            return Err(DomainError::Forbidden);
        }

        self.comments.delete(id).await?;
        Ok(())
    }

    pub async fn like_comment(
        &self,
        id: Uuid,
        acting_user: Uuid,
    ) -> Result<CommentWithAuthor, DomainError> {
        let comment = self.comments.toggle_like(id, acting_user).await?.ok_or(
            DomainError::NotFound {
                entity: "comment",
                id,
            },
        )?;
        let author = self.author_ref(comment.author_id).await?;
        Ok(CommentWithAuthor { comment, author })
    }

    async fn author_ref(&self, author_id: Uuid) -> Result<AuthorRef, DomainError> {
        let user = self.users.find_by_id(author_id).await?.ok_or_else(|| {
            DomainError::Internal(format!("author {author_id} has no user record"))
        })?;
        Ok(AuthorRef::from(&user))
    }

    async fn resolve_post_authors(
        &self,
        posts: Vec<Post>,
    ) -> Result<Vec<PostWithAuthor>, DomainError> {
        let mut authors: HashMap<Uuid, AuthorRef> = HashMap::new();
        let mut resolved = Vec::with_capacity(posts.len());
        for post in posts {
            let author = match authors.get(&post.author_id) {
                Some(author) => author.clone(),
                None => {
                    let author = self.author_ref(post.author_id).await?;
                    authors.insert(post.author_id, author.clone());
                    author
                }
            };
            resolved.push(PostWithAuthor { post, author });
        }
        Ok(resolved)
    }
}

fn validate_title(raw: &str) -> Result<String, DomainError> {
    let title = raw.trim();
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(DomainError::Validation(format!(
            "Title must be at least {MIN_TITLE_LEN} characters long"
        )));
    }
    Ok(title.to_string())
}

fn validate_post_content(raw: &str) -> Result<String, DomainError> {
    if raw.chars().count() < MIN_CONTENT_LEN {
        return Err(DomainError::Validation(format!(
            "Content must be at least {MIN_CONTENT_LEN} characters long"
        )));
    }
    Ok(raw.to_string())
}

fn validate_comment_content(raw: &str) -> Result<String, DomainError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(DomainError::Validation("Comment cannot be empty".into()));
    }
    Ok(content.to_string())
}

fn trim_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
