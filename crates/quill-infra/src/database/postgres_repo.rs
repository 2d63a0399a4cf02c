//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DbBackend, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Statement,
};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, PostStatus, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn map_db_err(err: DbErr) -> RepoError {
    match err {
        DbErr::ConnectionAcquire(src) => RepoError::Timeout(src.to_string()),
        DbErr::Conn(src) => RepoError::Connection(src.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                RepoError::Constraint(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let exists = UserEntity::find_by_id(entity.id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .is_some();

        let active: user::ActiveModel = entity.into();
        let model = if exists {
            active.update(&self.db).await.map_err(map_db_err)?
        } else {
            active.insert(&self.db).await.map_err(map_db_err)?
        };
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    pub(crate) db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let exists = PostEntity::find_by_id(entity.id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .is_some();

        let mut active: post::ActiveModel = entity.into();
        let model = if exists {
            // The toggle statement is the only writer of the likes column;
            // a fetch-modify-save racing a toggle must not clobber it.
            active.likes = NotSet;
            active.update(&self.db).await.map_err(map_db_err)?
        } else {
            active.insert(&self.db).await.map_err(map_db_err)?
        };
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Status.eq(PostStatus::Published.to_string()))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_published_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .filter(post::Column::Status.eq(PostStatus::Published.to_string()))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError> {
        // One conditional UPDATE keeps the toggle atomic: concurrent calls
        // from the same identity serialize on the row lock, so the liked-by
        // set never accumulates duplicates.
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"UPDATE posts
               SET likes = CASE
                   WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
                   ELSE array_append(likes, $2)
               END,
               updated_at = now()
               WHERE id = $1
               RETURNING *"#,
            [id.into(), user_id.into()],
        );

        let result = PostEntity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }
}

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for PostgresCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        let exists = CommentEntity::find_by_id(entity.id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .is_some();

        let mut active: comment::ActiveModel = entity.into();
        let model = if exists {
            active.likes = NotSet;
            active.update(&self.db).await.map_err(map_db_err)?
        } else {
            active.insert(&self.db).await.map_err(map_db_err)?
        };
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = CommentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Comment>, RepoError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"UPDATE comments
               SET likes = CASE
                   WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
                   ELSE array_append(likes, $2)
               END,
               updated_at = now()
               WHERE id = $1
               RETURNING *"#,
            [id.into(), user_id.into()],
        );

        let result = CommentEntity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }
}
