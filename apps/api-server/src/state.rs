//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CommentRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use quill_core::service::{ContentService, IdentityService};
use quill_infra::database::{
    DatabaseConfig, DatabaseConnections, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

type Repos = (
    Arc<dyn UserRepository>,
    Arc<dyn PostRepository>,
    Arc<dyn CommentRepository>,
);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub content: Arc<ContentService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate store implementations.
    pub async fn new(
        db_config: Option<&DatabaseConfig>,
        token_service: Arc<dyn TokenService>,
        password_service: Arc<dyn PasswordService>,
    ) -> Self {
        #[cfg(feature = "postgres")]
        let (db, (users, posts, comments)): (Option<Arc<DatabaseConnections>>, Repos) = {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let repos: Repos = (
                            Arc::new(PostgresUserRepository::new(conn.main.clone())),
                            Arc::new(PostgresPostRepository::new(conn.main.clone())),
                            Arc::new(PostgresCommentRepository::new(conn.main.clone())),
                        );
                        (Some(conn), repos)
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory stores.",
                            e
                        );
                        (None, in_memory_repos())
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running with in-memory stores.");
                (None, in_memory_repos())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, (users, posts, comments)): (Option<Arc<DatabaseConnections>>, Repos) = {
            let _ = db_config;
            tracing::info!("Built without postgres support - using in-memory stores");
            (None, in_memory_repos())
        };

        let identity = Arc::new(IdentityService::new(
            users.clone(),
            password_service,
            token_service,
        ));
        let content = Arc::new(ContentService::new(users, posts, comments));

        tracing::info!("Application state initialized");

        Self {
            identity,
            content,
            db,
        }
    }
}

fn in_memory_repos() -> Repos {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryCommentRepository::new()),
    )
}
