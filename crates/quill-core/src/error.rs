//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authenticated but not the owner of the resource.
    #[error("Not authorized")]
    Forbidden,

    /// Missing or bad credential (login failure, wrong current password).
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Store call timed out: {0}")]
    Timeout(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) | RepoError::Timeout(msg) => DomainError::Unavailable(msg),
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            // A row vanishing between fetch and write is a store-level surprise,
            // not a caller mistake.
            RepoError::NotFound => DomainError::Internal("entity disappeared mid-operation".into()),
            RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}
