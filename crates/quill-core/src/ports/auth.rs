//! Authentication ports - token issuance and password hashing.

use uuid::Uuid;

use crate::domain::User;

/// Claims carried inside a credential token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub exp: i64,
}

/// Credential token service.
pub trait TokenService: Send + Sync {
    /// Issue a bearer token for a user.
    fn issue(&self, user: &User) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Validity window of freshly issued tokens, in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password into an opaque digest.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored digest.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    Hashing(String),
}

impl From<AuthError> for crate::error::DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => crate::error::DomainError::Unauthorized,
            other => crate::error::DomainError::Internal(other.to_string()),
        }
    }
}
