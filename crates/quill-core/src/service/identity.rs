//! Identity service - registration, authentication and profile mutation.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Profile, User};
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService, UserRepository};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

/// Input for registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Whitelisted profile patch. Absent fields are left alone; fields provided
/// as empty strings are rejected (bio and picture, which may be cleared, are
/// the exception).
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    /// `Some("")` clears the bio.
    pub bio: Option<String>,
    /// `Some("")` clears the picture.
    pub profile_picture: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// A signed-in identity: public profile plus a bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: Profile,
    pub token: String,
}

/// Orchestrates the identity store, password hashing and token issuance.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn register(&self, input: NewAccount) -> Result<Session, DomainError> {
        let username = validate_username(&input.username)?;
        let email = normalize_email(&input.email)?;
        validate_password(&input.password)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict("Username already taken".into()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = User::new(username, email, password_hash);
        let saved = self.users.save(user).await?;

        let token = self.tokens.issue(&saved)?;
        Ok(Session {
            profile: saved.into(),
            token,
        })
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let email = email.trim().to_ascii_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            return Err(DomainError::Unauthorized);
        }

        let token = self.tokens.issue(&user)?;
        Ok(Session {
            profile: user.into(),
            token,
        })
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "user",
                id: user_id,
            })?;
        Ok(user.into())
    }

    /// All validation runs before any field is written, so a rejected patch
    /// never leaves the record partially updated.
    pub async fn update_profile(
        &self,
        acting_user: Uuid,
        patch: ProfilePatch,
    ) -> Result<Profile, DomainError> {
        let mut user = self
            .users
            .find_by_id(acting_user)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "user",
                id: acting_user,
            })?;

        let username = match patch.username {
            Some(raw) => {
                let username = validate_username(&raw)?;
                if username != user.username {
                    if let Some(other) = self.users.find_by_username(&username).await? {
                        if other.id != user.id {
                            return Err(DomainError::Conflict("Username already taken".into()));
                        }
                    }
                }
                Some(username)
            }
            None => None,
        };

        let email = match patch.email {
            Some(raw) => {
                let email = normalize_email(&raw)?;
                if email != user.email {
                    if let Some(other) = self.users.find_by_email(&email).await? {
                        if other.id != user.id {
                            return Err(DomainError::Conflict("Email already registered".into()));
                        }
                    }
                }
                Some(email)
            }
            None => None,
        };

        // Credential rotation requires both halves of the pair.
        let new_hash = match (patch.current_password, patch.new_password) {
            (Some(current), Some(new)) => {
                if !self.passwords.verify(&current, &user.password_hash)? {
                    return Err(DomainError::Unauthorized);
                }
                validate_password(&new)?;
                Some(self.passwords.hash(&new)?)
            }
            (None, None) => None,
            _ => {
                return Err(DomainError::Validation(
                    "both current_password and new_password are required to change the password"
                        .into(),
                ));
            }
        };

        if let Some(username) = username {
            user.username = username;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(bio) = patch.bio {
            let trimmed = bio.trim();
            user.bio = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(picture) = patch.profile_picture {
            let trimmed = picture.trim();
            user.profile_picture = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(hash) = new_hash {
            user.password_hash = hash;
        }
        user.touch();

        let saved = self.users.save(user).await?;
        Ok(saved.into())
    }

    /// Store a pre-uploaded image URL as the acting user's profile picture.
    /// Upload mechanics live with the external image host.
    pub async fn set_profile_picture(
        &self,
        acting_user: Uuid,
        image_url: &str,
    ) -> Result<Profile, DomainError> {
        let url = image_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DomainError::Validation(
                "profile picture must be an http(s) URL".into(),
            ));
        }

        let mut user = self
            .users
            .find_by_id(acting_user)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "user",
                id: acting_user,
            })?;
        user.profile_picture = Some(url.to_string());
        user.touch();

        let saved = self.users.save(user).await?;
        Ok(saved.into())
    }
}

fn validate_username(raw: &str) -> Result<String, DomainError> {
    let username = raw.trim();
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(DomainError::Validation(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters long"
        )));
    }
    Ok(username.to_string())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_ascii_lowercase();
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if !well_formed {
        return Err(DomainError::Validation("Please enter a valid email".into()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["", "alice", "@example.com", "alice@", "alice@nodot", "a@.com"] {
            assert!(normalize_email(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn short_usernames_and_passwords_are_rejected() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("  ab  ").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
