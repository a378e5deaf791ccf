//! Password-based authentication.
//!
//! Passwords are hashed with Argon2id using per-hash random salts. The
//! session only ever stores the user id; group membership is re-read on
//! every authenticated request so revocations take effect immediately.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::http::StatusCode;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::models::user::User;

/// Shortest username accepted at registration.
pub const MIN_USERNAME_LEN: usize = 3;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately one variant so
    /// responses cannot be used to probe which usernames exist.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration input failed validation.
    #[error("{0}")]
    Validation(String),

    /// The username is already registered.
    #[error("username already taken")]
    UsernameTaken,

    /// Password hashing or verification infrastructure failed.
    #[error("password hashing failed")]
    Hash,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UsernameTaken => StatusCode::CONFLICT,
            Self::Hash => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Client-facing message. Internal details never leak.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid username or password.".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::UsernameTaken => "Username already taken.".to_string(),
            Self::Hash => "Internal server error.".to_string(),
            Self::Repository(err) => match err {
                RepositoryError::NotFound => "Not found.".to_string(),
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "Internal server error.".to_string()
                }
            },
        }
    }
}

/// Registration and login over the user repository.
pub struct AuthService<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a new account and enroll it in the `client` group.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `UsernameTaken` when the
    /// username exists.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        validate_registration(username, email, password)?;

        let password_hash = hash_password(password)?;
        UserRepository::new(self.pool)
            .create(username, email.trim(), &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })
    }

    /// Verify credentials and return the account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown username or a wrong
    /// password.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let repo = UserRepository::new(self.pool);

        let Some((user_id, stored_hash)) = repo.password_hash(username.trim()).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &stored_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        repo.get_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if username.len() < MIN_USERNAME_LEN {
        return Err(AuthError::Validation(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters."
        )));
    }
    if !email.contains('@') {
        return Err(AuthError::Validation("Invalid email address.".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::Hash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::Hash` if the stored hash is malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::Hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_registration_validation() {
        assert!(validate_registration("player1", "p1@example.com", "longenough").is_ok());
        assert!(matches!(
            validate_registration("ab", "p1@example.com", "longenough"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("player1", "nope", "longenough"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("player1", "p1@example.com", "short"),
            Err(AuthError::Validation(_))
        ));
    }
}
