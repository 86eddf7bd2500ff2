//! Authentication service.
//!
//! Password registration and login backed by Argon2id hashes.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use omnimarket_core::Email;

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum username length.
const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length.
const MAX_USERNAME_LENGTH: usize = 32;

/// Registration form fields after trimming.
#[derive(Debug)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

/// Authentication service.
///
/// Handles user registration and password login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` or `AuthError::InvalidEmail` if a
    /// field fails validation.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet
    /// requirements, `AuthError::PasswordMismatch` if the confirmation
    /// differs.
    /// Returns `AuthError::UsernameTaken` / `AuthError::EmailTaken` on
    /// duplicates.
    pub async fn register(&self, form: Registration<'_>) -> Result<User, AuthError> {
        validate_username(form.username)?;
        let email = Email::parse(form.email)?;
        validate_password(form.password)?;
        if form.password != form.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let password_hash = hash_password(form.password)?;

        let user = self
            .users
            .create(NewUser {
                username: form.username,
                email: &email,
                password_hash: &password_hash,
                first_name: form.first_name.filter(|s| !s.is_empty()),
                last_name: form.last_name.filter(|s| !s.is_empty()),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(detail) if detail.contains("email") => {
                    AuthError::EmailTaken
                }
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is
    /// wrong. Unknown usernames and wrong passwords are indistinguishable to
    /// the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate username meets requirements.
fn validate_username(username: &str) -> Result<(), AuthError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH || len > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidUsername(format!(
            "username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AuthError::InvalidUsername(
            "username may only contain letters, digits, '_' and '-'".to_owned(),
        ));
    }
    Ok(())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_rejected() {
        let err = validate_password("hunter2").unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[test]
    fn test_eight_char_password_accepted() {
        assert!(validate_password("hunter22").is_ok());
    }

    #[test]
    fn test_username_charset() {
        assert!(validate_username("anna_k-99").is_ok());
        assert!(matches!(
            validate_username("anna k"),
            Err(AuthError::InvalidUsername(_))
        ));
        assert!(matches!(
            validate_username("ab"),
            Err(AuthError::InvalidUsername(_))
        ));
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
