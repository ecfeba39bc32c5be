//! Authentication gate.
//!
//! Checks submitted credentials against stored users with a one-way
//! Argon2id comparison. Every reason a login can be refused collapses into
//! [`AuthOutcome::InvalidCredentials`]; only system failures are told apart.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use acme_core::{AuthConfig, Email};

use crate::models::{CurrentUser, User};
use crate::stores::UserStore;

/// Message shown for every refused login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
/// Message shown when the gate itself failed.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials matched; carries the principal to store in the session.
    Success(CurrentUser),
    /// Malformed input, unknown email, or wrong password.
    InvalidCredentials,
    /// Lookup or hash verification could not be performed.
    InternalError,
}

impl AuthOutcome {
    /// User-facing message for a failed attempt, `None` on success.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Success(_) => None,
            Self::InvalidCredentials => Some(INVALID_CREDENTIALS),
            Self::InternalError => Some(SOMETHING_WENT_WRONG),
        }
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    config: &'a AuthConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore, config: &'a AuthConfig) -> Self {
        Self { users, config }
    }

    /// Authenticate an email/password pair.
    ///
    /// Shape checks run before any lookup, so a malformed email or a short
    /// password never reaches the store.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> AuthOutcome {
        match self.login_with_password(email, password).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Login succeeded");
                AuthOutcome::Success(CurrentUser::from(&user))
            }
            Err(e) if e.is_rejection() => {
                tracing::info!(reason = %e, "Login refused");
                AuthOutcome::InvalidCredentials
            }
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                AuthOutcome::InternalError
            }
        }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::PasswordTooShort` for
    /// malformed input, `AuthError::InvalidCredentials` if the email is
    /// unknown or the password is wrong, `AuthError::Repository` if the
    /// lookup fails, and `AuthError::PasswordHash` if the stored hash is
    /// unreadable.
    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password, self.config.min_password_length())?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }
}

/// Check the password meets the minimum length, counted in characters.
fn validate_password(password: &str, min: usize) -> Result<(), AuthError> {
    if password.chars().count() < min {
        return Err(AuthError::PasswordTooShort { min });
    }
    Ok(())
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// A stored hash that does not parse is a fault, not a wrong password.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
