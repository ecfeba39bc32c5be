//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! acme-cli user create -e user@example.com -n "User Name" -p secret1
//! ```

use thiserror::Error;

use acme_core::{AuthConfig, Email};
use acme_dashboard::db::{RepositoryError, UserRepository};
use acme_dashboard::services::auth::{AuthError, hash_password};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password shorter than the login minimum.
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hash(#[from] AuthError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

/// Validate the new user's email and password against the login rules.
fn validate(email: &str, password: &str) -> Result<Email, UserError> {
    let email = Email::parse(email).map_err(|_| UserError::InvalidEmail(email.to_owned()))?;

    let min = AuthConfig::default().min_password_length();
    if password.chars().count() < min {
        return Err(UserError::PasswordTooShort(min));
    }

    Ok(email)
}

/// Create a new dashboard user.
///
/// # Errors
///
/// Returns an error if validation fails, the email is taken, or the
/// database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = validate(email, password)?;
    let password_hash = hash_password(password).map_err(UserError::from)?;

    let pool = super::connect().await?;

    tracing::info!("Creating user: {}", email);
    let user = UserRepository::new(&pool)
        .create_with_password(name, &email, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::UserExists(email.to_string()),
            other => UserError::Database(other),
        })?;

    tracing::info!("User created successfully! ID: {}, Email: {}", user.id, user.email);
    Ok(())
}
