//! Database operations for the dashboard `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - Dashboard logins (Argon2id password hashes)
//! - `customers` - Read-only customer directory
//! - `invoices` - Invoices, amounts in cents
//! - `revenue` - Monthly revenue for the overview table
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/dashboard/migrations/` and run via:
//! ```bash
//! cargo run -p acme-cli -- migrate
//! ```
//!
//! IDs are opaque strings in Rust and UUIDs in storage. Queries bind them as
//! text with a `::uuid` cast and select them back with `::text`; callers
//! check the UUID shape first so a malformed id never reaches the database.

pub mod customers;
pub mod invoices;
pub mod overview;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::CustomerRepository;
pub use invoices::{InvoiceRepository, PgInvoiceStore};
pub use overview::OverviewRepository;
pub use users::{PgUserStore, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Whether `id` has the shape of a UUID.
pub(crate) fn is_uuid(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

/// Escape `LIKE` wildcards so user search text matches literally.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid("3958dc9e-712f-4377-85e9-fec4b6a6442a"));
        assert!(!is_uuid("c1"));
        assert!(!is_uuid(""));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("lee"), "%lee%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
