//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! acme-cli migrate
//! ```
//!
//! Runs the dashboard schema migrations from `crates/dashboard/migrations/`,
//! then creates the tower-sessions table used by the session store.

use tower_sessions_sqlx_store::PostgresStore;

/// Run all dashboard migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running dashboard migrations...");
    sqlx::migrate!("../dashboard/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
