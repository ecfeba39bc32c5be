//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use sqlx::PgPool;

/// Connect to the dashboard database.
async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url = acme_dashboard::config::database_url_from_env()?;

    tracing::info!("Connecting to dashboard database...");
    let pool = acme_dashboard::db::create_pool(&database_url).await?;
    Ok(pool)
}
