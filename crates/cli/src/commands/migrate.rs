//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! omnimarket migrate
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migration files live in `crates/web/migrations/` and are embedded into the
//! binary at compile time.

use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run shop database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MARKET_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("MARKET_DATABASE_URL"))?;

    tracing::info!("Connecting to shop database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Shop migrations complete!");
    Ok(())
}
