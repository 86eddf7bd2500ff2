//! Catalog seeding command.
//!
//! # Usage
//!
//! ```bash
//! # Seed only if the catalog is empty
//! omnimarket seed
//!
//! # Wipe the catalog and reseed from scratch
//! omnimarket seed --force
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//! - `CATALOG_API_URL` / `CATALOG_SEED_LIMIT` / `CATALOG_PRICE_MULTIPLIER` -
//!   upstream API settings (see `omnimarket_web::config`)

use secrecy::SecretString;
use thiserror::Error;

use omnimarket_web::config::{CatalogApiConfig, ConfigError};
use omnimarket_web::services::{CatalogSeeder, SeedError};

#[derive(Debug, Error)]
pub enum SeedCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),
}

/// Seed the catalog from the external product API.
///
/// With `force`, the existing catalog is wiped first; without it, a populated
/// catalog is left alone.
///
/// # Errors
///
/// Returns `SeedCommandError` if configuration is missing, the database is
/// unreachable, or the seed run fails.
pub async fn run(force: bool) -> Result<(), SeedCommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MARKET_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| SeedCommandError::MissingEnvVar("MARKET_DATABASE_URL"))?;
    let config = CatalogApiConfig::from_env()?;

    tracing::info!("Connecting to shop database...");
    let pool = omnimarket_web::db::create_pool(&database_url).await?;

    let http = reqwest::Client::new();
    let seeder = CatalogSeeder::new(&pool, &http, &config);

    if force {
        let inserted = seeder.reseed().await?;
        tracing::info!(inserted, "catalog reseeded");
    } else {
        seeder.seed_if_empty().await?;
        tracing::info!("catalog seed complete");
    }

    Ok(())
}
