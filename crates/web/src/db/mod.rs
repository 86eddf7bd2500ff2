//! Database operations for the shop's `PostgreSQL` schema.
//!
//! # Schema: `market`
//!
//! - `categories` - fixed seed list of product categories
//! - `products` - catalog rows seeded from the external product API
//! - `users` - registered users with argon2 password hashes
//! - `reviews` - product reviews with an approval flag
//! - `cart_items` - persisted cart rows, one per (user, product)
//! - `orders` / `order_items` - placed orders with price snapshots
//! - `shipping_tracking` - simulated shipments, created on payment
//! - `tower_sessions.session` - session store (managed by tower-sessions)
//!
//! All queries are runtime-bound (`sqlx::query` / `query_as` with `.bind`),
//! so the workspace builds without a live database.
//!
//! # Migrations
//!
//! Migrations live in `crates/web/migrations/` and are NOT run on startup:
//! ```bash
//! cargo run -p omnimarket-cli -- migrate
//! ```

pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
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
