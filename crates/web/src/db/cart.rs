//! Persisted cart repository (logged-in users).
//!
//! One row per (user, product) is enforced by a unique constraint; repeated
//! adds go through an upsert that sums quantities instead of duplicating
//! rows.

use rust_decimal::Decimal;
use sqlx::PgPool;

use omnimarket_core::{CurrencyCode, ProductId, UserId};

use super::RepositoryError;
use crate::models::CartLine;

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    product_id: ProductId,
    product_name: String,
    image_url: Option<String>,
    unit_price: Decimal,
    currency: String,
    quantity: i32,
}

impl CartLineRow {
    fn into_line(self) -> Result<CartLine, RepositoryError> {
        let currency = self.currency.parse::<CurrencyCode>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;
        Ok(CartLine {
            product_id: self.product_id,
            product_name: self.product_name,
            image_url: self.image_url,
            unit_price: self.unit_price,
            currency,
            quantity: u32::try_from(self.quantity).unwrap_or(0),
        })
    }
}

/// Repository for persisted cart rows.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's cart lines joined with their products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            r"
            SELECT c.product_id, p.name AS product_name, p.image_url,
                   p.price AS unit_price, p.currency, c.quantity
            FROM market.cart_items c
            JOIN market.products p ON p.id = c.product_id
            WHERE c.user_id = $1
            ORDER BY c.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartLineRow::into_line).collect()
    }

    /// Add `quantity` of a product to the user's cart.
    ///
    /// An existing row for the same product has its quantity summed rather
    /// than a second row created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO market.cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = market.cart_items.quantity + excluded.quantity
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Set a product's quantity exactly; zero removes the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        if quantity == 0 {
            return self.remove(user_id, product_id).await;
        }

        sqlx::query(
            r"
            INSERT INTO market.cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = excluded.quantity
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a product from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM market.cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Empty the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM market.cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Total units across the user's cart (header badge).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unit_count(&self, user_id: UserId) -> Result<u32, RepositoryError> {
        let row: (Option<i64>,) = sqlx::query_as(
            "SELECT SUM(quantity) FROM market.cart_items WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(u32::try_from(row.0.unwrap_or(0)).unwrap_or(0))
    }
}
