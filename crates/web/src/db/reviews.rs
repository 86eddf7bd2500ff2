//! Review repository.
//!
//! The average rating is recomputed from approved rows on every read; there
//! is deliberately no cached aggregate.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use omnimarket_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::Review;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    product_id: ProductId,
    user_id: UserId,
    rating: i16,
    comment: String,
    approved: bool,
    created_at: DateTime<Utc>,
    author: String,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            approved: row.approved,
            created_at: row.created_at,
            author: row.author,
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT r.id, r.product_id, r.user_id, r.rating, r.comment, \
                              r.approved, r.created_at, u.username AS author \
                              FROM market.reviews r \
                              JOIN market.users u ON u.id = r.user_id";

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Approved reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE r.product_id = $1 AND r.approved ORDER BY r.created_at DESC"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// Ratings of approved reviews for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn approved_ratings(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<i16>, RepositoryError> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            "SELECT rating FROM market.reviews WHERE product_id = $1 AND approved",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(rating,)| rating).collect())
    }

    /// Get a review by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        let row: Option<ReviewRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE r.id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(Review::from))
    }

    /// Create a review; new reviews are approved immediately.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: UserId,
        rating: i16,
        comment: &str,
    ) -> Result<ReviewId, RepositoryError> {
        let row: (ReviewId,) = sqlx::query_as(
            r"
            INSERT INTO market.reviews (product_id, user_id, rating, comment, approved)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id
            ",
        )
        .bind(product_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Update a review's rating and comment, restricted to its author.
    ///
    /// Returns `false` if the review doesn't exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ReviewId,
        user_id: UserId,
        rating: i16,
        comment: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE market.reviews
            SET rating = $1, comment = $2
            WHERE id = $3 AND user_id = $4
            ",
        )
        .bind(rating)
        .bind(comment)
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a review, restricted to its author.
    ///
    /// Returns `false` if the review doesn't exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ReviewId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM market.reviews WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
