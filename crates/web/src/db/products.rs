//! Product repository.
//!
//! Products are written once by the catalog seeder and read everywhere else;
//! there is no product editing surface.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use omnimarket_core::{CurrencyCode, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Row shape shared by all product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Decimal,
    currency: String,
    image_url: Option<String>,
    images: String,
    category_slug: String,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let currency = self.currency.parse::<CurrencyCode>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;
        // The gallery is stored as a JSON array string; tolerate bad data
        // rather than failing the whole page.
        let images: Vec<String> = serde_json::from_str(&self.images).unwrap_or_default();

        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            currency,
            image_url: self.image_url,
            images,
            category_slug: self.category_slug,
            created_at: self.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, description, price, currency, image_url, images, \
                              category_slug, created_at FROM market.products";

/// Parameters for inserting a seeded product.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub currency: CurrencyCode,
    pub image_url: Option<String>,
    /// JSON array of gallery image URLs.
    pub images: Vec<String>,
    pub category_slug: String,
}

/// Repository for product reads and seed writes.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The first `limit` products in insertion order (home page).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY id LIMIT $1"))
                .bind(limit)
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Search by name/description substring and/or category slug.
    ///
    /// Either filter may be absent; with both absent this is a full listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        query: Option<&str>,
        category_slug: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} \
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' \
                    OR description ILIKE '%' || $1 || '%') \
               AND ($2::text IS NULL OR category_slug = $2) \
             ORDER BY id"
        ))
        .bind(query)
        .bind(category_slug)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// All products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(&self, slug: &str) -> Result<Vec<Product>, RepositoryError> {
        self.search(None, Some(slug)).await
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM market.products")
            .fetch_one(self.pool)
            .await?;
        Ok(row.0)
    }

    /// Insert a seeded product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, product: NewProduct) -> Result<ProductId, RepositoryError> {
        let images = serde_json::to_string(&product.images)
            .map_err(|e| RepositoryError::DataCorruption(format!("image list: {e}")))?;

        let row: (ProductId,) = sqlx::query_as(
            r"
            INSERT INTO market.products
                (name, description, price, currency, image_url, images, category_slug)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.currency.code())
        .bind(&product.image_url)
        .bind(&images)
        .bind(&product.category_slug)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Delete every product (explicit reseed only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM market.products")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
