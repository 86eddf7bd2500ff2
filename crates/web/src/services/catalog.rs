//! Catalog seeding from the external product API.
//!
//! On first boot the catalog is empty; the seeder inserts the fixed category
//! list and fetches a bounded product listing from the upstream API. Upstream
//! prices are converted to PLN with a fixed multiplier. A seed failure is
//! logged and the server keeps booting with an empty catalog.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};

use omnimarket_core::CurrencyCode;

use crate::config::CatalogApiConfig;
use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::db::products::{NewProduct, ProductRepository};
use crate::models::catalog::category_name_from_slug;

/// The fixed category seed list. Slugs match the upstream API's category
/// names so seeded products land in a known category.
pub const CATEGORY_SLUGS: &[&str] = &[
    "smartphones",
    "laptops",
    "fragrances",
    "skincare",
    "groceries",
    "home-decoration",
    "furniture",
    "tops",
    "womens-dresses",
    "womens-shoes",
    "mens-shirts",
    "mens-shoes",
    "mens-watches",
    "womens-watches",
    "womens-bags",
    "womens-jewellery",
    "sunglasses",
    "automotive",
    "motorcycle",
    "lighting",
];

/// One product as returned by the upstream listing.
#[derive(Debug, Deserialize)]
struct ApiProduct {
    title: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    category: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

/// The upstream listing envelope.
#[derive(Debug, Deserialize)]
struct ApiProductList {
    products: Vec<ApiProduct>,
}

/// Errors from a seed run.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("catalog API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Seeds categories and products from the external catalog API.
pub struct CatalogSeeder<'a> {
    pool: &'a PgPool,
    http: &'a reqwest::Client,
    config: &'a CatalogApiConfig,
}

impl<'a> CatalogSeeder<'a> {
    /// Create a new seeder.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        http: &'a reqwest::Client,
        config: &'a CatalogApiConfig,
    ) -> Self {
        Self { pool, http, config }
    }

    /// Seed the catalog if it is empty; a populated catalog is left alone.
    ///
    /// An upstream failure is logged, not fatal: the shop can run with an
    /// empty catalog and be seeded later via the CLI.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Repository` if a database operation fails.
    pub async fn seed_if_empty(&self) -> Result<(), SeedError> {
        let products = ProductRepository::new(self.pool);
        if products.count().await? > 0 {
            return Ok(());
        }

        self.seed_categories().await?;

        if let Err(e) = self.seed_products().await {
            warn!(error = %e, "catalog seed failed; continuing with empty catalog");
        }

        Ok(())
    }

    /// Wipe and rebuild the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Api` if the upstream fetch fails and
    /// `SeedError::Repository` if a database operation fails.
    pub async fn reseed(&self) -> Result<u64, SeedError> {
        let products = ProductRepository::new(self.pool);
        let categories = CategoryRepository::new(self.pool);

        let deleted = products.delete_all().await?;
        categories.delete_all().await?;
        info!(deleted, "cleared catalog for reseed");

        self.seed_categories().await?;
        let inserted = self.seed_products().await?;
        Ok(inserted)
    }

    /// Insert the fixed category list; already-present slugs are skipped.
    async fn seed_categories(&self) -> Result<(), SeedError> {
        let categories = CategoryRepository::new(self.pool);
        for slug in CATEGORY_SLUGS {
            categories
                .insert(&category_name_from_slug(slug), slug)
                .await?;
        }
        info!(count = CATEGORY_SLUGS.len(), "seeded categories");
        Ok(())
    }

    /// Fetch the bounded product listing and insert each product.
    async fn seed_products(&self) -> Result<u64, SeedError> {
        let url = self.config.products_url();
        info!(%url, "fetching products from catalog API");

        let listing: ApiProductList = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let products = ProductRepository::new(self.pool);
        let mut inserted = 0u64;
        for api in listing.products {
            let price = convert_price(api.price, self.config.price_multiplier);
            products
                .insert(NewProduct {
                    name: api.title,
                    description: api.description,
                    price,
                    currency: CurrencyCode::PLN,
                    image_url: api.thumbnail,
                    images: api.images,
                    category_slug: api.category,
                })
                .await?;
            inserted += 1;
        }

        info!(inserted, "seeded products");
        Ok(inserted)
    }
}

/// Convert an upstream price to PLN: fixed multiplier, rounded to grosze.
fn convert_price(upstream: Decimal, multiplier: Decimal) -> Decimal {
    (upstream * multiplier).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_convert_price_multiplies_and_rounds() {
        assert_eq!(convert_price(dec!(549), dec!(4)), dec!(2196.00));
        assert_eq!(convert_price(dec!(12.99), dec!(4)), dec!(51.96));
        assert_eq!(convert_price(dec!(0.333), dec!(4)), dec!(1.33));
    }

    #[test]
    fn test_category_seed_list_is_twenty_unique_slugs() {
        assert_eq!(CATEGORY_SLUGS.len(), 20);
        let mut sorted = CATEGORY_SLUGS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 20);
    }

    #[test]
    fn test_listing_envelope_parses() {
        let json = r#"{
            "products": [
                {
                    "title": "iPhone 9",
                    "description": "An apple mobile",
                    "price": 549,
                    "category": "smartphones",
                    "thumbnail": "https://example.test/thumb.jpg",
                    "images": ["https://example.test/1.jpg"]
                }
            ],
            "total": 100
        }"#;
        let listing: ApiProductList = serde_json::from_str(json).unwrap();
        assert_eq!(listing.products.len(), 1);
        assert_eq!(listing.products[0].category, "smartphones");
        assert_eq!(listing.products[0].price, dec!(549));
    }
}
