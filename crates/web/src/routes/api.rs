//! JSON API route handlers.

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::models::Product;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// One product in the JSON listing.
#[derive(Debug, Serialize)]
pub struct ApiProduct {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Decimal amount serialized as a string, e.g. `"219.96"`.
    pub price: String,
    pub currency: &'static str,
    pub image_url: Option<String>,
    pub images: Vec<String>,
    pub category: String,
}

impl From<Product> for ApiProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name,
            description: product.description,
            price: product.price.to_string(),
            currency: product.currency.code(),
            image_url: product.image_url,
            images: product.images,
            category: product.category_slug,
        }
    }
}

/// List products as JSON, with the same filters as the HTML search.
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<ApiProduct>>> {
    let q = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let products = ProductRepository::new(state.pool()).search(q, category).await?;
    Ok(Json(products.into_iter().map(ApiProduct::from).collect()))
}
