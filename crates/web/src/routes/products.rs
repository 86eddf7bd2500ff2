//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;

use omnimarket_core::ProductId;

use crate::db::products::ProductRepository;
use crate::db::reviews::ReviewRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Product, Review, review::average_rating};
use crate::routes::cart::header_cart_count;
use crate::state::AppState;

/// Query parameters for review form feedback.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub product: Product,
    pub reviews: Vec<Review>,
    /// Average of approved ratings, absent with no reviews.
    pub average: Option<f64>,
    pub error: Option<String>,
}

/// Display a product with its approved reviews and average rating.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Path(id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> Result<ProductTemplate> {
    let product_id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("product {id}")))?;

    let reviews_repo = ReviewRepository::new(state.pool());
    let reviews = reviews_repo.list_approved(product_id).await?;
    let ratings = reviews_repo.approved_ratings(product_id).await?;
    let average = average_rating(&ratings);

    let cart_count = header_cart_count(&state, &session, current_user.as_ref()).await;

    Ok(ProductTemplate {
        current_user,
        cart_count,
        product,
        reviews,
        average,
        error: query.error,
    })
}
