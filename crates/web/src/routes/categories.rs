//! Category listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;

use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Category, CurrentUser, Product};
use crate::routes::cart::header_cart_count;
use crate::state::AppState;

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub category: Category,
    pub products: Vec<Product>,
}

/// Display all products in a category.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Path(slug): Path<String>,
) -> Result<CategoryTemplate> {
    let category = CategoryRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("category {slug}")))?;

    let products = ProductRepository::new(state.pool())
        .list_by_category(&category.slug)
        .await?;
    let cart_count = header_cart_count(&state, &session, current_user.as_ref()).await;

    Ok(CategoryTemplate {
        current_user,
        cart_count,
        category,
        products,
    })
}
