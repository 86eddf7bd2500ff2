//! Home page and product search route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Category, CurrentUser, Product};
use crate::routes::cart::header_cart_count;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_COUNT: i64 = 12;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Search results template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub query: String,
    pub category: Option<String>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Display the home page with featured products.
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<HomeTemplate> {
    let products = ProductRepository::new(state.pool())
        .list(FEATURED_COUNT)
        .await?;
    let categories = CategoryRepository::new(state.pool()).list().await?;
    let cart_count = header_cart_count(&state, &session, current_user.as_ref()).await;

    Ok(HomeTemplate {
        current_user,
        cart_count,
        products,
        categories,
    })
}

/// Search products by name/description and/or category.
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> Result<SearchTemplate> {
    let q = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let products = ProductRepository::new(state.pool()).search(q, category).await?;
    let categories = CategoryRepository::new(state.pool()).list().await?;
    let cart_count = header_cart_count(&state, &session, current_user.as_ref()).await;

    Ok(SearchTemplate {
        current_user,
        cart_count,
        query: q.unwrap_or_default().to_owned(),
        category: category.map(str::to_owned),
        products,
        categories,
    })
}
