//! Account route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;

use crate::db::orders::OrderRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Order, User};
use crate::routes::cart::header_cart_count;
use crate::state::AppState;

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub user: User,
    pub order_count: usize,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrderHistoryTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub orders: Vec<Order>,
}

/// Display the account overview.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<AccountTemplate> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::not_found("account"))?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;
    let cart_count = header_cart_count(&state, &session, Some(&current)).await;

    Ok(AccountTemplate {
        cart_count,
        current_user: Some(current),
        user,
        order_count: orders.len(),
    })
}

/// Display the user's order history, newest first.
pub async fn orders(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<OrderHistoryTemplate> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;
    let cart_count = header_cart_count(&state, &session, Some(&current)).await;

    Ok(OrderHistoryTemplate {
        cart_count,
        current_user: Some(current),
        orders,
    })
}
