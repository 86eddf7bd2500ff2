//! Checkout and order route handlers.
//!
//! The whole flow requires a logged-in user: checkout page, order placement,
//! the simulated payment pages, and the tracking view. Orders are addressed
//! by their public order number, never by row id.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use omnimarket_core::{OrderNumber, OrderStatus};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CartLine, CurrentUser, Order, OrderItem, ShippingTracking, cart::cart_total};
use crate::routes::cart::header_cart_count;
use crate::services::{CartService, OrderError, OrderService};
use crate::state::AppState;

// =============================================================================
// Form and Query Types
// =============================================================================

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub shipping_address: String,
    /// Empty means "same as shipping".
    #[serde(default)]
    pub billing_address: String,
}

/// Simulated card payment form data.
#[derive(Debug, Deserialize)]
pub struct CardForm {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

/// Simulated BLIK payment form data.
#[derive(Debug, Deserialize)]
pub struct BlikForm {
    pub code: String,
}

/// Query parameters for payment form feedback.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

/// Payment method page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/pay.html")]
pub struct PayTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub order: Order,
    pub error: Option<String>,
}

/// Order detail and tracking template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub tracking: Option<ShippingTracking>,
    /// The fulfillment stages in order, for the progress bar.
    pub stages: &'static [OrderStatus],
}

// =============================================================================
// Helpers
// =============================================================================

/// Look up an order by number and verify it belongs to `user`.
///
/// Foreign orders 404 rather than 403; order numbers are guessable.
async fn owned_order(
    state: &AppState,
    user: &CurrentUser,
    number: &str,
) -> Result<Order> {
    let number: OrderNumber = number
        .parse()
        .map_err(|_| AppError::not_found("order"))?;
    let order = OrderRepository::new(state.pool())
        .get_by_number(&number)
        .await?
        .ok_or_else(|| AppError::not_found("order"))?;
    if order.user_id != user.id {
        return Err(AppError::not_found("order"));
    }
    Ok(order)
}

// =============================================================================
// Checkout
// =============================================================================

/// Display the checkout page with the user's cart.
pub async fn checkout_page(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<Response> {
    let lines = CartService::new(state.pool())
        .lines_for_user(current.id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if lines.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let total = cart_total(&lines);
    let cart_count = header_cart_count(&state, &session, Some(&current)).await;

    Ok(CheckoutTemplate {
        cart_count,
        current_user: Some(current),
        lines,
        total,
    }
    .into_response())
}

/// Place an order from the cart and continue to payment.
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let shipping = form.shipping_address.trim();
    if shipping.is_empty() {
        return Ok(Redirect::to("/checkout?error=missing_address").into_response());
    }
    let billing = match form.billing_address.trim() {
        "" => shipping,
        other => other,
    };

    let order = match OrderService::new(state.pool())
        .place_order(current.id, shipping, billing)
        .await
    {
        Ok(order) => order,
        Err(OrderError::EmptyCart) => {
            return Ok(Redirect::to("/cart").into_response());
        }
        Err(OrderError::Repository(e)) => return Err(e.into()),
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    Ok(Redirect::to(&format!("/orders/{}/pay", order.order_number)).into_response())
}

// =============================================================================
// Payment
// =============================================================================

/// Display the payment method page.
pub async fn pay_page(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Path(number): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let order = owned_order(&state, &current, &number).await?;
    if order.is_paid() {
        return Ok(Redirect::to(&format!("/orders/{}", order.order_number)).into_response());
    }

    let cart_count = header_cart_count(&state, &session, Some(&current)).await;
    Ok(PayTemplate {
        cart_count,
        current_user: Some(current),
        order,
        error: query.error,
    }
    .into_response())
}

/// Simulated card payment.
pub async fn pay_card(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(number): Path<String>,
    Form(form): Form<CardForm>,
) -> Result<Response> {
    let order = owned_order(&state, &current, &number).await?;
    let result = OrderService::new(state.pool())
        .pay_with_card(&order, &form.card_number, &form.expiry, &form.cvv)
        .await;
    Ok(payment_response(&order, result))
}

/// Simulated BLIK payment.
pub async fn pay_blik(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(number): Path<String>,
    Form(form): Form<BlikForm>,
) -> Result<Response> {
    let order = owned_order(&state, &current, &number).await?;
    let result = OrderService::new(state.pool())
        .pay_with_blik(&order, &form.code)
        .await;
    Ok(payment_response(&order, result))
}

fn payment_response(order: &Order, result: std::result::Result<ShippingTracking, OrderError>) -> Response {
    let number = &order.order_number;
    match result {
        Ok(_) | Err(OrderError::AlreadyPaid) => {
            Redirect::to(&format!("/orders/{number}")).into_response()
        }
        Err(OrderError::InvalidPayment(_)) => {
            Redirect::to(&format!("/orders/{number}/pay?error=invalid_payment")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, order_number = %number, "payment failed");
            Redirect::to(&format!("/orders/{number}/pay?error=payment_failed")).into_response()
        }
    }
}

// =============================================================================
// Order Detail and Tracking
// =============================================================================

/// Display an order with its items, payment state, and tracking.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Path(number): Path<String>,
) -> Result<OrderTemplate> {
    let order = owned_order(&state, &current, &number).await?;

    let repo = OrderRepository::new(state.pool());
    let items = repo.items(order.id).await?;
    let tracking = repo.tracking(order.id).await?;
    let cart_count = header_cart_count(&state, &session, Some(&current)).await;

    Ok(OrderTemplate {
        cart_count,
        current_user: Some(current),
        order,
        items,
        tracking,
        stages: &OrderStatus::SEQUENCE,
    })
}

/// Advance the order one fulfillment stage (demo control).
pub async fn advance(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(number): Path<String>,
) -> Result<Response> {
    let order = owned_order(&state, &current, &number).await?;

    match OrderService::new(state.pool()).advance_status(&order).await {
        Ok(_) => Ok(Redirect::to(&format!("/orders/{}", order.order_number)).into_response()),
        Err(OrderError::Repository(e)) => Err(e.into()),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}
