//! Cart route handlers.
//!
//! Guests work against the session-held cart; logged-in users work against
//! their persisted cart rows. The handlers branch on the session user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use omnimarket_core::ProductId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CartLine, CurrentUser, cart::cart_total};
use crate::services::{CartService, load_guest_cart, save_guest_cart};
use crate::state::AppState;

/// Form data for cart mutations.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

/// Total units in whichever cart applies, for the header badge.
///
/// Failures degrade to zero; the badge is never worth a 500.
pub async fn header_cart_count(
    state: &AppState,
    session: &Session,
    user: Option<&CurrentUser>,
) -> u32 {
    let count = match user {
        Some(user) => CartService::new(state.pool())
            .unit_count_for_user(user.id)
            .await,
        None => load_guest_cart(session).await.map(|cart| cart.unit_count()),
    };
    count.unwrap_or(0)
}

/// Display the cart page.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<CartTemplate> {
    let service = CartService::new(state.pool());
    let lines = match &current_user {
        Some(user) => service
            .lines_for_user(user.id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?,
        None => {
            let guest = load_guest_cart(&session)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            service
                .lines_for_guest(&guest)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
        }
    };

    let total = cart_total(&lines);
    let cart_count = lines.iter().map(|line| line.quantity).sum();

    Ok(CartTemplate {
        current_user,
        cart_count,
        lines,
        total,
    })
}

/// Add a product to the cart; quantities sum with existing entries.
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<CartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);
    let quantity = form.quantity.max(1);

    let outcome = match &current_user {
        Some(user) => {
            CartService::new(state.pool())
                .add_for_user(user.id, product_id, quantity)
                .await
        }
        None => {
            match load_guest_cart(&session).await {
                Ok(mut cart) => {
                    cart.add(product_id, quantity);
                    save_guest_cart(&session, &cart).await
                }
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, "failed to add to cart");
        return Redirect::to("/cart?error=add_failed").into_response();
    }
    Redirect::to("/cart").into_response()
}

/// Set a product's quantity exactly; zero removes it.
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<CartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);

    let outcome = match &current_user {
        Some(user) => {
            CartService::new(state.pool())
                .set_for_user(user.id, product_id, form.quantity)
                .await
        }
        None => {
            match load_guest_cart(&session).await {
                Ok(mut cart) => {
                    cart.set(product_id, form.quantity);
                    save_guest_cart(&session, &cart).await
                }
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, "failed to update cart");
        return Redirect::to("/cart?error=update_failed").into_response();
    }
    Redirect::to("/cart").into_response()
}

/// Remove a product from the cart.
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<CartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);

    let outcome = match &current_user {
        Some(user) => {
            CartService::new(state.pool())
                .remove_for_user(user.id, product_id)
                .await
        }
        None => {
            match load_guest_cart(&session).await {
                Ok(mut cart) => {
                    cart.remove(product_id);
                    save_guest_cart(&session, &cart).await
                }
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, "failed to remove from cart");
        return Redirect::to("/cart?error=remove_failed").into_response();
    }
    Redirect::to("/cart").into_response()
}

/// Empty the cart.
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
) -> Response {
    let outcome = match &current_user {
        Some(user) => CartService::new(state.pool()).clear_for_user(user.id).await,
        None => save_guest_cart(&session, &crate::models::GuestCart::new()).await,
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, "failed to clear cart");
        return Redirect::to("/cart?error=clear_failed").into_response();
    }
    Redirect::to("/cart").into_response()
}

/// Merge the session's guest cart into the logged-in user's cart.
///
/// Login does this automatically; this endpoint covers a session that was
/// already authenticated in another tab when the guest cart was filled.
pub async fn transfer(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
) -> Response {
    let Some(user) = current_user else {
        return Redirect::to("/auth/login").into_response();
    };

    if let Err(e) = CartService::new(state.pool())
        .merge_guest_cart(&session, user.id)
        .await
    {
        tracing::error!(error = %e, "failed to transfer guest cart");
        return Redirect::to("/cart?error=transfer_failed").into_response();
    }
    Redirect::to("/cart").into_response()
}
