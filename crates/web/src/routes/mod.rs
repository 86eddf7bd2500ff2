//! HTTP route handlers for the shop.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (featured products)
//! GET  /search                  - Product search (?q=...&category=...)
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! # Catalog
//! GET  /products/{id}           - Product detail with reviews
//! GET  /categories/{slug}       - Category listing
//! GET  /api/products            - Product listing as JSON
//!
//! # Reviews (requires auth)
//! POST /products/{id}/reviews   - Add a review
//! POST /reviews/{id}/edit       - Edit own review
//! POST /reviews/{id}/delete     - Delete own review
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action (merges guest cart)
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//!
//! # Cart (guest via session, user via rows)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add product
//! POST /cart/update             - Set quantity (0 removes)
//! POST /cart/remove             - Remove product
//! POST /cart/clear              - Empty the cart
//! POST /cart/transfer           - Merge guest cart into user cart
//!
//! # Checkout & orders (requires auth)
//! GET  /checkout                - Checkout page
//! POST /orders                  - Place order from cart
//! GET  /orders/{number}/pay     - Payment method page
//! POST /orders/{number}/pay/card - Simulated card payment
//! POST /orders/{number}/pay/blik - Simulated BLIK payment
//! GET  /orders/{number}         - Order detail and tracking
//! POST /orders/{number}/advance - Advance fulfillment one stage
//!
//! # Account (requires auth)
//! GET  /account                 - Account overview
//! GET  /account/orders          - Order history
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod health;
pub mod home;
pub mod orders;
pub mod products;
pub mod reviews;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/transfer", post(cart::transfer))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place))
        .route("/{number}", get(orders::show))
        .route("/{number}/pay", get(orders::pay_page))
        .route("/{number}/pay/card", post(orders::pay_card))
        .route("/{number}/pay/blik", post(orders::pay_blik))
        .route("/{number}/advance", post(orders::advance))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders", get(account::orders))
}

/// Create all routes for the shop.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home and search
        .route("/", get(home::home))
        .route("/search", get(home::search))
        // Catalog
        .route("/products/{id}", get(products::show))
        .route("/products/{id}/reviews", post(reviews::create))
        .route("/reviews/{id}/edit", post(reviews::edit))
        .route("/reviews/{id}/delete", post(reviews::delete))
        .route("/categories/{slug}", get(categories::show))
        // JSON API
        .route("/api/products", get(api::products))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout and orders
        .route("/checkout", get(orders::checkout_page))
        .nest("/orders", order_routes())
        // Account
        .nest("/account", account_routes())
        // Auth
        .nest("/auth", auth_routes())
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
}
