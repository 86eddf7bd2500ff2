//! Domain models for the shop.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod review;
pub mod user;

pub use cart::{CartLine, GuestCart};
pub use catalog::{Category, Product};
pub use order::{Order, OrderItem, ShippingTracking};
pub use review::Review;
pub use user::{CurrentUser, User};

/// Keys for values stored in the tower-sessions session.
pub mod session_keys {
    /// The logged-in user ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// The guest cart ([`super::GuestCart`]): product-id string -> quantity.
    pub const GUEST_CART: &str = "guest_cart";
}
