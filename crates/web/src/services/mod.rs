//! Business logic services for the shop.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService, load_guest_cart, save_guest_cart};
pub use catalog::{CatalogSeeder, SeedError};
pub use orders::{OrderError, OrderService};
