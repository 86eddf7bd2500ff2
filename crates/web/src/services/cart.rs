//! Cart service: session-held guest carts and their merge into user carts.
//!
//! Guests keep their cart in the session as a product-id -> quantity map.
//! Logged-in users keep theirs as database rows. On login the guest cart is
//! merged into the rows (quantities summed) and the session map cleared.

use sqlx::PgPool;
use tower_sessions::Session;
use tracing::debug;

use omnimarket_core::{ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::products::ProductRepository;
use crate::models::{CartLine, GuestCart, session_keys};

/// Errors from cart operations.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Read the guest cart from the session, defaulting to empty.
///
/// # Errors
///
/// Returns `CartError::Session` if the session store fails.
pub async fn load_guest_cart(session: &Session) -> Result<GuestCart, CartError> {
    Ok(session
        .get::<GuestCart>(session_keys::GUEST_CART)
        .await?
        .unwrap_or_default())
}

/// Write the guest cart back to the session; an empty cart removes the key.
///
/// # Errors
///
/// Returns `CartError::Session` if the session store fails.
pub async fn save_guest_cart(session: &Session, cart: &GuestCart) -> Result<(), CartError> {
    if cart.is_empty() {
        session.remove::<GuestCart>(session_keys::GUEST_CART).await?;
    } else {
        session.insert(session_keys::GUEST_CART, cart).await?;
    }
    Ok(())
}

/// Cart operations over the database rows and session map.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the guest cart against the catalog into displayable lines.
    ///
    /// Entries whose product no longer exists are silently dropped; the
    /// session may outlive a reseed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a catalog lookup fails.
    pub async fn lines_for_guest(&self, cart: &GuestCart) -> Result<Vec<CartLine>, CartError> {
        let products = ProductRepository::new(self.pool);
        let mut lines = Vec::new();
        for (product_id, quantity) in cart.entries() {
            if let Some(product) = products.get(product_id).await? {
                lines.push(CartLine {
                    product_id: product.id,
                    product_name: product.name,
                    image_url: product.image_url,
                    unit_price: product.price,
                    currency: product.currency,
                    quantity,
                });
            }
        }
        lines.sort_by_key(|line| line.product_id);
        Ok(lines)
    }

    /// The user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, CartError> {
        Ok(CartRepository::new(self.pool).lines_for_user(user_id).await?)
    }

    /// Add a quantity of a product to the user's cart, summing with any
    /// existing row.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the upsert fails.
    pub async fn add_for_user(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        Ok(CartRepository::new(self.pool)
            .add(user_id, product_id, quantity)
            .await?)
    }

    /// Set a product's quantity in the user's cart; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the write fails.
    pub async fn set_for_user(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        Ok(CartRepository::new(self.pool)
            .set_quantity(user_id, product_id, quantity)
            .await?)
    }

    /// Remove a product from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the delete fails.
    pub async fn remove_for_user(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        Ok(CartRepository::new(self.pool).remove(user_id, product_id).await?)
    }

    /// Empty the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the delete fails.
    pub async fn clear_for_user(&self, user_id: UserId) -> Result<(), CartError> {
        Ok(CartRepository::new(self.pool).clear(user_id).await?)
    }

    /// Total units in the user's cart (header badge).
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn unit_count_for_user(&self, user_id: UserId) -> Result<u32, CartError> {
        Ok(CartRepository::new(self.pool).unit_count(user_id).await?)
    }

    /// Merge the session's guest cart into the user's persisted cart and
    /// clear the session map.
    ///
    /// Each guest entry goes through the summing upsert, so an item present
    /// in both carts ends up with the combined quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if an upsert fails; the session map is
    /// only cleared after every row landed.
    pub async fn merge_guest_cart(
        &self,
        session: &Session,
        user_id: UserId,
    ) -> Result<(), CartError> {
        let guest = load_guest_cart(session).await?;
        if guest.is_empty() {
            return Ok(());
        }

        let cart = CartRepository::new(self.pool);
        let mut merged = 0usize;
        for (product_id, quantity) in guest.entries() {
            cart.add(user_id, product_id, quantity).await?;
            merged += 1;
        }
        debug!(%user_id, merged, "merged guest cart into user cart");

        save_guest_cart(session, &GuestCart::new()).await
    }
}
