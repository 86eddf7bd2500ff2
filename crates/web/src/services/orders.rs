//! Order service: placement, simulated payment, and fulfillment progress.
//!
//! Payment is a simulation: the form fields are shape-checked, nothing is
//! charged, and success immediately creates a shipment with a random
//! tracking number and a 2-5 day delivery estimate.

use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use tracing::info;

use omnimarket_core::{OrderNumber, OrderStatus, PaymentMethod};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::orders::{NewOrder, NewOrderItem, NewTracking, OrderRepository};
use crate::models::{Order, ShippingTracking, cart::cart_total};

/// Carriers assigned round-robin-by-chance to simulated shipments.
const CARRIERS: &[&str] = &["InPost", "DPD", "DHL", "Poczta Polska"];

/// Length of the random part of a tracking number.
const TRACKING_SUFFIX_LEN: usize = 10;

const TRACKING_PREFIX: &str = "TRK";

const TRACKING_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Delivery estimate bounds in days from payment.
const DELIVERY_MIN_DAYS: i64 = 2;
const DELIVERY_MAX_DAYS: i64 = 5;

/// Errors from order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Checkout attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Payment form failed the shape check.
    #[error("{0}")]
    InvalidPayment(String),

    /// Payment attempted on an already-paid order.
    #[error("order is already paid")]
    AlreadyPaid,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order placement and payment over the repositories.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the user's persisted cart.
    ///
    /// Snapshots the cart lines into order items, allocates the day's next
    /// order number, and empties the cart, all in one transaction.
    ///
    /// The number allocation reads the day's maximum and then inserts;
    /// two simultaneous checkouts can race and the loser gets a unique
    /// violation surfaced as `Repository(Conflict)`. Accepted for a demo
    /// shop; a retry from the client succeeds.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if the user has nothing in the cart.
    /// Returns `OrderError::Repository` if a database operation fails.
    pub async fn place_order(
        &self,
        user_id: omnimarket_core::UserId,
        shipping_address: &str,
        billing_address: &str,
    ) -> Result<Order, OrderError> {
        let lines = CartRepository::new(self.pool).lines_for_user(user_id).await?;
        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let currency = lines[0].currency;
        let total = cart_total(&lines);

        let orders = OrderRepository::new(self.pool);
        let today = Utc::now().date_naive();
        let prior = orders.max_order_number_for_day(today).await?;
        let order_number = OrderNumber::next_for_day(today, prior.as_ref());

        let items: Vec<NewOrderItem> = lines
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                currency: line.currency,
            })
            .collect();

        let order = orders
            .create(
                NewOrder {
                    order_number: &order_number,
                    user_id,
                    total,
                    currency,
                    shipping_address,
                    billing_address,
                },
                &items,
            )
            .await?;

        info!(order_number = %order.order_number, %user_id, "order placed");
        Ok(order)
    }

    /// Simulated card payment: shape-check the form, then mark paid and
    /// create the shipment.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AlreadyPaid` for a paid order and
    /// `OrderError::InvalidPayment` if a field fails the shape check.
    pub async fn pay_with_card(
        &self,
        order: &Order,
        card_number: &str,
        expiry: &str,
        cvv: &str,
    ) -> Result<ShippingTracking, OrderError> {
        if order.is_paid() {
            return Err(OrderError::AlreadyPaid);
        }
        validate_card_number(card_number)?;
        validate_expiry(expiry)?;
        validate_cvv(cvv)?;

        self.complete_payment(order, PaymentMethod::Card).await
    }

    /// Simulated BLIK payment: a 6-digit code always succeeds.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AlreadyPaid` for a paid order and
    /// `OrderError::InvalidPayment` if the code isn't 6 digits.
    pub async fn pay_with_blik(
        &self,
        order: &Order,
        code: &str,
    ) -> Result<ShippingTracking, OrderError> {
        if order.is_paid() {
            return Err(OrderError::AlreadyPaid);
        }
        validate_blik_code(code)?;

        self.complete_payment(order, PaymentMethod::Blik).await
    }

    async fn complete_payment(
        &self,
        order: &Order,
        method: PaymentMethod,
    ) -> Result<ShippingTracking, OrderError> {
        let (tracking_number, carrier, eta_days) = {
            let mut rng = rand::rng();
            let tracking_number = generate_tracking_number(&mut rng);
            let carrier = CARRIERS[rng.random_range(0..CARRIERS.len())];
            let eta_days = rng.random_range(DELIVERY_MIN_DAYS..=DELIVERY_MAX_DAYS);
            (tracking_number, carrier, eta_days)
        };
        let estimated_delivery = (Utc::now() + Duration::days(eta_days)).date_naive();

        let tracking = OrderRepository::new(self.pool)
            .mark_paid(
                order.id,
                method,
                NewTracking {
                    tracking_number: &tracking_number,
                    carrier,
                    estimated_delivery,
                },
            )
            .await?;

        info!(
            order_number = %order.order_number,
            method = %method,
            tracking_number = %tracking.tracking_number,
            "payment completed"
        );
        Ok(tracking)
    }

    /// Advance an order one fulfillment stage.
    ///
    /// A delivered order stays delivered. A status string that no longer
    /// parses was already normalized to the first stage on read, so it
    /// advances to the second.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the update fails.
    pub async fn advance_status(&self, order: &Order) -> Result<OrderStatus, OrderError> {
        let Some(next) = order.status.next() else {
            return Ok(order.status);
        };

        OrderRepository::new(self.pool)
            .update_status(order.id, next)
            .await?;
        Ok(next)
    }
}

/// Random tracking number: `TRK` plus 10 uppercase alphanumerics.
fn generate_tracking_number<R: Rng>(rng: &mut R) -> String {
    let suffix: String = (0..TRACKING_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..TRACKING_CHARSET.len());
            TRACKING_CHARSET[idx] as char
        })
        .collect();
    format!("{TRACKING_PREFIX}{suffix}")
}

/// Card numbers must be 16 digits; spaces between groups are allowed.
fn validate_card_number(input: &str) -> Result<(), OrderError> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(OrderError::InvalidPayment(
            "card number must be 16 digits".to_owned(),
        ));
    }
    Ok(())
}

/// Expiry must be `MM/YY` with a month between 01 and 12. The simulation
/// does not compare it against today's date.
fn validate_expiry(input: &str) -> Result<(), OrderError> {
    let bad = || OrderError::InvalidPayment("expiry must be MM/YY".to_owned());
    let (month, year) = input.split_once('/').ok_or_else(bad)?;
    if month.len() != 2 || year.len() != 2 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }
    match month.parse::<u8>() {
        Ok(1..=12) => Ok(()),
        _ => Err(bad()),
    }
}

/// CVV must be exactly 3 digits.
fn validate_cvv(input: &str) -> Result<(), OrderError> {
    if input.len() != 3 || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(OrderError::InvalidPayment("CVV must be 3 digits".to_owned()));
    }
    Ok(())
}

/// BLIK codes are exactly 6 digits.
fn validate_blik_code(input: &str) -> Result<(), OrderError> {
    if input.len() != 6 || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(OrderError::InvalidPayment(
            "BLIK code must be 6 digits".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_accepts_spaced_groups() {
        assert!(validate_card_number("4111 1111 1111 1111").is_ok());
        assert!(validate_card_number("4111111111111111").is_ok());
    }

    #[test]
    fn test_card_number_rejects_wrong_shape() {
        assert!(validate_card_number("4111").is_err());
        assert!(validate_card_number("4111 1111 1111 111a").is_err());
        assert!(validate_card_number("41111111111111112").is_err());
    }

    #[test]
    fn test_expiry_shape() {
        assert!(validate_expiry("01/27").is_ok());
        assert!(validate_expiry("12/30").is_ok());
        assert!(validate_expiry("13/27").is_err());
        assert!(validate_expiry("00/27").is_err());
        assert!(validate_expiry("1/27").is_err());
        assert!(validate_expiry("01/7").is_err());
        assert!(validate_expiry("01-27").is_err());
        assert!(validate_expiry("01/2x").is_err());
        assert!(validate_expiry("").is_err());
    }

    #[test]
    fn test_cvv_shape() {
        assert!(validate_cvv("123").is_ok());
        assert!(validate_cvv("12").is_err());
        assert!(validate_cvv("12a").is_err());
    }

    #[test]
    fn test_blik_code_shape() {
        assert!(validate_blik_code("123456").is_ok());
        assert!(validate_blik_code("12345").is_err());
        assert!(validate_blik_code("1234567").is_err());
        assert!(validate_blik_code("12345x").is_err());
    }

    #[test]
    fn test_tracking_number_shape() {
        let mut rng = rand::rng();
        let number = generate_tracking_number(&mut rng);
        assert!(number.starts_with("TRK"));
        assert_eq!(number.len(), 13);
        assert!(
            number[3..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}
