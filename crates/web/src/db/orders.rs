//! Order, order item, and shipping tracking repository.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use omnimarket_core::{
    CurrencyCode, OrderId, OrderItemId, OrderNumber, OrderStatus, PaymentMethod, PaymentStatus,
    ProductId, TrackingId, UserId,
};

use super::RepositoryError;
use crate::models::{Order, OrderItem, ShippingTracking};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    order_number: OrderNumber,
    user_id: UserId,
    total: Decimal,
    currency: String,
    status: String,
    payment_method: Option<String>,
    payment_status: String,
    shipping_address: String,
    billing_address: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let currency = self.currency.parse::<CurrencyCode>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;
        // An out-of-sequence status string is tolerated here and treated as
        // stage 0; the advance endpoint relies on this defensive default.
        let status = self
            .status
            .parse::<OrderStatus>()
            .unwrap_or(OrderStatus::Confirmed);
        let payment_status = self
            .payment_status
            .parse::<PaymentStatus>()
            .unwrap_or(PaymentStatus::Pending);
        let payment_method = self
            .payment_method
            .as_deref()
            .and_then(|m| m.parse::<PaymentMethod>().ok());

        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            total: self.total,
            currency,
            status,
            payment_method,
            payment_status,
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    currency: String,
}

impl OrderItemRow {
    fn into_item(self) -> Result<OrderItem, RepositoryError> {
        let currency = self.currency.parse::<CurrencyCode>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;
        Ok(OrderItem {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: u32::try_from(self.quantity).unwrap_or(0),
            unit_price: self.unit_price,
            currency,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrackingRow {
    id: TrackingId,
    order_id: OrderId,
    tracking_number: String,
    carrier: String,
    status: String,
    estimated_delivery: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<TrackingRow> for ShippingTracking {
    fn from(row: TrackingRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            tracking_number: row.tracking_number,
            carrier: row.carrier,
            status: row.status,
            estimated_delivery: row.estimated_delivery,
            created_at: row.created_at,
        }
    }
}

const SELECT_ORDER: &str = "SELECT id, order_number, user_id, total, currency, status, \
                            payment_method, payment_status, shipping_address, billing_address, \
                            created_at FROM market.orders";

/// Parameters for creating an order.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub order_number: &'a OrderNumber,
    pub user_id: UserId,
    pub total: Decimal,
    pub currency: CurrencyCode,
    pub shipping_address: &'a str,
    pub billing_address: &'a str,
}

/// A line item captured at order creation; the price is the snapshot.
#[derive(Debug)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub currency: CurrencyCode,
}

/// Parameters for the simulated shipment created on payment.
#[derive(Debug)]
pub struct NewTracking<'a> {
    pub tracking_number: &'a str,
    pub carrier: &'a str,
    pub estimated_delivery: NaiveDate,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The highest order number allocated on `date`, if any.
    ///
    /// Order numbers share a fixed-width format, so lexicographic `MAX` over
    /// the day's prefix is the numeric maximum.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn max_order_number_for_day(
        &self,
        date: NaiveDate,
    ) -> Result<Option<OrderNumber>, RepositoryError> {
        let row: Option<(OrderNumber,)> = sqlx::query_as(
            r"
            SELECT order_number FROM market.orders
            WHERE order_number LIKE $1
            ORDER BY order_number DESC
            LIMIT 1
            ",
        )
        .bind(OrderNumber::day_pattern(date))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(number,)| number))
    }

    /// Create an order with its line items and empty the user's cart, all in
    /// one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number was allocated
    /// concurrently (the known read-then-write race on the daily counter).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        order: NewOrder<'_>,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO market.orders
                (order_number, user_id, total, currency, status, payment_status,
                 shipping_address, billing_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, order_number, user_id, total, currency, status,
                      payment_method, payment_status, shipping_address,
                      billing_address, created_at
            ",
        )
        .bind(order.order_number)
        .bind(order.user_id)
        .bind(order.total)
        .bind(order.currency.code())
        .bind(OrderStatus::Confirmed.as_str())
        .bind(PaymentStatus::Pending.as_str())
        .bind(order.shipping_address)
        .bind(order.billing_address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO market.order_items
                    (order_id, product_id, product_name, quantity, unit_price, currency)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(row.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(i32::try_from(item.quantity).unwrap_or(i32::MAX))
            .bind(item.unit_price)
            .bind(item.currency.code())
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM market.cart_items WHERE user_id = $1")
            .bind(order.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        row.into_order()
    }

    /// Get an order by its order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_number(
        &self,
        number: &OrderNumber,
    ) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{SELECT_ORDER} WHERE order_number = $1"))
                .bind(number)
                .fetch_optional(self.pool)
                .await?;
        row.map(OrderRow::into_order).transpose()
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT id, order_id, product_id, product_name, quantity, unit_price, currency
            FROM market.order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        rows.into_iter().map(OrderItemRow::into_item).collect()
    }

    /// Set an order's fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE market.orders SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(order_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Mark an order paid and create its simulated shipment, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_paid(
        &self,
        order_id: OrderId,
        method: PaymentMethod,
        tracking: NewTracking<'_>,
    ) -> Result<ShippingTracking, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE market.orders
            SET payment_method = $1, payment_status = $2
            WHERE id = $3
            ",
        )
        .bind(method.as_str())
        .bind(PaymentStatus::Paid.as_str())
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let row: TrackingRow = sqlx::query_as(
            r"
            INSERT INTO market.shipping_tracking
                (order_id, tracking_number, carrier, status, estimated_delivery)
            VALUES ($1, $2, $3, 'registered', $4)
            RETURNING id, order_id, tracking_number, carrier, status,
                      estimated_delivery, created_at
            ",
        )
        .bind(order_id)
        .bind(tracking.tracking_number)
        .bind(tracking.carrier)
        .bind(tracking.estimated_delivery)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ShippingTracking::from(row))
    }

    /// The shipment for an order, if payment has completed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn tracking(
        &self,
        order_id: OrderId,
    ) -> Result<Option<ShippingTracking>, RepositoryError> {
        let row: Option<TrackingRow> = sqlx::query_as(
            r"
            SELECT id, order_id, tracking_number, carrier, status,
                   estimated_delivery, created_at
            FROM market.shipping_tracking
            WHERE order_id = $1
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ShippingTracking::from))
    }
}
