//! Order, order line, and shipping tracking models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use omnimarket_core::{
    CurrencyCode, OrderId, OrderItemId, OrderNumber, OrderStatus, PaymentMethod, PaymentStatus,
    Price, ProductId, TrackingId, UserId,
};

/// A placed order.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub user_id: UserId,
    pub total: Decimal,
    pub currency: CurrencyCode,
    pub status: OrderStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub shipping_address: String,
    pub billing_address: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether the simulated payment has completed.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Formatted order total for templates.
    #[must_use]
    pub fn total_display(&self) -> String {
        Price::new(self.total, self.currency).display()
    }
}

/// A line item on an order.
///
/// `product_name` and `unit_price` are snapshots taken at order creation;
/// later catalog changes do not affect placed orders.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub currency: CurrencyCode,
}

impl OrderItem {
    /// Line total: snapshot unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Formatted line total for templates.
    #[must_use]
    pub fn line_total_display(&self) -> String {
        Price::new(self.line_total(), self.currency).display()
    }
}

/// Simulated shipment tracking, created when payment succeeds.
#[derive(Debug, Clone)]
pub struct ShippingTracking {
    pub id: TrackingId,
    pub order_id: OrderId,
    pub tracking_number: String,
    pub carrier: String,
    pub status: String,
    pub estimated_delivery: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_order_item_line_total() {
        let item = OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(3),
            product_name: "Perfume Oil".to_owned(),
            quantity: 3,
            unit_price: dec!(51.96),
            currency: CurrencyCode::PLN,
        };
        assert_eq!(item.line_total(), dec!(155.88));
        assert_eq!(item.line_total_display(), "155.88 zł");
    }
}
