//! Cart models: persisted cart lines and the session-held guest cart.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use omnimarket_core::{CurrencyCode, Price, ProductId};

/// A cart line joined with its product, for display and checkout.
///
/// For logged-in users these come from `cart_item` rows; for guests they are
/// resolved from the session-held [`GuestCart`].
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub image_url: Option<String>,
    pub unit_price: Decimal,
    pub currency: CurrencyCode,
    pub quantity: u32,
}

impl CartLine {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Formatted unit price for templates.
    #[must_use]
    pub fn unit_price_display(&self) -> String {
        Price::new(self.unit_price, self.currency).display()
    }

    /// Formatted line total for templates.
    #[must_use]
    pub fn line_total_display(&self) -> String {
        Price::new(self.line_total(), self.currency).display()
    }
}

/// Sum of line totals over a cart.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// The guest cart: a product-id-string -> quantity mapping serialized into
/// the session cookie store, never persisted as rows.
///
/// Keys stay strings to match the session shape the cart was designed
/// around; they are parsed into [`ProductId`]s when the cart is resolved
/// against the catalog or merged into a user cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct GuestCart(HashMap<String, u32>);

impl GuestCart {
    /// An empty guest cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product, summing with any existing entry.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        *self.0.entry(product_id.to_string()).or_insert(0) += quantity;
    }

    /// Set a product's quantity exactly; zero removes the entry.
    pub fn set(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.0.remove(&product_id.to_string());
        } else {
            self.0.insert(product_id.to_string(), quantity);
        }
    }

    /// Remove a product entirely.
    pub fn remove(&mut self, product_id: ProductId) {
        self.0.remove(&product_id.to_string());
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Quantity held for a product, if any.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> Option<u32> {
        self.0.get(&product_id.to_string()).copied()
    }

    /// Total number of units across all products.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.0.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries as (product id, quantity) pairs, skipping keys that do not
    /// parse as product ids (a tampered or stale session).
    pub fn entries(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.0
            .iter()
            .filter_map(|(key, &qty)| Some((ProductId::new(key.parse().ok()?), qty)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_guest_cart_add_sums_duplicates() {
        let mut cart = GuestCart::new();
        cart.add(ProductId::new(5), 2);
        cart.add(ProductId::new(5), 3);
        assert_eq!(cart.quantity(ProductId::new(5)), Some(5));
        assert_eq!(cart.entries().count(), 1);
    }

    #[test]
    fn test_guest_cart_set_zero_removes() {
        let mut cart = GuestCart::new();
        cart.add(ProductId::new(2), 4);
        cart.set(ProductId::new(2), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_guest_cart_skips_unparsable_keys() {
        let json = r#"{"5": 2, "not-a-number": 9}"#;
        let cart: GuestCart = serde_json::from_str(json).unwrap();
        let entries: Vec<_> = cart.entries().collect();
        assert_eq!(entries, vec![(ProductId::new(5), 2)]);
    }

    #[test]
    fn test_guest_cart_serde_shape() {
        let mut cart = GuestCart::new();
        cart.add(ProductId::new(7), 1);
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"{"7":1}"#);
    }

    #[test]
    fn test_cart_total() {
        let line = |price, qty| CartLine {
            product_id: ProductId::new(1),
            product_name: "x".to_owned(),
            image_url: None,
            unit_price: price,
            currency: CurrencyCode::PLN,
            quantity: qty,
        };
        let lines = vec![line(dec!(10.50), 2), line(dec!(5.00), 1)];
        assert_eq!(cart_total(&lines), dec!(26.00));
        assert_eq!(lines[0].line_total_display(), "21.00 zł");
    }
}
