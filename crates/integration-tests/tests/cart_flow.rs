//! Integration tests for cart semantics.
//!
//! Covers the session-held guest cart (the shape stored in the session and
//! its merge-on-login arithmetic) and cart total calculation, without a
//! database or a running server.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use rust_decimal::dec;

use omnimarket_core::{CurrencyCode, ProductId};
use omnimarket_web::models::cart::{CartLine, GuestCart, cart_total};

fn line(id: i32, price: rust_decimal::Decimal, qty: u32) -> CartLine {
    CartLine {
        product_id: ProductId::new(id),
        product_name: format!("Product {id}"),
        image_url: None,
        unit_price: price,
        currency: CurrencyCode::PLN,
        quantity: qty,
    }
}

// =============================================================================
// Guest Cart Session Shape
// =============================================================================

#[test]
fn test_guest_cart_session_shape_is_a_string_keyed_map() {
    let mut cart = GuestCart::new();
    cart.add(ProductId::new(5), 2);

    // The session store serializes the cart as a plain {"id": qty} map.
    let json = serde_json::to_value(&cart).unwrap();
    let expected: HashMap<String, u32> = HashMap::from([("5".to_owned(), 2)]);
    assert_eq!(json, serde_json::to_value(expected).unwrap());
}

#[test]
fn test_guest_cart_survives_session_roundtrip() {
    let mut cart = GuestCart::new();
    cart.add(ProductId::new(1), 3);
    cart.add(ProductId::new(9), 1);

    let json = serde_json::to_string(&cart).unwrap();
    let restored: GuestCart = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, cart);
    assert_eq!(restored.unit_count(), 4);
}

#[test]
fn test_tampered_session_keys_are_dropped() {
    let json = r#"{"3": 2, "DROP TABLE": 1, "-x": 7}"#;
    let cart: GuestCart = serde_json::from_str(json).unwrap();
    let entries: Vec<_> = cart.entries().collect();
    assert_eq!(entries, vec![(ProductId::new(3), 2)]);
}

// =============================================================================
// Cart Mutations
// =============================================================================

#[test]
fn test_repeat_add_sums_quantities() {
    // Adding the same product twice sums, matching the database upsert used
    // for logged-in carts.
    let mut cart = GuestCart::new();
    cart.add(ProductId::new(4), 1);
    cart.add(ProductId::new(4), 2);
    assert_eq!(cart.quantity(ProductId::new(4)), Some(3));
}

#[test]
fn test_set_replaces_and_zero_removes() {
    let mut cart = GuestCart::new();
    cart.add(ProductId::new(4), 5);
    cart.set(ProductId::new(4), 2);
    assert_eq!(cart.quantity(ProductId::new(4)), Some(2));

    cart.set(ProductId::new(4), 0);
    assert_eq!(cart.quantity(ProductId::new(4)), None);
    assert!(cart.is_empty());
}

#[test]
fn test_clear_empties_the_cart() {
    let mut cart = GuestCart::new();
    cart.add(ProductId::new(1), 1);
    cart.add(ProductId::new(2), 2);
    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.unit_count(), 0);
}

// =============================================================================
// Merge-on-Login Arithmetic
// =============================================================================

/// The login merge sums the guest quantity into any existing user row.
/// This models the expected post-merge quantities for overlapping and
/// non-overlapping products.
#[test]
fn test_merge_sums_overlapping_products() {
    let mut guest = GuestCart::new();
    guest.add(ProductId::new(1), 2);
    guest.add(ProductId::new(2), 1);

    // User already has product 1 (qty 3) in their persisted cart.
    let mut user_cart: HashMap<ProductId, u32> = HashMap::from([(ProductId::new(1), 3)]);
    for (product_id, qty) in guest.entries() {
        *user_cart.entry(product_id).or_insert(0) += qty;
    }

    assert_eq!(user_cart[&ProductId::new(1)], 5);
    assert_eq!(user_cart[&ProductId::new(2)], 1);
}

// =============================================================================
// Cart Totals
// =============================================================================

#[test]
fn test_cart_total_sums_line_totals() {
    let lines = vec![
        line(1, dec!(2196.00), 1),
        line(2, dec!(51.96), 3),
        line(3, dec!(0.50), 2),
    ];
    assert_eq!(cart_total(&lines), dec!(2352.88));
}

#[test]
fn test_empty_cart_totals_zero() {
    assert_eq!(cart_total(&[]), dec!(0));
}

#[test]
fn test_line_display_uses_pln() {
    let l = line(7, dec!(51.96), 3);
    assert_eq!(l.unit_price_display(), "51.96 zł");
    assert_eq!(l.line_total_display(), "155.88 zł");
}
