//! Integration tests for order numbering and status progression.
//!
//! These tests verify the order lifecycle rules end to end without
//! requiring a database: number allocation across a day boundary, the
//! fixed fulfillment sequence, and the text forms stored in order rows.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use omnimarket_core::{OrderNumber, OrderStatus, PaymentMethod, PaymentStatus};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// Order Number Allocation
// =============================================================================

#[test]
fn test_first_order_of_a_day() {
    let n = OrderNumber::next_for_day(day(2026, 8, 28), None);
    assert_eq!(n.as_str(), "OM20260828-0001");
}

#[test]
fn test_sequential_allocation_within_a_day() {
    // Simulate a day's worth of allocations: each new number is derived from
    // the previous day maximum, exactly as the order service does it.
    let date = day(2026, 8, 28);
    let mut max: Option<OrderNumber> = None;
    for expected in 1..=12u32 {
        let n = OrderNumber::next_for_day(date, max.as_ref());
        assert_eq!(n.counter(), Some(expected));
        max = Some(n);
    }
    assert_eq!(max.unwrap().as_str(), "OM20260828-0012");
}

#[test]
fn test_counter_resets_across_days() {
    let friday_max = OrderNumber::parse("OM20260828-0057").unwrap();
    assert_eq!(
        OrderNumber::next_for_day(day(2026, 8, 28), Some(&friday_max)).as_str(),
        "OM20260828-0058"
    );

    // Saturday starts a fresh counter; Friday's maximum never matches the
    // Saturday day pattern, so the lookup returns no prior maximum.
    assert!(!friday_max
        .as_str()
        .starts_with(&OrderNumber::day_pattern(day(2026, 8, 29)).replace('%', "")));
    assert_eq!(
        OrderNumber::next_for_day(day(2026, 8, 29), None).as_str(),
        "OM20260829-0001"
    );
}

#[test]
fn test_day_pattern_matches_only_that_day() {
    let pattern = OrderNumber::day_pattern(day(2026, 8, 28));
    assert_eq!(pattern, "OM20260828-%");

    let prefix = pattern.trim_end_matches('%');
    assert!("OM20260828-0042".starts_with(prefix));
    assert!(!"OM20260829-0001".starts_with(prefix));
}

#[test]
fn test_order_number_roundtrip_through_url_path() {
    // Order detail routes parse the number back out of the path.
    let n = OrderNumber::from_parts(day(2026, 12, 31), 1000);
    let parsed = OrderNumber::parse(n.as_str()).unwrap();
    assert_eq!(parsed, n);
    assert_eq!(parsed.date(), Some(day(2026, 12, 31)));
    assert_eq!(parsed.counter(), Some(1000));
}

// =============================================================================
// Fulfillment Status Progression
// =============================================================================

#[test]
fn test_sequence_covers_every_stage_once() {
    assert_eq!(OrderStatus::SEQUENCE.len(), 5);
    for (i, status) in OrderStatus::SEQUENCE.iter().enumerate() {
        assert_eq!(status.stage_index(), i);
    }
}

#[test]
fn test_advancing_walks_the_full_sequence() {
    let mut status = OrderStatus::Confirmed;
    let mut steps = 0;
    while let Some(next) = status.next() {
        assert_eq!(next.stage_index(), status.stage_index() + 1);
        status = next;
        steps += 1;
    }
    assert_eq!(steps, 4);
    assert_eq!(status, OrderStatus::Delivered);
    assert!(status.is_terminal());
}

#[test]
fn test_terminal_stage_does_not_advance() {
    assert_eq!(OrderStatus::Delivered.next(), None);
}

#[test]
fn test_status_storage_forms() {
    // Stored snake_case text must parse back to the same stage.
    for status in OrderStatus::SEQUENCE {
        assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
    }
    assert_eq!(OrderStatus::OutForDelivery.as_str(), "out_for_delivery");
    assert_eq!(OrderStatus::OutForDelivery.label(), "Out for delivery");
}

// =============================================================================
// Payment State
// =============================================================================

#[test]
fn test_payment_status_storage_forms() {
    assert_eq!(PaymentStatus::Pending.as_str(), "pending");
    assert_eq!(PaymentStatus::Paid.as_str(), "paid");
    assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
}

#[test]
fn test_payment_method_storage_forms() {
    assert_eq!(PaymentMethod::Card.as_str(), "card");
    assert_eq!(PaymentMethod::Blik.as_str(), "blik");
    assert!("cash_on_delivery".parse::<PaymentMethod>().is_err());
}
