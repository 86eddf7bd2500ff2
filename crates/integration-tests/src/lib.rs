//! Integration tests for OmniMarket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p omnimarket-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_lifecycle` - Order numbering and status progression
//! - `cart_flow` - Guest cart semantics and cart arithmetic
//! - `review_rules` - Review validation and rating aggregation
//!
//! The suites in `tests/` exercise the domain rules shared between the web
//! handlers and the CLI without requiring a running database or server.
