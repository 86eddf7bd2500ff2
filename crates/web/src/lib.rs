//! OmniMarket web application library.
//!
//! The shop's full HTTP surface as a library so the binary stays thin and
//! the CLI can reuse the pool, config, and catalog seeder.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
