//! Package pricing engine.
//!
//! Turns raw cost inputs (seasonal land costs, live flight quotes, upstream
//! departure rates) into the canonical per-departure-date, per-origin-airport
//! sell-price ledger, and keeps that ledger consistent across the three
//! pricing modules, the CSV round trip and repeated departure syncs.

pub mod calculators;
pub mod csv;
pub mod models;
pub mod queries;
pub mod quotes;
pub mod reconcile;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compose, round_money};
pub use routes::router;
