//! Shared application models

pub mod airport;
pub mod package;

pub use airport::{airport_name, is_known_airport, UK_ORIGIN_AIRPORTS};
pub use package::{Package, PricingModule, QuoteSource};
