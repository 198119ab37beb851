//! Pricing engine for the tour package admin console.
//!
//! The authoring UI is a thin client over this service: seasons, departures
//! and the sell-price ledger live here, never in screen state.

pub mod cache;
pub mod db;
pub mod error;
pub mod flights;
pub mod inventory;
pub mod models;
pub mod pricing;

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::AppCache;
use crate::flights::QuoteSources;
use crate::inventory::InventoryFeedClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub quotes: Arc<QuoteSources>,
    pub inventory: Arc<InventoryFeedClient>,
    /// Bound on concurrent fare requests within one batch
    pub quote_concurrency: usize,
}
