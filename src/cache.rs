//! In-memory caching using moka
//!
//! Application-level caching for package records and season lists. Both are
//! read on every pricing operation and mutate rarely, so short TTLs plus
//! explicit invalidation on edit keep reads cheap without staleness.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::Package;
use crate::pricing::models::Season;

/// Application cache holding packages and their season lists
#[derive(Clone)]
pub struct AppCache {
    /// Package records (package id -> Package)
    pub packages: Cache<Uuid, Arc<Package>>,
    /// Season lists (package id -> seasons, newest first)
    pub seasons: Cache<Uuid, Arc<Vec<Season>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Packages: 500 entries, 5 min TTL
            packages: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(5 * 60))
                .build(),

            // Season lists: 500 entries, 10 min TTL, invalidated on edit
            seasons: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            packages_size: self.packages.entry_count(),
            seasons_size: self.seasons.entry_count(),
        }
    }

    /// Invalidate everything cached for one package
    pub async fn invalidate_package(&self, package_id: Uuid) {
        self.packages.invalidate(&package_id).await;
        self.seasons.invalidate(&package_id).await;
        info!("Cache invalidated for package: {}", package_id);
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.packages.invalidate_all();
        self.seasons.invalidate_all();
        info!("All caches invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub packages_size: u64,
    pub seasons_size: u64,
}
