//! In-memory caching using moka
//!
//! Address suggestions and place details are cached so a visitor typing an
//! address does not pay for the same Places call twice.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::places::{PlaceDetails, PlacePrediction};

/// Application cache for Places lookups
#[derive(Clone)]
pub struct AppCache {
    /// Autocomplete (region + normalized input -> predictions)
    pub autocomplete: Cache<String, Arc<Vec<PlacePrediction>>>,
    /// Place details (place_id -> details)
    pub place_details: Cache<String, Arc<PlaceDetails>>,
}

impl AppCache {
    /// Build both caches with their capacity and expiry settings
    pub fn new() -> Self {
        Self {
            // Suggestions: 500 entries, 10 min TTL
            autocomplete: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Place details: 500 entries, 1 hour TTL, 30 min idle
            place_details: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(60 * 60))
                .time_to_idle(Duration::from_secs(30 * 60))
                .build(),
        }
    }

    /// Entry counts, reported by `/health`
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            autocomplete_size: self.autocomplete.entry_count(),
            place_details_size: self.place_details.entry_count(),
        }
    }

    /// Generate cache key for an autocomplete query
    pub fn autocomplete_key(region: &str, input: &str) -> String {
        format!("{}:{}", region, input.trim().to_lowercase())
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub autocomplete_size: u64,
    pub place_details_size: u64,
}
