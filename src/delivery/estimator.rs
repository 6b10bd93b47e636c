//! Delivery estimator: cache, Distance Matrix lookup, suburb fallback.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::places::GoogleMapsClient;

use super::cache::{cache_key, DistanceCache};
use super::fallback::fallback_distance;
use super::DeliveryEstimate;

pub struct DeliveryEstimator {
    maps: Arc<GoogleMapsClient>,
    origin: String,
    cache: Mutex<DistanceCache>,
    persist_path: Option<PathBuf>,
    /// Serializes cache file writes
    persist_lock: tokio::sync::Mutex<()>,
}

impl DeliveryEstimator {
    pub fn new(maps: Arc<GoogleMapsClient>, origin: impl Into<String>) -> Self {
        Self {
            maps,
            origin: origin.into(),
            cache: Mutex::new(DistanceCache::new()),
            persist_path: None,
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Build an estimator that keeps its cache in a JSON file.
    ///
    /// A missing or unreadable file starts an empty cache.
    pub async fn with_persistence(
        maps: Arc<GoogleMapsClient>,
        origin: impl Into<String>,
        path: PathBuf,
    ) -> Self {
        let mut cache = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => DistanceCache::from_json(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "discarding unreadable distance cache");
                DistanceCache::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DistanceCache::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read distance cache");
                DistanceCache::new()
            }
        };
        cache.prune_expired(Utc::now().timestamp_millis());
        info!(path = %path.display(), entries = cache.len(), "distance cache loaded");

        Self {
            maps,
            origin: origin.into(),
            cache: Mutex::new(cache),
            persist_path: Some(path),
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    /// Estimate distance and fee for a delivery address.
    ///
    /// Never fails: an empty address yields a zeroed estimate carrying an
    /// error, and every lookup failure falls back to the suburb heuristic.
    pub async fn estimate(&self, address: &str, api_key: Option<&str>) -> DeliveryEstimate {
        let destination = address.trim();
        if destination.is_empty() {
            return DeliveryEstimate::invalid("Delivery address is required");
        }

        let key = cache_key(&self.origin, destination);
        let now_ms = Utc::now().timestamp_millis();

        let cached = self.lock_cache().get(&key, now_ms);
        if let Some(entry) = cached {
            debug!(key = %key, distance_km = entry.distance_km, "distance cache HIT");
            return DeliveryEstimate::resolved(entry.distance_km, entry.using_fallback);
        }
        debug!(key = %key, "distance cache MISS");

        let (distance_km, using_fallback) = self.resolve_distance(destination, api_key).await;

        self.lock_cache()
            .insert(key, distance_km, using_fallback, Utc::now().timestamp_millis());
        self.persist().await;

        DeliveryEstimate::resolved(distance_km, using_fallback)
    }

    async fn resolve_distance(&self, destination: &str, api_key: Option<&str>) -> (f64, bool) {
        let Some(api_key) = api_key.filter(|k| !k.is_empty()) else {
            warn!(destination, "no maps API key, using suburb fallback distance");
            return (Self::fallback(destination), true);
        };

        let lookup = self
            .maps
            .distance_matrix(&self.origin, destination, api_key)
            .await;
        match lookup {
            Ok(drive) => (drive.distance_km(), false),
            Err(e) => {
                warn!(destination, error = %e, "distance lookup failed, using suburb fallback");
                (Self::fallback(destination), true)
            }
        }
    }

    fn fallback(destination: &str) -> f64 {
        fallback_distance(destination, &mut rand::rng())
    }

    /// Rewrite the cache file through a temp file and rename, one writer at a
    /// time.
    async fn persist(&self) {
        let Some(path) = &self.persist_path else {
            return;
        };

        let _guard = self.persist_lock.lock().await;
        // snapshot under the write lock
        let snapshot = self.lock_cache().to_json();
        let result = match snapshot {
            Ok(json) => write_atomic(path, json).await,
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "failed to persist distance cache");
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, DistanceCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn write_atomic(path: &Path, contents: String) -> Result<(), String> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| e.to_string())?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| e.to_string())
}
