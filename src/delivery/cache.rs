//! Distance cache keyed by `origin|destination`.
//!
//! Entries live for 24 hours and the map never holds more than
//! [`MAX_ENTRIES`]; the oldest timestamp goes first, insertion order breaking
//! ties. The map serializes to the same JSON shape the web client keeps in
//! local storage, so it can be persisted between restarts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;
pub const MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceCacheEntry {
    pub distance_km: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default)]
    pub using_fallback: bool,
    /// Insertion order; breaks ties between equal timestamps
    #[serde(default)]
    pub sequence: u64,
}

impl DistanceCacheEntry {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp >= CACHE_TTL_MS
    }
}

/// Build the cache key for a route. Both ends are trimmed and lowercased.
pub fn cache_key(origin: &str, destination: &str) -> String {
    format!(
        "{}|{}",
        origin.trim().to_lowercase(),
        destination.trim().to_lowercase()
    )
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceCache {
    entries: HashMap<String, DistanceCacheEntry>,
    #[serde(skip)]
    next_sequence: u64,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live entry. An expired entry is dropped and reported as a miss.
    pub fn get(&mut self, key: &str, now_ms: i64) -> Option<DistanceCacheEntry> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now_ms) => Some(entry.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or refresh an entry, then evict the oldest others past the cap.
    /// The entry just written is never the one evicted.
    pub fn insert(&mut self, key: String, distance_km: f64, using_fallback: bool, now_ms: i64) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.insert(
            key.clone(),
            DistanceCacheEntry {
                distance_km,
                timestamp: now_ms,
                using_fallback,
                sequence,
            },
        );
        self.evict_oldest(&key);
    }

    pub fn prune_expired(&mut self, now_ms: i64) {
        self.entries.retain(|_, entry| !entry.is_expired(now_ms));
    }

    fn evict_oldest(&mut self, keep: &str) {
        while self.entries.len() > MAX_ENTRIES {
            let oldest = self
                .entries
                .iter()
                .filter(|(key, _)| key.as_str() != keep)
                .min_by_key(|(_, entry)| (entry.timestamp, entry.sequence))
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut cache: Self = serde_json::from_str(raw)?;
        cache.next_sequence = cache
            .entries
            .values()
            .map(|entry| entry.sequence + 1)
            .max()
            .unwrap_or(0);
        Ok(cache)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
