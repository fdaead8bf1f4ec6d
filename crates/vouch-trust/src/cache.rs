//! Process-local TTL cache for derived analyses.
//!
//! Ring enumeration and recursive reputation are the expensive paths, so
//! callers serving repeated queries keep results here briefly and clear
//! the cache on every write. The engine itself never touches this type:
//! recomputation from the same snapshot is deterministic, so invalidation
//! only ever affects latency, never correctness.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default time-to-live for cached entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Default bound on cached entries.
pub const DEFAULT_MAX_ITEMS: usize = 2048;

/// A bounded key -> value cache with per-entry expiry.
///
/// Thread-safe behind an internal mutex; clones of values go in and out,
/// the cache never hands out references.
#[derive(Debug)]
pub struct AnalysisCache<V> {
    ttl: Duration,
    max_items: usize,
    entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> AnalysisCache<V> {
    /// Create a cache with the default TTL and size bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL. A zero TTL disables caching.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            max_items: DEFAULT_MAX_ITEMS,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a live entry, dropping it if expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some((expires_at, value)) if *expires_at > Instant::now() => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert a value under the configured TTL.
    ///
    /// At capacity, the soonest-expiring entry is evicted first.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if entries.len() >= self.max_items {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, (expires_at, _))| *expires_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(key.into(), (Instant::now() + self.ttl, value));
    }

    /// Drop every cached entry. Call after any write to the claim set.
    pub fn invalidate_all(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of entries currently held, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for AnalysisCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
