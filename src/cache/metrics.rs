//! Response cache statistics.
//!
//! Counters are owned by each cache instance, so independent caches (and
//! tests) never share numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Lookups answered from a fresh entry
    hits: AtomicUsize,

    /// Lookups with no usable entry (absent or expired)
    misses: AtomicUsize,

    /// Lookups skipped because caching is bypassed
    bypassed: AtomicUsize,

    /// Entries written
    stores: AtomicUsize,

    /// Stale entries removed, lazily or by a sweep
    expirations: AtomicUsize,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bypass(&self) {
        self.bypassed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store(&self) {
        self.stores.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expirations(&self, count: usize) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn bypassed(&self) -> usize {
        self.bypassed.load(Ordering::Relaxed)
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::Relaxed)
    }

    pub fn expirations(&self) -> usize {
        self.expirations.load(Ordering::Relaxed)
    }

    /// Snapshot the counters together with the current entry count.
    pub fn report(&self, entries: usize) -> CacheStats {
        let hits = self.hits();
        let misses = self.misses();
        let lookups = hits + misses;
        let hit_rate = if lookups > 0 {
            (hits as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            bypassed: self.bypassed(),
            stores: self.stores(),
            expirations: self.expirations(),
            entries,
            hit_rate,
        }
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub bypassed: usize,
    pub stores: usize,
    pub expirations: usize,

    /// Entries currently held (fresh or not yet swept)
    pub entries: usize,

    /// Hit rate as a percentage (0-100) over non-bypassed lookups
    pub hit_rate: f64,
}
