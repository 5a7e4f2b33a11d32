//! In-memory response store with lazy, read-time expiry.

use bytes::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{CacheKey, CacheMetrics, CacheStats, Clock, SystemClock, TtlClass};
use crate::config::{Config, Environment};

/// Number of stores between opportunistic sweeps of expired entries.
const SWEEP_INTERVAL: usize = 64;

/// How long entries live, and whether caching happens at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub environment: Environment,
    pub content_ttl: Duration,
    pub static_ttl: Duration,
}

impl CachePolicy {
    pub fn new(environment: Environment, content_ttl: Duration, static_ttl: Duration) -> Self {
        Self {
            environment,
            content_ttl,
            static_ttl,
        }
    }

    pub fn ttl_for(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Content => self.content_ttl,
            TtlClass::Static => self.static_ttl,
        }
    }

    /// In development the cache neither stores nor serves anything.
    pub fn is_bypassed(&self) -> bool {
        self.environment == Environment::Development
    }
}

impl From<&Config> for CachePolicy {
    fn from(config: &Config) -> Self {
        Self::new(
            config.environment,
            config.cache_ttl_content,
            config.cache_ttl_static,
        )
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Bytes,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.ttl
    }

    fn remaining_at(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.created_at))
    }
}

/// A fresh payload and how long it stays fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    pub payload: Bytes,
    pub remaining: Duration,
}

/// Serialized responses keyed by resource, identifier and language.
///
/// Each process builds its own store at startup; it starts empty and is never
/// persisted. Lookups on unrelated keys proceed in parallel across shards, and
/// payloads are replaced whole, so a reader sees either the old or the new
/// response.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
    metrics: CacheMetrics,
    stores_since_sweep: AtomicUsize,
}

impl ResponseCache {
    /// Create an empty cache on the system clock.
    pub fn new(policy: CachePolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_clock(policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
            clock,
            metrics: CacheMetrics::new(),
            stores_since_sweep: AtomicUsize::new(0),
        }
    }

    /// Get the TTL and bypass policy this cache was built with.
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Whether every lookup misses and every store is dropped.
    pub fn is_bypassed(&self) -> bool {
        self.policy.is_bypassed()
    }

    /// Return the cached payload for `key` if it is still fresh.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<Bytes> {
        self.lookup(key).map(|hit| hit.payload)
    }

    /// Like [`get`](Self::get), but also reports the entry's remaining lifetime.
    pub fn lookup(&self, key: &CacheKey) -> Option<CacheHit> {
        if self.policy.is_bypassed() {
            self.metrics.record_bypass();
            return None;
        }

        let now = self.clock.now();
        let lookup = match self.entries.get(key) {
            Some(entry) if entry.is_fresh_at(now) => Some(CacheHit {
                payload: entry.payload.clone(),
                remaining: entry.remaining_at(now),
            }),
            Some(_) => None,
            None => {
                self.metrics.record_miss();
                return None;
            }
        };

        match lookup {
            Some(hit) => {
                self.metrics.record_hit();
                Some(hit)
            }
            None => {
                // Only remove the entry if a concurrent put has not refreshed it
                if self
                    .entries
                    .remove_if(key, |_, entry| !entry.is_fresh_at(now))
                    .is_some()
                {
                    self.metrics.record_expirations(1);
                    debug!(key = %key, "Evicted expired cache entry");
                }
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Store a payload under `key` with the TTL of `class`.
    pub fn put(&self, key: CacheKey, payload: Bytes, class: TtlClass) {
        if self.policy.is_bypassed() {
            return;
        }

        let entry = CacheEntry {
            payload,
            created_at: self.clock.now(),
            ttl: self.policy.ttl_for(class),
        };
        debug!(key = %key, ttl_secs = entry.ttl.as_secs(), "Caching response");
        self.entries.insert(key, entry);
        self.metrics.record_store();

        if self.stores_since_sweep.fetch_add(1, Ordering::Relaxed) + 1 >= SWEEP_INTERVAL {
            self.stores_since_sweep.store(0, Ordering::Relaxed);
            self.purge_expired();
        }
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let fresh = entry.is_fresh_at(now);
            if !fresh {
                removed += 1;
            }
            fresh
        });

        if removed > 0 {
            self.metrics.record_expirations(removed);
            debug!(removed, "Swept expired cache entries");
        }
        removed
    }

    /// Number of entries held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a snapshot of hit/miss counters and the current entry count.
    pub fn stats(&self) -> CacheStats {
        self.metrics.report(self.len())
    }
}
