//! Response cache for resolved, serialized content.
//!
//! - `key`: cache keys (resource, identifier, language) and TTL classes
//! - `store`: the concurrent store with lazy expiry and development bypass
//! - `clock`: injectable time source
//! - `metrics`: per-instance hit/miss statistics

mod clock;
mod key;
mod metrics;
mod store;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use key::{CacheKey, TtlClass};
pub use metrics::{CacheMetrics, CacheStats};
pub use store::{CacheHit, CachePolicy, ResponseCache};
