//! Time source for cache expiry.
//!
//! The store reads time only through [`Clock`], so expiry can be driven
//! deterministically in tests.

use std::fmt;
use std::time::Instant;

#[cfg(test)]
pub use manual::ManualClock;

/// Source of monotonic time for entry expiry.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod manual {
    use super::Clock;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{Duration, Instant};

    /// A clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        origin: Instant,
        offset_nanos: AtomicU64,
    }

    impl ManualClock {
        /// Create a clock frozen at the current instant.
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset_nanos: AtomicU64::new(0),
            }
        }

        /// Move the clock forward by `by`.
        pub fn advance(&self, by: Duration) {
            let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
            self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
        }
    }
}
