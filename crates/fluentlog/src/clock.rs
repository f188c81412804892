//! crates/fluentlog/src/clock.rs
//! Monotonic time sources used by the `at_most_every` gate.

use std::fmt;
use std::time::{Duration, Instant};

/// Source of monotonic timestamps, measured from an arbitrary fixed origin.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// [`Instant`]-backed clock whose origin is the moment it was created.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(any(test, feature = "test-support"))]
mod manual {
    use super::Clock;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    /// Clock that only moves when told to.
    ///
    /// Clones share the same underlying time, so a test can keep one handle
    /// and pass another to a logger.
    #[derive(Clone, Debug, Default)]
    pub struct ManualClock {
        nanos: Arc<AtomicU64>,
    }

    impl ManualClock {
        /// Creates a clock reading zero.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Moves the clock forward by `by`.
        pub fn advance(&self, by: Duration) {
            let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
            self.nanos.fetch_add(nanos, Ordering::SeqCst);
        }

        /// Sets the clock to `at`.
        pub fn set(&self, at: Duration) {
            let nanos = u64::try_from(at.as_nanos()).unwrap_or(u64::MAX);
            self.nanos.store(nanos, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub use manual::ManualClock;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(1500));
        assert_eq!(clock.now(), Duration::from_millis(1500));
        clock.set(Duration::from_secs(10));
        assert_eq!(handle.now(), Duration::from_secs(10));
    }
}
