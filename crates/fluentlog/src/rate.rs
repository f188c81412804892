//! crates/fluentlog/src/rate.rs
//! Per-call-site counters behind the `every` and `at_most_every` gates.

use std::num::NonZeroU32;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Counters {
    invocations: u64,
    last_emit: Option<Duration>,
}

/// Mutable gating state owned by one logger for one call site.
///
/// All three operations lock the same mutex, so they are atomic with respect
/// to one another for a given call site while different call sites never
/// contend. [`RateState::admit`] evaluates a whole gate under a single lock.
#[derive(Debug, Default)]
pub struct RateState {
    counters: Mutex<Counters>,
}

impl RateState {
    /// Creates state with a zero invocation count and no recorded emit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` when the current invocation count is a multiple of `n`,
    /// then increments the count regardless of the outcome.
    ///
    /// The first attempt always passes, followed by every `n`-th attempt.
    pub fn check_and_increment_every(&self, n: NonZeroU32) -> bool {
        check_and_increment_every(&mut self.lock(), n)
    }

    /// Returns `true` when at least `min_interval` has elapsed since the last
    /// recorded emit. Never updates the timestamp.
    pub fn check_at_most_every(&self, now: Duration, min_interval: Duration) -> bool {
        check_at_most_every(&self.lock(), now, min_interval)
    }

    /// Records that a log statement was emitted at `now`.
    pub fn record_emit(&self, now: Duration) {
        self.lock().last_emit = Some(now);
    }

    /// Runs the active gates in order and records the emit when all pass.
    ///
    /// `every` is evaluated first and always advances the counter; a call it
    /// blocks leaves the timestamp untouched. A call blocked by
    /// `at_most_every` has still advanced the counter.
    pub fn admit(
        &self,
        every: Option<NonZeroU32>,
        at_most_every: Option<Duration>,
        now: Duration,
    ) -> bool {
        let mut counters = self.lock();
        if let Some(n) = every {
            if !check_and_increment_every(&mut counters, n) {
                return false;
            }
        }
        if let Some(interval) = at_most_every {
            if !check_at_most_every(&counters, now, interval) {
                return false;
            }
        }
        counters.last_emit = Some(now);
        true
    }

    /// Number of attempts counted by the `every` gate so far.
    #[must_use]
    pub fn invocation_count(&self) -> u64 {
        self.lock().invocations
    }

    /// Timestamp of the most recent emit, if any.
    #[must_use]
    pub fn last_emit(&self) -> Option<Duration> {
        self.lock().last_emit
    }
}

fn check_and_increment_every(counters: &mut Counters, n: NonZeroU32) -> bool {
    let proceed = counters.invocations % u64::from(n.get()) == 0;
    counters.invocations = counters.invocations.wrapping_add(1);
    proceed
}

fn check_at_most_every(counters: &Counters, now: Duration, min_interval: Duration) -> bool {
    counters
        .last_emit
        .is_none_or(|last| now.saturating_sub(last) >= min_interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).expect("non-zero value required")
    }

    #[test]
    fn every_passes_first_then_each_nth() {
        let state = RateState::new();
        let outcomes: Vec<bool> = (0..7).map(|_| state.check_and_increment_every(nz(3))).collect();
        assert_eq!(outcomes, [true, false, false, true, false, false, true]);
        assert_eq!(state.invocation_count(), 7);
    }

    #[test]
    fn every_one_always_passes() {
        let state = RateState::new();
        assert!((0..5).all(|_| state.check_and_increment_every(nz(1))));
    }

    #[test]
    fn at_most_every_does_not_touch_timestamp() {
        let state = RateState::new();
        assert!(state.check_at_most_every(Duration::from_secs(1), Duration::from_secs(5)));
        assert_eq!(state.last_emit(), None);

        state.record_emit(Duration::from_secs(1));
        assert!(!state.check_at_most_every(Duration::from_secs(3), Duration::from_secs(5)));
        assert!(state.check_at_most_every(Duration::from_secs(6), Duration::from_secs(5)));
        assert_eq!(state.last_emit(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn admit_without_gates_records_every_emit() {
        let state = RateState::new();
        assert!(state.admit(None, None, Duration::from_secs(2)));
        assert_eq!(state.last_emit(), Some(Duration::from_secs(2)));
        assert_eq!(state.invocation_count(), 0);
    }

    #[test]
    fn admit_blocked_by_every_keeps_timestamp() {
        let state = RateState::new();
        assert!(state.admit(Some(nz(2)), Some(Duration::ZERO), Duration::from_secs(1)));
        assert!(!state.admit(Some(nz(2)), Some(Duration::ZERO), Duration::from_secs(4)));
        assert_eq!(state.last_emit(), Some(Duration::from_secs(1)));
        assert_eq!(state.invocation_count(), 2);
    }

    #[test]
    fn admit_blocked_by_interval_still_counts() {
        let state = RateState::new();
        let interval = Some(Duration::from_secs(10));
        assert!(state.admit(Some(nz(1)), interval, Duration::from_secs(0)));
        assert!(!state.admit(Some(nz(1)), interval, Duration::from_secs(5)));
        assert_eq!(state.invocation_count(), 2);
        assert_eq!(state.last_emit(), Some(Duration::ZERO));
        assert!(state.admit(Some(nz(1)), interval, Duration::from_secs(10)));
    }

    #[test]
    fn zero_interval_never_throttles() {
        let state = RateState::new();
        for _ in 0..3 {
            assert!(state.admit(None, Some(Duration::ZERO), Duration::from_secs(1)));
        }
    }
}
