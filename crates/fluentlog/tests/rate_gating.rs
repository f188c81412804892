//! Integration tests for the `every` and `at_most_every` gates.
//!
//! These tests drive a logger with a [`ManualClock`] and observe emission
//! through a [`MemorySink`], checking the counting and spacing rules of each
//! gate on its own and in combination.

use std::num::NonZeroU32;
use std::time::Duration;

use fluentlog::{Clock, Level, LogItem, Logger, ManualClock, MemorySink, TimeUnit};
use proptest::prelude::*;

fn fixture() -> (Logger, MemorySink, ManualClock) {
    let sink = MemorySink::new();
    let clock = ManualClock::new();
    let logger = Logger::builder()
        .name("gate")
        .min_level(Level::Trace)
        .sink(sink.clone())
        .clock(clock.clone())
        .build()
        .expect("logger builds");
    (logger, sink, clock)
}

fn nz(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).expect("non-zero value required")
}

/// Logs once and reports whether the sink received a record.
fn emitted(item: &LogItem, sink: &MemorySink) -> bool {
    let before = sink.len();
    item.log("tick");
    sink.len() > before
}

// ============================================================================
// Every
// ============================================================================

/// Verifies the first attempt always emits.
#[test]
fn every_first_attempt_emits() {
    for n in [1, 2, 7, 1000] {
        let (logger, sink, _) = fixture();
        let item = logger.at_info().every(nz(n));
        assert!(emitted(&item, &sink), "every({n}) must emit the first call");
    }
}

/// Verifies the emitted attempts are exactly the multiples of `n`.
#[test]
fn every_emits_multiples_of_n() {
    let (logger, sink, _) = fixture();
    let item = logger.at_info().every(nz(4));
    let pattern: Vec<usize> = (0..13).filter(|_| emitted(&item, &sink)).collect();
    assert_eq!(pattern, [0, 4, 8, 12]);
}

/// Verifies the fallible form rejects zero before any state is touched.
#[test]
fn try_every_zero_is_invalid_argument() {
    let (logger, sink, _) = fixture();
    let result = logger.at_info().try_every(0);
    assert!(matches!(result, Err(fluentlog::LogError::InvalidArgument(_))));
    assert!(sink.is_empty());
}

proptest! {
    /// Across k attempts exactly ceil(k / n) emit.
    #[test]
    fn every_emits_ceil_k_over_n(n in 1u32..25, k in 0usize..200) {
        let (logger, sink, _) = fixture();
        let item = logger.at_info().every(nz(n));
        for _ in 0..k {
            item.log("tick");
        }
        prop_assert_eq!(sink.len(), k.div_ceil(n as usize));
        prop_assert_eq!(
            item.rate_state().map(fluentlog::RateState::invocation_count),
            Some(k as u64)
        );
    }
}

// ============================================================================
// AtMostEvery
// ============================================================================

/// Verifies a call inside the interval neither emits nor restarts it.
#[test]
fn blocked_call_does_not_reset_clock() {
    let (logger, sink, clock) = fixture();
    let item = logger.at_info().at_most_every(Duration::from_secs(10));

    assert!(emitted(&item, &sink));
    clock.advance(Duration::from_secs(9));
    assert!(!emitted(&item, &sink));
    clock.advance(Duration::from_secs(1));
    assert!(emitted(&item, &sink));
    assert_eq!(
        item.rate_state().and_then(fluentlog::RateState::last_emit),
        Some(Duration::from_secs(10))
    );
}

/// Verifies named units convert before gating.
#[test]
fn named_units_gate_by_seconds() {
    let (logger, sink, clock) = fixture();
    let item = logger
        .at_info()
        .at_most_every_named(1.0, "minute")
        .expect("known unit");

    assert!(emitted(&item, &sink));
    clock.advance(Duration::from_secs(59));
    assert!(!emitted(&item, &sink));
    clock.advance(Duration::from_secs(1));
    assert!(emitted(&item, &sink));
}

/// Verifies sub-second intervals from the millisecond unit.
#[test]
fn millisecond_intervals() {
    let (logger, sink, clock) = fixture();
    let item = logger
        .at_info()
        .at_most_every_in(250.0, TimeUnit::Milliseconds)
        .expect("valid interval");

    let mut emits = 0;
    for _ in 0..10 {
        if emitted(&item, &sink) {
            emits += 1;
        }
        clock.advance(Duration::from_millis(100));
    }
    // Emits at 0, 300, 600 and 900 ms.
    assert_eq!(emits, 4);
}

proptest! {
    /// Any two emits are at least the interval apart.
    #[test]
    fn emits_are_spaced_by_interval(
        interval_ms in 0u64..500,
        steps in prop::collection::vec(0u64..300, 1..60),
    ) {
        let (logger, sink, clock) = fixture();
        let interval = Duration::from_millis(interval_ms);
        let item = logger.at_info().at_most_every(interval);

        let mut emit_times = Vec::new();
        for step in steps {
            clock.advance(Duration::from_millis(step));
            let now = clock.now();
            if emitted(&item, &sink) {
                emit_times.push(now);
            }
        }

        prop_assert!(!emit_times.is_empty());
        for pair in emit_times.windows(2) {
            prop_assert!(pair[1] - pair[0] >= interval);
        }
    }
}

// ============================================================================
// Combined gates
// ============================================================================

/// Verifies the counter advances even when the interval blocks the call.
#[test]
fn every_counter_advances_when_interval_blocks() {
    let (logger, sink, clock) = fixture();
    let item = logger
        .at_info()
        .every(nz(2))
        .at_most_every(Duration::from_secs(5));
    let rate = || item.rate_state().expect("active item");

    // Attempt 0: both gates pass.
    assert!(emitted(&item, &sink));
    // Attempt 1: blocked by every.
    clock.advance(Duration::from_secs(10));
    assert!(!emitted(&item, &sink));
    assert_eq!(rate().last_emit(), Some(Duration::ZERO));
    // Attempt 2: both gates pass ten seconds later.
    assert!(emitted(&item, &sink));
    assert_eq!(rate().last_emit(), Some(Duration::from_secs(10)));
    // Attempt 3: blocked by every; attempt 4: every passes, interval blocks.
    clock.advance(Duration::from_secs(1));
    assert!(!emitted(&item, &sink));
    assert!(!emitted(&item, &sink));
    assert_eq!(rate().invocation_count(), 5);
    assert_eq!(rate().last_emit(), Some(Duration::from_secs(10)));
    // Attempt 5 is odd, so every blocks again even though the interval passed.
    clock.advance(Duration::from_secs(10));
    assert!(!emitted(&item, &sink));
    // Attempt 6 passes both.
    assert!(emitted(&item, &sink));
    assert_eq!(rate().invocation_count(), 7);
}

/// Verifies chains started at one call site share its gates.
#[test]
fn gates_persist_across_chains_at_one_call_site() {
    let (logger, sink, _) = fixture();
    for _ in 0..6 {
        logger.at_info().every(nz(3)).log("shared");
    }
    assert_eq!(sink.len(), 2);
    assert_eq!(logger.call_site_count(), 1);
}

proptest! {
    /// A call emits exactly when both gates would pass on their own.
    #[test]
    fn combined_gate_is_conjunction(
        n in 1u32..6,
        interval_ms in 0u64..200,
        steps in prop::collection::vec(0u64..120, 1..80),
    ) {
        let (logger, sink, clock) = fixture();
        let interval = Duration::from_millis(interval_ms);
        let item = logger.at_info().every(nz(n)).at_most_every(interval);

        let mut attempts = 0u64;
        let mut last_emit: Option<Duration> = None;
        for step in steps {
            clock.advance(Duration::from_millis(step));
            let now = clock.now();
            let every_passes = attempts % u64::from(n) == 0;
            let interval_passes = last_emit.is_none_or(|last| now - last >= interval);
            let expected = every_passes && interval_passes;
            attempts += 1;
            if expected {
                last_emit = Some(now);
            }
            prop_assert_eq!(emitted(&item, &sink), expected);
        }
    }
}

// ============================================================================
// Suppression
// ============================================================================

/// Verifies suppressed items never touch the sink, the clock or rate state.
#[test]
fn suppressed_levels_skip_everything() {
    let (logger, sink, _) = fixture();
    logger.set_min_level(Level::Error);
    for level in [Level::Trace, Level::Debug, Level::Info, Level::Warning] {
        let item = logger.at(level).every(nz(1)).at_most_every(Duration::ZERO);
        assert!(item.is_suppressed());
        for _ in 0..3 {
            item.log("hidden");
        }
        assert!(item.rate_state().is_none());
    }
    assert!(sink.is_empty());
    assert_eq!(logger.call_site_count(), 0);
}
