//! Integration tests for loggers shared across threads.
//!
//! Gating decisions for one call site must stay exact under contention, and
//! concurrent first use of a call site must never create two rate states.

use std::num::NonZeroU32;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use fluentlog::{Level, Logger, ManualClock, MemorySink};

const THREADS: usize = 8;
const ATTEMPTS_PER_THREAD: usize = 250;

fn shared_logger() -> (Logger, MemorySink, ManualClock) {
    let sink = MemorySink::new();
    let clock = ManualClock::new();
    let logger = Logger::builder()
        .name("shared")
        .min_level(Level::Info)
        .sink(sink.clone())
        .clock(clock.clone())
        .build()
        .expect("logger builds");
    (logger, sink, clock)
}

/// Runs `body` on [`THREADS`] threads released together.
fn race<F>(body: F)
where
    F: Fn(usize) + Send + Sync + 'static,
{
    let body = Arc::new(body);
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|index| {
            let body = Arc::clone(&body);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                body(index);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread completes");
    }
}

/// Verifies `every` counts attempts exactly across threads.
#[test]
fn every_is_exact_under_contention() {
    let (logger, sink, _) = shared_logger();
    let every = NonZeroU32::new(7).expect("non-zero");
    let item = logger.at_info().every(every);

    let worker = item.clone();
    race(move |_| {
        for _ in 0..ATTEMPTS_PER_THREAD {
            worker.log("tick");
        }
    });

    let total = THREADS * ATTEMPTS_PER_THREAD;
    assert_eq!(sink.len(), total.div_ceil(7));
    assert_eq!(
        item.rate_state().map(fluentlog::RateState::invocation_count),
        Some(total as u64)
    );
}

/// Verifies concurrent first use of one call site creates a single state.
#[test]
fn concurrent_registration_creates_one_state() {
    let (logger, sink, _) = shared_logger();
    let every = NonZeroU32::new(u32::MAX).expect("non-zero");

    let worker = logger.clone();
    race(move |_| {
        for _ in 0..ATTEMPTS_PER_THREAD {
            worker.at_info().every(every).log("once");
        }
    });

    assert_eq!(logger.call_site_count(), 1);
    assert_eq!(sink.len(), 1);
}

/// Verifies different call sites keep independent state under contention.
#[test]
fn distinct_call_sites_stay_independent() {
    let (logger, sink, _) = shared_logger();
    let every = NonZeroU32::new(u32::MAX).expect("non-zero");

    let worker = logger.clone();
    race(move |index| {
        for _ in 0..ATTEMPTS_PER_THREAD {
            if index % 2 == 0 {
                worker.at_info().every(every).log("even");
            } else {
                worker.at_warning().every(every).log("odd");
            }
        }
    });

    assert_eq!(logger.call_site_count(), 2);
    let mut lines = sink.lines();
    lines.sort();
    assert_eq!(lines, ["[shared] Info: even", "[shared] Warning: odd"]);
}

/// Verifies only one thread wins each interval window.
#[test]
fn interval_admits_one_emit_per_window() {
    let (logger, sink, clock) = shared_logger();
    let item = logger.at_info().at_most_every(Duration::from_secs(1));

    for window in 0..5 {
        let worker = item.clone();
        race(move |_| {
            for _ in 0..ATTEMPTS_PER_THREAD {
                worker.log("window");
            }
        });
        assert_eq!(sink.len(), window + 1);
        clock.advance(Duration::from_secs(1));
    }
}

/// Verifies level changes from another thread apply to new items.
#[test]
fn reconfiguration_is_visible_across_threads() {
    let (logger, sink, _) = shared_logger();
    let writer = logger.clone();
    thread::spawn(move || writer.set_min_level(Level::Error))
        .join()
        .expect("setter completes");

    assert!(logger.at_warning().is_suppressed());
    logger.at_error().log("visible");
    assert_eq!(sink.lines(), ["[shared] Error: visible"]);
}
