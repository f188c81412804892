#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `fluentlog` is a fluent, leveled logging library. Each [`Logger`] owns an
//! effective minimum [`Level`], resolved once from an environment-matched
//! [`ConfigDocument`], and hands out [`LogItem`] chains that carry per-call
//! modifiers:
//!
//! - [`every`](LogItem::every) emits the first attempt and every `n`-th after it;
//! - [`at_most_every`](LogItem::at_most_every) spaces emits by a minimum interval;
//! - [`throw`](LogItem::throw) turns emission into a [`LoggedAssertionFailure`]
//!   panic.
//!
//! Gating state lives per call site: every chain started from the same source
//! line of the same logger shares one [`RateState`].
//!
//! # Design
//!
//! - Call sites are located with `#[track_caller]` and mapped to keys by an
//!   injected [`CallerIdentityProvider`].
//! - Records that pass every gate are formatted as `[logger] Level: message`
//!   and routed to an [`OutputSink`] by severity. The default sink forwards to
//!   `tracing`; [`WriterSink`] and [`MemorySink`] cover streams and tests.
//! - Structured messages and attached data are encoded by a [`Stringify`]
//!   collaborator, [`JsonStringify`] by default.
//! - Time comes from a [`Clock`], so interval gates can be driven manually in
//!   tests (`ManualClock`, behind the `test-support` feature).
//!
//! # Invariants
//!
//! - A chain created below the minimum level is suppressed: it never formats,
//!   never touches rate state and never reaches the sink.
//! - The `every` counter advances on every attempt that reaches the gates,
//!   including attempts later blocked by `at_most_every`. The emit timestamp
//!   moves only when every gate passes.
//! - Configuration resolution yields exactly one level or fails; a logger is
//!   never built from an ambiguous document.
//!
//! # Errors
//!
//! Construction and fallible modifiers return [`LogError`]. Throwing chains and
//! failed assertions panic with a [`LoggedAssertionFailure`] payload.
//!
//! # Examples
//!
//! ```
//! use fluentlog::{ConfigDocument, Environment, Level, Logger, MemorySink, TimeUnit};
//!
//! let document = ConfigDocument::from_json_str(
//!     r#"{ "Studio": "Debug", "Default": "Warning" }"#,
//! )?;
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .name("match")
//!     .config(document)
//!     .environment(Environment::server())
//!     .sink(sink.clone())
//!     .build()?;
//! assert_eq!(logger.min_level(), Level::Warning);
//!
//! let heartbeat = logger.at_warning().at_most_every_in(5.0, TimeUnit::Seconds)?;
//! heartbeat.log("lagging");
//! heartbeat.log("still lagging");
//!
//! assert_eq!(sink.lines(), ["[match] Warning: lagging"]);
//! # Ok::<(), fluentlog::LogError>(())
//! ```

mod callsite;
mod clock;
mod config;
mod error;
mod item;
mod levels;
mod line_mode;
mod logger;
mod message;
mod rate;
mod sink;
mod stringify;
mod time_unit;
mod tracing_bridge;

pub use callsite::{CallSite, CallSiteKey, CallerIdentityProvider, LocationIdentity};
#[cfg(any(test, feature = "test-support"))]
pub use clock::ManualClock;
pub use clock::{Clock, MonotonicClock};
pub use config::{
    CONFIG_ENV, ConfigDocument, ConfigEntry, ConfigResolver, ConfigWarning, EDITOR_KEY,
    Environment, EnvironmentDescriptor, FilterKind, Resolution, ResolutionSource, SidedEntry,
};
pub use error::{LogError, LoggedAssertionFailure};
pub use item::LogItem;
pub use levels::{LEVEL_NAMES, Level, name_of, ordinal_of};
pub use line_mode::LineMode;
pub use logger::{Logger, LoggerBuilder, LoggerId};
pub use message::Message;
pub use rate::RateState;
pub use sink::{Channel, LogRecord, MemorySink, OutputSink, SinkEvent, TracingSink, WriterSink};
pub use stringify::{JsonStringify, Stringify};
pub use time_unit::{TimeUnit, to_seconds, to_seconds_named};
pub use tracing_bridge::{
    DEFAULT_FILTER, LOG_FILTER_ENV, env_filter, init_tracing, init_tracing_with_filter,
};
