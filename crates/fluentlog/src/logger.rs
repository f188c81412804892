//! crates/fluentlog/src/logger.rs
//! Logger facade: owns the effective level, the call-site registry and the
//! collaborators every log chain goes through.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;

use crate::callsite::{
    CallSite, CallSiteKey, CallerIdentityProvider, LocationIdentity, module_name,
};
use crate::clock::{Clock, MonotonicClock};
use crate::config::{
    ConfigDocument, ConfigResolver, Environment, EnvironmentDescriptor, Resolution,
};
use crate::error::LogError;
use crate::item::LogItem;
use crate::levels::Level;
use crate::message::Message;
use crate::rate::RateState;
use crate::sink::{LogRecord, OutputSink, TracingSink};
use crate::stringify::{JsonStringify, Stringify};

static NEXT_LOGGER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`Logger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoggerId(u64);

impl LoggerId {
    fn next() -> Self {
        Self(NEXT_LOGGER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "logger-{}", self.0)
    }
}

/// Identity and rate state of one call site, shared by every item created there.
#[derive(Debug)]
pub(crate) struct CallSiteState {
    pub(crate) site: CallSite,
    pub(crate) rate: RateState,
}

struct Inner {
    id: LoggerId,
    name: Arc<str>,
    min_level: AtomicU8,
    auxiliary: AtomicBool,
    sites: DashMap<CallSiteKey, Arc<CallSiteState>>,
    sink: Arc<dyn OutputSink>,
    stringify: Arc<dyn Stringify>,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn CallerIdentityProvider>,
}

/// Named, leveled logger.
///
/// A logger is created once per logical module. It holds the effective
/// minimum level, resolved once at construction, and one [`RateState`] per
/// call site that has produced an active [`LogItem`]. Call-site state is never
/// evicted; memory grows with the number of distinct call sites.
///
/// Cloning is cheap and yields a handle to the same logger. Separate loggers
/// never share rate state, even for identical call sites.
///
/// # Examples
///
/// ```
/// use fluentlog::{Level, Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .name("inventory")
///     .min_level(Level::Info)
///     .sink(sink.clone())
///     .build()?;
///
/// logger.at_debug().log("hidden");
/// logger.at_info().log("slot 3 filled");
///
/// assert_eq!(sink.lines(), ["[inventory] Info: slot 3 filled"]);
/// # Ok::<(), fluentlog::LogError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Starts configuring a logger.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Creates a logger named `name` with default collaborators.
    ///
    /// The minimum level comes from the `FLUENTLOG_CONFIG` document when that
    /// variable is set, and is [`Level::Info`] otherwise.
    ///
    /// # Errors
    ///
    /// Fails when the environment's configuration cannot be parsed or
    /// resolved.
    pub fn new(name: impl Into<String>) -> Result<Self, LogError> {
        Self::builder().name(name).build()
    }

    /// Process-unique identifier.
    #[must_use]
    pub fn id(&self) -> LoggerId {
        self.inner.id
    }

    /// Logger name used as the line prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Effective minimum level.
    #[must_use]
    pub fn min_level(&self) -> Level {
        Level::from_ordinal(self.inner.min_level.load(Ordering::Acquire)).unwrap_or(Level::Info)
    }

    /// Replaces the effective minimum level.
    ///
    /// Items already created keep their variant: suppressed items stay
    /// suppressed, while active items re-check the level on every call.
    pub fn set_min_level(&self, level: Level) {
        let previous = self.inner.min_level.swap(level.ordinal(), Ordering::AcqRel);
        if previous != level.ordinal() {
            tracing::debug!(
                target: "fluentlog::logger",
                logger = %self.inner.name,
                level = %level,
                "minimum level changed"
            );
        }
    }

    /// Re-resolves `document` against `environment` and applies the result.
    ///
    /// On error the current level is left unchanged.
    ///
    /// # Errors
    ///
    /// Any error from [`ConfigResolver::resolve`].
    pub fn reconfigure(
        &self,
        document: &ConfigDocument,
        environment: &dyn EnvironmentDescriptor,
    ) -> Result<Resolution, LogError> {
        let resolution = ConfigResolver::new(environment).resolve(document)?;
        self.set_min_level(resolution.level);
        Ok(resolution)
    }

    /// Reports whether Info records are mirrored to the auxiliary channel.
    #[must_use]
    pub fn auxiliary_channel(&self) -> bool {
        self.inner.auxiliary.load(Ordering::Relaxed)
    }

    /// Switches mirroring of Info records to [`OutputSink::emit_auxiliary`].
    pub fn set_auxiliary_channel(&self, enabled: bool) {
        self.inner.auxiliary.store(enabled, Ordering::Relaxed);
    }

    /// Number of call sites holding rate state.
    #[must_use]
    pub fn call_site_count(&self) -> usize {
        self.inner.sites.len()
    }

    /// Creates a log item at `level` bound to the caller's call site.
    ///
    /// Below the minimum level the item is suppressed and no call-site state
    /// is created.
    #[track_caller]
    pub fn at(&self, level: Level) -> LogItem {
        let caller = Location::caller();
        if level < self.min_level() {
            return LogItem::suppressed(self.clone(), level, caller);
        }
        let site = self.call_site(caller);
        LogItem::active(self.clone(), level, caller, site)
    }

    /// Shorthand for `at(Level::Trace)`.
    #[track_caller]
    pub fn at_trace(&self) -> LogItem {
        self.at(Level::Trace)
    }

    /// Shorthand for `at(Level::Debug)`.
    #[track_caller]
    pub fn at_debug(&self) -> LogItem {
        self.at(Level::Debug)
    }

    /// Shorthand for `at(Level::Info)`.
    #[track_caller]
    pub fn at_info(&self) -> LogItem {
        self.at(Level::Info)
    }

    /// Shorthand for `at(Level::Warning)`.
    #[track_caller]
    pub fn at_warning(&self) -> LogItem {
        self.at(Level::Warning)
    }

    /// Shorthand for `at(Level::Error)`.
    #[track_caller]
    pub fn at_error(&self) -> LogItem {
        self.at(Level::Error)
    }

    /// Shorthand for `at(Level::Fatal)`.
    #[track_caller]
    pub fn at_fatal(&self) -> LogItem {
        self.at(Level::Fatal)
    }

    /// Passes `condition` through; panics with a
    /// [`LoggedAssertionFailure`](crate::LoggedAssertionFailure) logged at
    /// Error level when it is `false`.
    #[track_caller]
    pub fn assert(&self, condition: bool, message: impl Into<Message>) -> bool {
        if condition {
            return true;
        }
        self.at(Level::Error).assert(condition, message)
    }

    /// [`assert`](Self::assert) with structured `data` attached to the failure.
    #[track_caller]
    pub fn assert_with(&self, condition: bool, message: impl Into<Message>, data: Value) -> bool {
        if condition {
            return true;
        }
        self.at(Level::Error).assert_with(condition, message, data)
    }

    fn call_site(&self, caller: &'static Location<'static>) -> Arc<CallSiteState> {
        let site = self.identify(caller);
        if let Some(existing) = self.inner.sites.get(&site.key) {
            return Arc::clone(existing.value());
        }
        let state = self
            .inner
            .sites
            .entry(site.key.clone())
            .or_insert_with(|| {
                Arc::new(CallSiteState {
                    site,
                    rate: RateState::new(),
                })
            });
        Arc::clone(state.value())
    }

    pub(crate) fn identify(&self, caller: &'static Location<'static>) -> CallSite {
        self.inner.identity.identify(caller)
    }

    pub(crate) fn now(&self) -> Duration {
        self.inner.clock.now()
    }

    pub(crate) fn sink(&self) -> &dyn OutputSink {
        &*self.inner.sink
    }

    /// Resolves `message` and builds the record for a statement that passed
    /// its gates.
    pub(crate) fn record(
        &self,
        level: Level,
        site: &CallSite,
        message: Message,
        data: Option<Value>,
    ) -> LogRecord {
        let stringify = &*self.inner.stringify;
        let (message, data) = message.resolve(data, stringify);
        let data_text = data.as_ref().map(|value| stringify.encode(value));
        LogRecord {
            logger: Arc::clone(&self.inner.name),
            level,
            line: format_line(&self.inner.name, level, &message),
            message,
            location: site.location.clone(),
            module: site.module.clone(),
            data,
            data_text,
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("min_level", &self.min_level())
            .field("auxiliary_channel", &self.auxiliary_channel())
            .field("call_sites", &self.call_site_count())
            .finish_non_exhaustive()
    }
}

/// Renders the single line handed to sinks, e.g. `[net] Warning: link down`.
pub(crate) fn format_line(logger: &str, level: Level, message: &str) -> String {
    format!("[{logger}] {level}: {message}")
}

/// Configures and builds a [`Logger`].
///
/// Every knob is optional. Without a name, the logger is named after the
/// module that calls [`build`](Self::build). The minimum level is taken, in
/// order, from [`min_level`](Self::min_level), from [`config`](Self::config)
/// resolved against the [`environment`](Self::environment), from the
/// `FLUENTLOG_CONFIG` variable, and finally defaults to [`Level::Info`].
#[derive(Default)]
#[must_use]
pub struct LoggerBuilder {
    name: Option<String>,
    config: Option<ConfigDocument>,
    environment: Option<Arc<dyn EnvironmentDescriptor>>,
    min_level: Option<Level>,
    sink: Option<Arc<dyn OutputSink>>,
    stringify: Option<Arc<dyn Stringify>>,
    clock: Option<Arc<dyn Clock>>,
    identity: Option<Arc<dyn CallerIdentityProvider>>,
    auxiliary: bool,
}

impl LoggerBuilder {
    /// Sets the logger name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the configuration document resolved at build time.
    pub fn config(mut self, document: impl Into<ConfigDocument>) -> Self {
        self.config = Some(document.into());
        self
    }

    /// Sets the environment the document is resolved against.
    ///
    /// Defaults to [`Environment::from_env`].
    pub fn environment<E>(mut self, environment: E) -> Self
    where
        E: EnvironmentDescriptor + 'static,
    {
        self.environment = Some(Arc::new(environment));
        self
    }

    /// Fixes the minimum level, bypassing configuration resolution.
    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Sets the output sink. Defaults to [`TracingSink`].
    pub fn sink<S>(mut self, sink: S) -> Self
    where
        S: OutputSink + 'static,
    {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Sets the encoder for structured values. Defaults to compact
    /// [`JsonStringify`].
    pub fn stringify<S>(mut self, stringify: S) -> Self
    where
        S: Stringify + 'static,
    {
        self.stringify = Some(Arc::new(stringify));
        self
    }

    /// Sets the clock used by `at_most_every`. Defaults to [`MonotonicClock`].
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Sets the call-site identity provider. Defaults to [`LocationIdentity`].
    pub fn identity_provider<P>(mut self, provider: P) -> Self
    where
        P: CallerIdentityProvider + 'static,
    {
        self.identity = Some(Arc::new(provider));
        self
    }

    /// Mirrors Info records to the auxiliary channel from the start.
    pub fn auxiliary_channel(mut self, enabled: bool) -> Self {
        self.auxiliary = enabled;
        self
    }

    /// Resolves the minimum level and builds the logger.
    ///
    /// # Errors
    ///
    /// - [`LogError::InvalidConfig`] for a malformed document, level name or
    ///   environment variable.
    /// - [`LogError::AmbiguousConfig`] when two entries claim the environment.
    /// - [`LogError::ConfigResolutionFailed`] when no entry applies.
    #[track_caller]
    pub fn build(self) -> Result<Logger, LogError> {
        let caller = Location::caller();
        let name = self
            .name
            .unwrap_or_else(|| module_name(caller.file()));

        let min_level = match (self.min_level, self.config) {
            (Some(level), _) => level,
            (None, Some(document)) => resolve(&document, self.environment)?,
            (None, None) => match ConfigDocument::from_env()? {
                Some(document) => resolve(&document, self.environment)?,
                None => Level::Info,
            },
        };

        tracing::debug!(
            target: "fluentlog::logger",
            logger = %name,
            level = %min_level,
            "logger created"
        );

        Ok(Logger {
            inner: Arc::new(Inner {
                id: LoggerId::next(),
                name: Arc::from(name),
                min_level: AtomicU8::new(min_level.ordinal()),
                auxiliary: AtomicBool::new(self.auxiliary),
                sites: DashMap::new(),
                sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink::new())),
                stringify: self
                    .stringify
                    .unwrap_or_else(|| Arc::new(JsonStringify::compact())),
                clock: self
                    .clock
                    .unwrap_or_else(|| Arc::new(MonotonicClock::new())),
                identity: self
                    .identity
                    .unwrap_or_else(|| Arc::new(LocationIdentity)),
            }),
        })
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("environment", &self.environment)
            .field("min_level", &self.min_level)
            .field("auxiliary", &self.auxiliary)
            .finish_non_exhaustive()
    }
}

fn resolve(
    document: &ConfigDocument,
    environment: Option<Arc<dyn EnvironmentDescriptor>>,
) -> Result<Level, LogError> {
    let environment = match environment {
        Some(environment) => environment,
        None => Arc::new(Environment::from_env()?),
    };
    let resolution = ConfigResolver::new(&*environment).resolve(document)?;
    Ok(resolution.level)
}

/// Creates a [`Logger`] named after the calling module, or after the given
/// name.
///
/// Expands to a `Result<Logger, LogError>`.
///
/// ```
/// let logger = fluentlog::logger!()?;
/// assert_eq!(logger.name(), module_path!());
///
/// let named = fluentlog::logger!("matchmaking")?;
/// assert_eq!(named.name(), "matchmaking");
/// # Ok::<(), fluentlog::LogError>(())
/// ```
#[macro_export]
macro_rules! logger {
    () => {
        $crate::Logger::new(::core::module_path!())
    };
    ($name:expr) => {
        $crate::Logger::new($name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::{ConfigEntry, SidedEntry};
    use crate::sink::{Channel, MemorySink};

    fn memory_logger(sink: &MemorySink) -> Logger {
        Logger::builder()
            .name("core")
            .min_level(Level::Trace)
            .sink(sink.clone())
            .build()
            .expect("logger builds")
    }

    #[test]
    fn ids_are_unique() {
        let a = Logger::builder().min_level(Level::Info).build().expect("builds");
        let b = Logger::builder().min_level(Level::Info).build().expect("builds");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
        assert!(a.id().to_string().starts_with("logger-"));
    }

    #[test]
    fn unnamed_logger_uses_calling_module() {
        let logger = Logger::builder().min_level(Level::Info).build().expect("builds");
        assert_eq!(logger.name(), "logger");
    }

    #[test]
    fn explicit_min_level_beats_config() {
        let logger = Logger::builder()
            .config(ConfigDocument::level(Level::Error))
            .environment(Environment::client())
            .min_level(Level::Debug)
            .build()
            .expect("builds");
        assert_eq!(logger.min_level(), Level::Debug);
    }

    #[test]
    fn config_resolved_against_environment() {
        let document = ConfigDocument::entries()
            .with_entry("Studio", ConfigEntry::level(Level::Trace))
            .with_entry("Live", SidedEntry::new(Level::Warning, Level::Error).place_id(9).into());

        let in_editor = Logger::builder()
            .config(document.clone())
            .environment(Environment::server().in_editor())
            .build()
            .expect("builds");
        assert_eq!(in_editor.min_level(), Level::Trace);

        let live = Logger::builder()
            .config(document)
            .environment(Environment::client().with_place(9))
            .build()
            .expect("builds");
        assert_eq!(live.min_level(), Level::Error);
    }

    #[test]
    fn resolution_errors_abort_build() {
        let document = ConfigDocument::entries()
            .with_entry("Live", SidedEntry::new(Level::Warning, Level::Error).place_id(9).into());
        let err = Logger::builder()
            .config(document)
            .environment(Environment::client().with_place(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, LogError::ConfigResolutionFailed));
    }

    #[test]
    fn level_shorthands_bind_levels() {
        let sink = MemorySink::new();
        let logger = memory_logger(&sink);
        let levels: Vec<Level> = [
            logger.at_trace(),
            logger.at_debug(),
            logger.at_info(),
            logger.at_warning(),
            logger.at_error(),
            logger.at_fatal(),
        ]
        .iter()
        .map(LogItem::level)
        .collect();
        assert_eq!(levels, Level::ALL);
    }

    #[test]
    fn distinct_lines_are_distinct_call_sites() {
        let sink = MemorySink::new();
        let logger = memory_logger(&sink);
        logger.at_info().log("a");
        logger.at_info().log("b");
        assert_eq!(logger.call_site_count(), 2);

        for _ in 0..3 {
            logger.at_info().log("loop");
        }
        assert_eq!(logger.call_site_count(), 3);
    }

    #[test]
    fn separate_loggers_do_not_share_rate_state() {
        let sink = MemorySink::new();
        let first = memory_logger(&sink);
        let second = memory_logger(&sink);
        let every = std::num::NonZeroU32::new(10).expect("non-zero");
        for logger in [&first, &second] {
            logger.at_info().every(every).log("once each");
        }
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn set_min_level_suppresses_new_items() {
        let sink = MemorySink::new();
        let logger = memory_logger(&sink);
        logger.set_min_level(Level::Warning);
        assert_eq!(logger.min_level(), Level::Warning);
        assert!(logger.at_info().is_suppressed());
        assert!(!logger.at_warning().is_suppressed());
    }

    #[test]
    fn reconfigure_applies_or_keeps_level() {
        let logger = Logger::builder()
            .min_level(Level::Info)
            .build()
            .expect("builds");

        let resolution = logger
            .reconfigure(&ConfigDocument::level(Level::Fatal), &Environment::server())
            .expect("resolves");
        assert_eq!(resolution.level, Level::Fatal);
        assert_eq!(logger.min_level(), Level::Fatal);

        let result = logger.reconfigure(&ConfigDocument::entries(), &Environment::server());
        assert!(result.is_err());
        assert_eq!(logger.min_level(), Level::Fatal);
    }

    #[test]
    fn auxiliary_channel_mirrors_info() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .name("core")
            .sink(sink.clone())
            .min_level(Level::Info)
            .auxiliary_channel(true)
            .build()
            .expect("builds");
        assert!(logger.auxiliary_channel());

        logger.at_info().log("seen twice");
        logger.set_auxiliary_channel(false);
        logger.at_info().log("seen once");

        let channels: Vec<Channel> = sink.drain().into_iter().map(|e| e.channel).collect();
        assert_eq!(channels, [Channel::Info, Channel::Auxiliary, Channel::Info]);
    }

    #[test]
    fn logger_assert_passes_through() {
        let sink = MemorySink::new();
        let logger = memory_logger(&sink);
        assert!(logger.assert(true, "fine"));
        assert_eq!(logger.call_site_count(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn custom_clock_and_stringify_are_used() {
        let sink = MemorySink::new();
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(30));
        let logger = Logger::builder()
            .name("core")
            .min_level(Level::Info)
            .sink(sink.clone())
            .clock(clock.clone())
            .stringify(JsonStringify::pretty())
            .build()
            .expect("builds");
        assert_eq!(logger.now(), Duration::from_secs(30));

        logger.at_info().log(serde_json::json!({"a": 1}));
        assert_eq!(sink.lines(), ["[core] Info: {\n  \"a\": 1\n}"]);
    }

    #[test]
    fn format_line_layout() {
        assert_eq!(format_line("net", Level::Warning, "link down"), "[net] Warning: link down");
    }
}
