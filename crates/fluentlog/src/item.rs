//! crates/fluentlog/src/item.rs
//! Fluent log chains bound to one logger, level and call site.
//!
//! A [`LogItem`] is produced by [`Logger::at`] and its level shorthands. It is
//! one of two variants chosen when it is created:
//!
//! - *active*: the level met the logger's minimum. The item holds the call
//!   site's [`RateState`] and evaluates its gates on every `log` call.
//! - *suppressed*: the level was below the minimum. Every logging method
//!   returns immediately without touching rate state, resolving the message
//!   or reaching the sink. The variant never becomes active again.
//!
//! Modifiers consume and return the item so a chain reads left to right.
//! Terminal methods borrow it, so a configured item can be stored and reused;
//! each call is gated against the same call-site state.

use std::fmt;
use std::num::NonZeroU32;
use std::panic::{self, Location};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::callsite::CallSite;
use crate::error::{LogError, LoggedAssertionFailure};
use crate::levels::Level;
use crate::logger::{CallSiteState, Logger};
use crate::message::Message;
use crate::rate::RateState;
use crate::sink::{self, LogRecord};
use crate::time_unit::TimeUnit;

#[derive(Clone, Debug)]
enum State {
    Active(Active),
    Suppressed,
}

#[derive(Clone, Debug)]
struct Active {
    site: Arc<CallSiteState>,
    every: Option<NonZeroU32>,
    at_most_every: Option<Duration>,
    throw: bool,
}

/// A log statement under construction.
///
/// # Examples
///
/// ```
/// use fluentlog::{Logger, MemorySink};
/// use std::num::NonZeroU32;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder().name("net").sink(sink.clone()).build()?;
///
/// let every_other = logger.at_info().every(NonZeroU32::new(2).unwrap());
/// for attempt in 0..4 {
///     every_other.log(format!("attempt {attempt}"));
/// }
///
/// assert_eq!(sink.lines(), ["[net] Info: attempt 0", "[net] Info: attempt 2"]);
/// # Ok::<(), fluentlog::LogError>(())
/// ```
#[derive(Clone, Debug)]
#[must_use = "a log item does nothing until one of its logging methods is called"]
pub struct LogItem {
    logger: Logger,
    level: Level,
    caller: &'static Location<'static>,
    state: State,
}

impl LogItem {
    pub(crate) fn active(
        logger: Logger,
        level: Level,
        caller: &'static Location<'static>,
        site: Arc<CallSiteState>,
    ) -> Self {
        Self {
            logger,
            level,
            caller,
            state: State::Active(Active {
                site,
                every: None,
                at_most_every: None,
                throw: false,
            }),
        }
    }

    pub(crate) fn suppressed(
        logger: Logger,
        level: Level,
        caller: &'static Location<'static>,
    ) -> Self {
        Self {
            logger,
            level,
            caller,
            state: State::Suppressed,
        }
    }

    /// Level the item logs at.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Reports whether the item was created below the logger's minimum.
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        matches!(self.state, State::Suppressed)
    }

    /// Logger the item belongs to.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Call site the item is bound to. `None` for suppressed items.
    #[must_use]
    pub fn call_site(&self) -> Option<&CallSite> {
        match &self.state {
            State::Active(active) => Some(&active.site.site),
            State::Suppressed => None,
        }
    }

    /// Rate state shared by every item created at this call site. `None` for
    /// suppressed items.
    #[must_use]
    pub fn rate_state(&self) -> Option<&RateState> {
        match &self.state {
            State::Active(active) => Some(&active.site.rate),
            State::Suppressed => None,
        }
    }

    /// Emits only the first attempt and every `n`-th attempt after it.
    ///
    /// Calling this again replaces the previous value.
    pub fn every(mut self, n: NonZeroU32) -> Self {
        if let State::Active(active) = &mut self.state {
            active.every = Some(n);
        }
        self
    }

    /// Fallible form of [`every`](Self::every) for untyped input.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidArgument`] when `n` is zero.
    pub fn try_every(self, n: u32) -> Result<Self, LogError> {
        let n = NonZeroU32::new(n).ok_or_else(|| {
            LogError::InvalidArgument("every(n) requires a positive count".to_owned())
        })?;
        Ok(self.every(n))
    }

    /// Emits at most once per `interval` for this call site.
    ///
    /// Calling this again replaces the previous value.
    pub fn at_most_every(mut self, interval: Duration) -> Self {
        if let State::Active(active) = &mut self.state {
            active.at_most_every = Some(interval);
        }
        self
    }

    /// [`at_most_every`](Self::at_most_every) with the interval given as a
    /// quantity of `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidArgument`] when the quantity is negative,
    /// not finite, or too large to represent.
    pub fn at_most_every_in(self, quantity: f64, unit: TimeUnit) -> Result<Self, LogError> {
        let interval = unit.to_duration(quantity)?;
        Ok(self.at_most_every(interval))
    }

    /// [`at_most_every_in`](Self::at_most_every_in) with the unit given by name.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidUnit`] for an unknown unit name, otherwise
    /// the errors of [`at_most_every_in`](Self::at_most_every_in).
    pub fn at_most_every_named(self, quantity: f64, unit: &str) -> Result<Self, LogError> {
        let unit: TimeUnit = unit.parse()?;
        self.at_most_every_in(quantity, unit)
    }

    /// Turns emission into a [`LoggedAssertionFailure`] panic.
    ///
    /// The panic only happens when the statement passes every gate; a
    /// suppressed or throttled call still returns normally.
    pub fn throw(mut self) -> Self {
        if let State::Active(active) = &mut self.state {
            active.throw = true;
        }
        self
    }

    /// Logs `message`.
    pub fn log(&self, message: impl Into<Message>) {
        self.emit(|| (message.into(), None));
    }

    /// Logs `message` with structured `data` attached.
    ///
    /// `data` takes precedence over data produced by a deferred message.
    pub fn log_with(&self, message: impl Into<Message>, data: Value) {
        self.emit(|| (message.into(), Some(data)));
    }

    /// Logs the message built by `producer`, which only runs once the
    /// statement has passed the level check and every gate.
    pub fn log_lazy<F, M>(&self, producer: F)
    where
        F: FnOnce() -> (M, Option<Value>),
        M: Into<Message>,
    {
        self.emit(|| {
            let (message, data) = producer();
            (message.into(), data)
        });
    }

    /// Converts the configured chain into a plain logging function.
    pub fn wrap(self) -> impl Fn(Message) + Send + Sync + 'static {
        move |message| self.log(message)
    }

    /// Like [`wrap`](Self::wrap), but the returned function also forwards
    /// optional data to the record.
    pub fn wrap_with(self) -> impl Fn(Message, Option<Value>) + Send + Sync + 'static {
        move |message, data| self.emit(|| (message, data))
    }

    /// Passes `condition` through, logging `message` at Error level and
    /// panicking with [`LoggedAssertionFailure`] when it is `false`.
    ///
    /// A failed assertion always raises: the item's level, the logger's
    /// minimum and any rate gates are ignored.
    pub fn assert(&self, condition: bool, message: impl Into<Message>) -> bool {
        if !condition {
            self.fail(message.into(), None);
        }
        condition
    }

    /// [`assert`](Self::assert) with structured `data` attached to the failure.
    pub fn assert_with(&self, condition: bool, message: impl Into<Message>, data: Value) -> bool {
        if !condition {
            self.fail(message.into(), Some(data));
        }
        condition
    }

    /// Unwraps `value`, failing as [`assert`](Self::assert) does when it is `None`.
    pub fn assert_some<T>(&self, value: Option<T>, message: impl Into<Message>) -> T {
        match value {
            Some(value) => value,
            None => self.fail(message.into(), None),
        }
    }

    /// Unwraps `result`, failing as [`assert`](Self::assert) does on `Err`.
    ///
    /// The error's display text is attached as the failure's data.
    pub fn assert_ok<T, E>(&self, result: Result<T, E>, message: impl Into<Message>) -> T
    where
        E: fmt::Display,
    {
        match result {
            Ok(value) => value,
            Err(error) => self.fail(message.into(), Some(Value::String(error.to_string()))),
        }
    }

    fn emit<F>(&self, build: F)
    where
        F: FnOnce() -> (Message, Option<Value>),
    {
        let State::Active(active) = &self.state else {
            return;
        };
        let logger = &self.logger;
        // A stored item follows later changes to the logger's minimum.
        if self.level < logger.min_level() {
            return;
        }
        let now = logger.now();
        if !active.site.rate.admit(active.every, active.at_most_every, now) {
            return;
        }

        let (message, data) = build();
        let record = logger.record(self.level, &active.site.site, message, data);
        if active.throw {
            raise(record);
        }
        sink::dispatch(logger.sink(), &record, logger.auxiliary_channel());
    }

    fn fail(&self, message: Message, data: Option<Value>) -> ! {
        let record = match &self.state {
            State::Active(active) => {
                self.logger
                    .record(Level::Error, &active.site.site, message, data)
            }
            State::Suppressed => {
                let site = self.logger.identify(self.caller);
                self.logger.record(Level::Error, &site, message, data)
            }
        };
        raise(record)
    }
}

fn raise(record: LogRecord) -> ! {
    panic::panic_any(LoggedAssertionFailure {
        line: record.line,
        data: record.data_text,
    })
}
