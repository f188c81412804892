//! crates/fluentlog/src/time_unit.rs
//! Duration units accepted by `at_most_every` and their conversion to seconds.
//!
//! Months and years are fixed approximations (30 and 365 days); nothing here
//! is calendar aware.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::LogError;

/// Unit for a throttling interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// One thousandth of a second.
    Milliseconds,
    /// One second.
    Seconds,
    /// 60 seconds.
    Minutes,
    /// 3600 seconds.
    Hours,
    /// 86 400 seconds.
    Days,
    /// 604 800 seconds.
    Weeks,
    /// 30 days.
    Months,
    /// 365 days.
    Years,
}

impl TimeUnit {
    /// Every unit, shortest first.
    pub const ALL: [Self; 8] = [
        Self::Milliseconds,
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Months,
        Self::Years,
    ];

    /// Number of seconds in one unit.
    #[must_use]
    pub const fn seconds_multiplier(self) -> f64 {
        match self {
            Self::Milliseconds => 0.001,
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3_600.0,
            Self::Days => 86_400.0,
            Self::Weeks => 604_800.0,
            Self::Months => 2_592_000.0,
            Self::Years => 31_536_000.0,
        }
    }

    /// Canonical lowercase plural name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Milliseconds => "milliseconds",
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    /// Converts `quantity` of this unit into a [`Duration`].
    ///
    /// Negative, NaN, infinite, or unrepresentable quantities are rejected
    /// with [`LogError::InvalidArgument`].
    pub fn to_duration(self, quantity: f64) -> Result<Duration, LogError> {
        let seconds = to_seconds(quantity, self);
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(LogError::InvalidArgument(format!(
                "interval of {quantity} {} is not a non-negative finite duration",
                self.name()
            )));
        }
        Duration::try_from_secs_f64(seconds).map_err(|_| {
            LogError::InvalidArgument(format!(
                "interval of {quantity} {} is too large",
                self.name()
            ))
        })
    }
}

/// Converts `quantity` expressed in `unit` into seconds.
#[must_use]
pub fn to_seconds(quantity: f64, unit: TimeUnit) -> f64 {
    quantity * unit.seconds_multiplier()
}

/// Converts `quantity` expressed in the unit called `unit` into seconds.
///
/// Fails with [`LogError::InvalidUnit`] when the unit name is not recognised.
pub fn to_seconds_named(quantity: f64, unit: &str) -> Result<f64, LogError> {
    unit.parse::<TimeUnit>()
        .map(|unit| to_seconds(quantity, unit))
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "msec" | "millisecond" | "milliseconds" => Self::Milliseconds,
            "s" | "sec" | "secs" | "second" | "seconds" => Self::Seconds,
            "m" | "min" | "mins" | "minute" | "minutes" => Self::Minutes,
            "h" | "hr" | "hrs" | "hour" | "hours" => Self::Hours,
            "d" | "day" | "days" => Self::Days,
            "w" | "wk" | "wks" | "week" | "weeks" => Self::Weeks,
            "mo" | "month" | "months" => Self::Months,
            "y" | "yr" | "yrs" | "year" | "years" => Self::Years,
            _ => return Err(LogError::InvalidUnit(s.to_owned())),
        };
        Ok(unit)
    }
}
