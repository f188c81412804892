//! crates/fluentlog/src/levels.rs
//! Ordered severity levels and their name/ordinal tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LogError;

/// Severity of a log statement.
///
/// Levels are totally ordered by their ordinal; a logger suppresses every
/// statement whose level is strictly below its effective minimum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Fine-grained tracing output.
    Trace = 0,
    /// Developer diagnostics.
    Debug = 1,
    /// Routine informational messages.
    Info = 2,
    /// Something unexpected that the program recovered from.
    Warning = 3,
    /// A failed operation.
    Error = 4,
    /// A failure the program cannot continue past.
    Fatal = 5,
}

/// Canonical level names indexed by ordinal.
pub const LEVEL_NAMES: [&str; 6] = ["Trace", "Debug", "Info", "Warning", "Error", "Fatal"];

impl Level {
    /// Every level in ascending order.
    pub const ALL: [Self; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Fatal,
    ];

    /// Returns the stable ordinal of the level.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Returns the level for `ordinal`, if one is defined.
    #[must_use]
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Trace),
            1 => Some(Self::Debug),
            2 => Some(Self::Info),
            3 => Some(Self::Warning),
            4 => Some(Self::Error),
            5 => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Returns the canonical name of the level.
    #[must_use]
    pub const fn name(self) -> &'static str {
        LEVEL_NAMES[self as usize]
    }

    /// Looks up a level by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Reports whether records at this level go to the warning/error channels.
    #[must_use]
    pub const fn is_warning_or_above(self) -> bool {
        self as u8 >= Self::Warning as u8
    }
}

/// Returns the canonical name for `ordinal`.
#[must_use]
pub fn name_of(ordinal: u8) -> Option<&'static str> {
    Level::from_ordinal(ordinal).map(Level::name)
}

/// Returns the ordinal for a case-insensitive level `name`.
#[must_use]
pub fn ordinal_of(name: &str) -> Option<u8> {
    Level::from_name(name).map(Level::ordinal)
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| LogError::invalid_config(format!("unknown level name '{s}'")))
    }
}

impl TryFrom<u8> for Level {
    type Error = LogError;

    fn try_from(ordinal: u8) -> Result<Self, LogError> {
        Self::from_ordinal(ordinal)
            .ok_or_else(|| {
                LogError::InvalidArgument(format!("level ordinal {ordinal} is out of range"))
            })
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.ordinal()
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown level name '{name}'")))
    }
}
