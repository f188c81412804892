//! crates/fluentlog/src/error.rs
//! Error types raised while configuring loggers and building log chains.

/// Errors surfaced by logger construction and the fallible builder methods.
///
/// Construction-time variants abort [`LoggerBuilder::build`](crate::LoggerBuilder::build);
/// per-call variants abort only the chain that produced them.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A rate-limit parameter was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A time unit name was not recognised.
    #[error("unknown time unit '{0}'")]
    InvalidUnit(String),

    /// A configuration value was malformed.
    #[error("invalid logging configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
        /// Underlying parse failure, when the document was read from JSON.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Two configuration entries both claim the current environment.
    #[error("ambiguous logging configuration: entries '{first}' and '{second}' both match")]
    AmbiguousConfig {
        /// Key of the entry selected first.
        first: String,
        /// Key of the conflicting entry.
        second: String,
    },

    /// No configuration entry applies to the current environment.
    #[error("no logging configuration entry applies to the current environment")]
    ConfigResolutionFailed,
}

impl LogError {
    /// Creates an [`LogError::InvalidConfig`] without an underlying source.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for LogError {
    fn from(source: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: source.to_string(),
            source: Some(source),
        }
    }
}

/// Panic payload raised when a log chain configured with `throw` emits.
///
/// The throw path is a hard abort of the calling code: the payload is passed
/// to [`std::panic::panic_any`], so hosts that need to intercept it wrap the
/// call in [`std::panic::catch_unwind`] and downcast to this type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{line}")]
pub struct LoggedAssertionFailure {
    /// The formatted log line.
    pub line: String,
    /// Serialized extra data attached to the record, if any.
    pub data: Option<String>,
}

impl LoggedAssertionFailure {
    /// Extracts a failure from a caught panic payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Option<&Self> {
        payload.downcast_ref::<Self>()
    }
}
