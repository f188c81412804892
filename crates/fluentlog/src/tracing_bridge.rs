//! crates/fluentlog/src/tracing_bridge.rs
//! Subscriber setup for hosts that rely on the default [`TracingSink`].
//!
//! Loggers built without an explicit sink emit `tracing` events under the
//! `fluentlog` target. Nothing is printed until a subscriber is installed;
//! these helpers install a formatting subscriber filtered by an
//! [`EnvFilter`].
//!
//! # Usage
//!
//! ```rust,ignore
//! fluentlog::init_tracing()?;
//!
//! let logger = fluentlog::logger!()?;
//! logger.at_warning().log("disk nearly full");
//! ```
//!
//! [`TracingSink`]: crate::TracingSink

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Environment variable holding the subscriber's filter directives.
pub const LOG_FILTER_ENV: &str = "FLUENTLOG_LOG";

/// Directives used when [`LOG_FILTER_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the filter read from [`LOG_FILTER_ENV`], falling back to
/// [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a global formatting subscriber filtered by [`env_filter`].
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    init_tracing_with_filter(env_filter())
}

/// Installs a global formatting subscriber behind a custom `filter` layer.
///
/// # Example
///
/// ```rust,ignore
/// use tracing_subscriber::EnvFilter;
///
/// fluentlog::init_tracing_with_filter(EnvFilter::new("fluentlog=debug"))?;
/// ```
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing_with_filter<F>(filter: F) -> Result<(), TryInitError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
