//! crates/fluentlog/src/callsite.rs
//! Call-site identity used to key rate-limiting state.
//!
//! Callers are located with `#[track_caller]`: every public entry point that
//! creates a log chain is annotated, so [`Location::caller`] resolves to the
//! user's source line. The [`CallerIdentityProvider`] turns that location
//! into a key plus display strings; hosts with their own notion of a call
//! site (script identities, generated code) supply a different provider.

use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

/// Opaque, comparable identity of a call site.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteKey(Arc<str>);

impl CallSiteKey {
    /// Creates a key from any string-like identity.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallSiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallSiteKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for CallSiteKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Identity of one call site as reported by a [`CallerIdentityProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    /// Stable key for rate-limiting state.
    pub key: CallSiteKey,
    /// Human-readable location, e.g. `src/net.rs:42`.
    pub location: String,
    /// Display name of the enclosing module.
    pub module: String,
}

/// Maps a caller's source location to a [`CallSite`].
///
/// Implementations must return the same key for the same call site for the
/// life of the process.
pub trait CallerIdentityProvider: Send + Sync + fmt::Debug {
    /// Identifies the call site at `caller`.
    fn identify(&self, caller: &'static Location<'static>) -> CallSite;
}

/// Default provider keyed on file, line and column.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationIdentity;

impl CallerIdentityProvider for LocationIdentity {
    fn identify(&self, caller: &'static Location<'static>) -> CallSite {
        CallSite {
            key: CallSiteKey::new(format!(
                "{}:{}:{}",
                caller.file(),
                caller.line(),
                caller.column()
            )),
            location: format!("{}:{}", caller.file(), caller.line()),
            module: module_name(caller.file()),
        }
    }
}

/// Derives a display module name from a source path: its file stem, or the
/// parent directory name for `mod.rs`/`lib.rs`/`main.rs`.
pub(crate) fn module_name(file: &str) -> String {
    let path = Path::new(file);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file);
    if matches!(stem, "mod" | "lib" | "main") {
        if let Some(parent) = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
        {
            return parent.to_owned();
        }
    }
    stem.to_owned()
}
