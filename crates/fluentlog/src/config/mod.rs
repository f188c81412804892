//! crates/fluentlog/src/config/mod.rs
//! Level configuration documents and their resolution against an environment.
//!
//! A document is either a single level name or a map from environment tag to
//! entry. Each entry is a bare level name (a candidate default) or a
//! `{ "Server": .., "Client": .. }` pair, optionally restricted to specific
//! places or games:
//!
//! ```json
//! {
//!     "Studio": { "Server": "Debug", "Client": "Trace" },
//!     "Live": { "Server": "Warning", "Client": "Error", "PlaceIds": [1818, 2929] },
//!     "Default": "Info"
//! }
//! ```
//!
//! Level names are validated during resolution, not parsing, so a malformed
//! entry that never applies to the current environment does not prevent a
//! logger from being built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::levels::Level;

mod environment;
mod resolver;

pub use environment::{Environment, EnvironmentDescriptor};
pub use resolver::{ConfigResolver, ConfigWarning, FilterKind, Resolution, ResolutionSource};

/// Environment tag whose entry takes absolute precedence inside the editor.
pub const EDITOR_KEY: &str = "Studio";

/// Environment variable holding a JSON configuration document.
pub const CONFIG_ENV: &str = "FLUENTLOG_CONFIG";

/// Hierarchical minimum-level configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigDocument {
    /// One level for every environment.
    Level(String),
    /// Entries keyed by environment tag.
    Entries(BTreeMap<String, ConfigEntry>),
}

/// One entry of a [`ConfigDocument::Entries`] map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigEntry {
    /// Bare level name: a candidate default.
    Level(String),
    /// Per-side levels with an optional place/game restriction.
    Sided(SidedEntry),
}

/// Per-side levels, optionally restricted to places or games.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct SidedEntry {
    /// Level used when running server-side.
    pub server: String,
    /// Level used when running client-side.
    pub client: String,
    /// Restrict to one place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<u64>,
    /// Restrict to any of several places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_ids: Option<Vec<u64>>,
    /// Restrict to one game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<u64>,
    /// Restrict to any of several games.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_ids: Option<Vec<u64>>,
}

impl ConfigDocument {
    /// Document applying `level` everywhere.
    #[must_use]
    pub fn level(level: Level) -> Self {
        Self::Level(level.name().to_owned())
    }

    /// Empty entry map, to be filled with [`with_entry`](Self::with_entry).
    #[must_use]
    pub fn entries() -> Self {
        Self::Entries(BTreeMap::new())
    }

    /// Adds or replaces the entry for `tag`.
    ///
    /// A single-level document is turned into an entry map first; its level
    /// is kept under the `Default` tag.
    #[must_use]
    pub fn with_entry(self, tag: impl Into<String>, entry: ConfigEntry) -> Self {
        let mut entries = match self {
            Self::Entries(entries) => entries,
            Self::Level(name) => BTreeMap::from([("Default".to_owned(), ConfigEntry::Level(name))]),
        };
        entries.insert(tag.into(), entry);
        Self::Entries(entries)
    }

    /// Parses a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, LogError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a JSON document from [`CONFIG_ENV`], if set.
    pub fn from_env() -> Result<Option<Self>, LogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads a JSON document from [`CONFIG_ENV`] through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, LogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(CONFIG_ENV) {
            Some(text) if !text.trim().is_empty() => Self::from_json_str(&text).map(Some),
            _ => Ok(None),
        }
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::level(Level::Info)
    }
}

impl From<Level> for ConfigDocument {
    fn from(level: Level) -> Self {
        Self::level(level)
    }
}

impl ConfigEntry {
    /// Bare-level entry.
    #[must_use]
    pub fn level(level: Level) -> Self {
        Self::Level(level.name().to_owned())
    }

    /// Unrestricted per-side entry.
    #[must_use]
    pub fn sided(server: Level, client: Level) -> Self {
        Self::Sided(SidedEntry::new(server, client))
    }
}

impl From<SidedEntry> for ConfigEntry {
    fn from(entry: SidedEntry) -> Self {
        Self::Sided(entry)
    }
}

impl From<Level> for ConfigEntry {
    fn from(level: Level) -> Self {
        Self::level(level)
    }
}

impl SidedEntry {
    /// Unrestricted entry with the given per-side levels.
    #[must_use]
    pub fn new(server: Level, client: Level) -> Self {
        Self {
            server: server.name().to_owned(),
            client: client.name().to_owned(),
            ..Self::default()
        }
    }

    /// Restricts the entry to `place_id`.
    #[must_use]
    pub fn place_id(mut self, place_id: u64) -> Self {
        self.place_id = Some(place_id);
        self
    }

    /// Restricts the entry to any of `place_ids`.
    #[must_use]
    pub fn place_ids(mut self, place_ids: impl IntoIterator<Item = u64>) -> Self {
        self.place_ids = Some(place_ids.into_iter().collect());
        self
    }

    /// Restricts the entry to `game_id`.
    #[must_use]
    pub fn game_id(mut self, game_id: u64) -> Self {
        self.game_id = Some(game_id);
        self
    }

    /// Restricts the entry to any of `game_ids`.
    #[must_use]
    pub fn game_ids(mut self, game_ids: impl IntoIterator<Item = u64>) -> Self {
        self.game_ids = Some(game_ids.into_iter().collect());
        self
    }

    /// Reports whether any place or game restriction is present.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.place_id.is_some()
            || self.place_ids.is_some()
            || self.game_id.is_some()
            || self.game_ids.is_some()
    }
}
