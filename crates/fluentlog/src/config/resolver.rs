//! crates/fluentlog/src/config/resolver.rs
//! Derives one effective minimum level from a document and an environment.

use super::{ConfigDocument, ConfigEntry, EDITOR_KEY, EnvironmentDescriptor, SidedEntry};
use crate::error::LogError;
use crate::levels::Level;

/// Restriction that made an entry apply to the current environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// `PlaceId` equals the current place.
    PlaceId,
    /// `PlaceIds` contains the current place.
    PlaceIds,
    /// `GameId` equals the current game.
    GameId,
    /// `GameIds` contains the current game.
    GameIds,
}

/// Which part of the document produced the resolved level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The document is a single level name.
    Document,
    /// The editor entry, selected inside the editor.
    Editor,
    /// The single entry whose restriction matched.
    Restricted {
        /// Entry key.
        key: String,
        /// Restriction that matched.
        filter: FilterKind,
    },
    /// An unrestricted per-side entry.
    Fallthrough {
        /// Entry key.
        key: String,
    },
    /// A bare-level candidate default.
    Default {
        /// Entry key.
        key: String,
    },
}

/// Non-fatal problem noticed during resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    /// More than one bare-level default entry exists.
    MultipleDefaults {
        /// Keys of every default entry, in document order.
        keys: Vec<String>,
        /// Key of the default that was kept.
        chosen: String,
    },
}

/// Outcome of a successful resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Effective minimum level.
    pub level: Level,
    /// Where the level came from.
    pub source: ResolutionSource,
    /// Non-fatal warnings.
    pub warnings: Vec<ConfigWarning>,
}

/// Resolves [`ConfigDocument`]s against an [`EnvironmentDescriptor`].
///
/// Precedence, highest first:
///
/// 1. a single-level document;
/// 2. inside the editor, the [`EDITOR_KEY`] entry;
/// 3. the one entry whose place/game restriction matches (a second match is
///    [`LogError::AmbiguousConfig`]);
/// 4. the one unrestricted per-side entry (a second one is also ambiguous);
/// 5. the first bare-level default (more than one only warns).
///
/// Every entry is inspected before a decision is made, so ambiguity is
/// detected regardless of document order.
#[derive(Clone, Copy, Debug)]
pub struct ConfigResolver<'a> {
    environment: &'a dyn EnvironmentDescriptor,
}

impl<'a> ConfigResolver<'a> {
    /// Creates a resolver for `environment`.
    #[must_use]
    pub fn new(environment: &'a dyn EnvironmentDescriptor) -> Self {
        Self { environment }
    }

    /// Resolves `document` to its effective minimum level.
    pub fn resolve(&self, document: &ConfigDocument) -> Result<Resolution, LogError> {
        let entries = match document {
            ConfigDocument::Level(name) => {
                return Ok(Resolution {
                    level: parse_level(name, "document")?,
                    source: ResolutionSource::Document,
                    warnings: Vec::new(),
                });
            }
            ConfigDocument::Entries(entries) => entries,
        };

        if self.environment.is_interactive_editor() {
            if let Some(entry) = entries.get(EDITOR_KEY) {
                let level = match entry {
                    ConfigEntry::Level(name) => parse_level(name, EDITOR_KEY)?,
                    ConfigEntry::Sided(sided) => self.select_side(sided, EDITOR_KEY)?,
                };
                return Ok(Resolution {
                    level,
                    source: ResolutionSource::Editor,
                    warnings: Vec::new(),
                });
            }
        }

        let mut defaults: Vec<(&str, &str)> = Vec::new();
        let mut restricted: Option<(&str, FilterKind, &SidedEntry)> = None;
        let mut fallthrough: Option<(&str, &SidedEntry)> = None;

        for (key, entry) in entries {
            let key = key.as_str();
            if key == EDITOR_KEY {
                continue;
            }
            let sided = match entry {
                ConfigEntry::Level(name) => {
                    defaults.push((key, name.as_str()));
                    continue;
                }
                ConfigEntry::Sided(sided) => sided,
            };

            if sided.is_restricted() {
                let Some(filter) = self.matching_filter(sided) else {
                    continue;
                };
                if let Some((first, _, _)) = restricted {
                    return Err(ambiguous(first, key));
                }
                restricted = Some((key, filter, sided));
            } else {
                if let Some((first, _)) = fallthrough {
                    return Err(ambiguous(first, key));
                }
                fallthrough = Some((key, sided));
            }
        }

        let mut warnings = Vec::new();
        if defaults.len() > 1 {
            let keys: Vec<String> = defaults.iter().map(|(key, _)| (*key).to_owned()).collect();
            let chosen = keys[0].clone();
            tracing::warn!(
                target: "fluentlog::config",
                defaults = ?keys,
                chosen = %chosen,
                "logging configuration has more than one default entry"
            );
            warnings.push(ConfigWarning::MultipleDefaults { keys, chosen });
        }

        // Only the chosen entry is validated.
        let (level, source) = if let Some((key, filter, sided)) = restricted {
            let source = ResolutionSource::Restricted {
                key: key.to_owned(),
                filter,
            };
            (self.select_side(sided, key)?, source)
        } else if let Some((key, sided)) = fallthrough {
            let source = ResolutionSource::Fallthrough { key: key.to_owned() };
            (self.select_side(sided, key)?, source)
        } else if let Some(&(key, name)) = defaults.first() {
            let source = ResolutionSource::Default { key: key.to_owned() };
            (parse_level(name, key)?, source)
        } else {
            return Err(LogError::ConfigResolutionFailed);
        };

        Ok(Resolution {
            level,
            source,
            warnings,
        })
    }

    /// Shorthand for `resolve(document).map(|r| r.level)`.
    pub fn resolve_level(&self, document: &ConfigDocument) -> Result<Level, LogError> {
        self.resolve(document).map(|resolution| resolution.level)
    }

    /// Picks the entry's level for the current side after validating both.
    fn select_side(&self, entry: &SidedEntry, key: &str) -> Result<Level, LogError> {
        let server = parse_level(&entry.server, &format!("{key}.Server"))?;
        let client = parse_level(&entry.client, &format!("{key}.Client"))?;
        Ok(if self.environment.is_server_side() {
            server
        } else {
            client
        })
    }

    /// First restriction, in priority order, that admits the environment.
    fn matching_filter(&self, entry: &SidedEntry) -> Option<FilterKind> {
        let place = self.environment.place_id();
        let game = self.environment.game_id();
        if entry.place_id == Some(place) {
            Some(FilterKind::PlaceId)
        } else if entry.place_ids.as_ref().is_some_and(|ids| ids.contains(&place)) {
            Some(FilterKind::PlaceIds)
        } else if entry.game_id == Some(game) {
            Some(FilterKind::GameId)
        } else if entry.game_ids.as_ref().is_some_and(|ids| ids.contains(&game)) {
            Some(FilterKind::GameIds)
        } else {
            None
        }
    }
}

fn parse_level(name: &str, field: &str) -> Result<Level, LogError> {
    Level::from_name(name)
        .ok_or_else(|| LogError::invalid_config(format!("{field}: '{name}' is not a level name")))
}

fn ambiguous(first: &str, second: &str) -> LogError {
    LogError::AmbiguousConfig {
        first: first.to_owned(),
        second: second.to_owned(),
    }
}
