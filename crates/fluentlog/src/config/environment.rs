//! crates/fluentlog/src/config/environment.rs
//! Description of the environment a logger runs in.

use std::fmt;

use crate::error::LogError;

const EDITOR_ENV: &str = "FLUENTLOG_EDITOR";
const SERVER_ENV: &str = "FLUENTLOG_SERVER";
const PLACE_ID_ENV: &str = "FLUENTLOG_PLACE_ID";
const GAME_ID_ENV: &str = "FLUENTLOG_GAME_ID";

/// Facts about the running environment consulted by the resolver.
pub trait EnvironmentDescriptor: Send + Sync + fmt::Debug {
    /// Running inside the interactive editor.
    fn is_interactive_editor(&self) -> bool;

    /// Running on the server side rather than a client.
    fn is_server_side(&self) -> bool;

    /// Identifier of the current place.
    fn place_id(&self) -> u64;

    /// Identifier of the current game.
    fn game_id(&self) -> u64;
}

/// Plain-data [`EnvironmentDescriptor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Environment {
    /// Running inside the interactive editor.
    pub interactive_editor: bool,
    /// Running server-side.
    pub server_side: bool,
    /// Current place identifier.
    pub place_id: u64,
    /// Current game identifier.
    pub game_id: u64,
}

impl Environment {
    /// Live server outside the editor.
    #[must_use]
    pub const fn server() -> Self {
        Self {
            interactive_editor: false,
            server_side: true,
            place_id: 0,
            game_id: 0,
        }
    }

    /// Live client outside the editor.
    #[must_use]
    pub const fn client() -> Self {
        Self {
            interactive_editor: false,
            server_side: false,
            place_id: 0,
            game_id: 0,
        }
    }

    /// Marks the environment as the interactive editor.
    #[must_use]
    pub const fn in_editor(mut self) -> Self {
        self.interactive_editor = true;
        self
    }

    /// Sets the current place.
    #[must_use]
    pub const fn with_place(mut self, place_id: u64) -> Self {
        self.place_id = place_id;
        self
    }

    /// Sets the current game.
    #[must_use]
    pub const fn with_game(mut self, game_id: u64) -> Self {
        self.game_id = game_id;
        self
    }

    /// Reads the environment from `FLUENTLOG_EDITOR`, `FLUENTLOG_SERVER`,
    /// `FLUENTLOG_PLACE_ID` and `FLUENTLOG_GAME_ID`. Unset variables default
    /// to `false`/`0`.
    pub fn from_env() -> Result<Self, LogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            interactive_editor: parse_flag(EDITOR_ENV, lookup(EDITOR_ENV))?,
            server_side: parse_flag(SERVER_ENV, lookup(SERVER_ENV))?,
            place_id: parse_id(PLACE_ID_ENV, lookup(PLACE_ID_ENV))?,
            game_id: parse_id(GAME_ID_ENV, lookup(GAME_ID_ENV))?,
        })
    }
}

impl EnvironmentDescriptor for Environment {
    fn is_interactive_editor(&self) -> bool {
        self.interactive_editor
    }

    fn is_server_side(&self) -> bool {
        self.server_side
    }

    fn place_id(&self) -> u64 {
        self.place_id
    }

    fn game_id(&self) -> u64 {
        self.game_id
    }
}

fn parse_flag(key: &str, value: Option<String>) -> Result<bool, LogError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(LogError::invalid_config(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

fn parse_id(key: &str, value: Option<String>) -> Result<u64, LogError> {
    let Some(value) = value else {
        return Ok(0);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| {
        LogError::invalid_config(format!("{key} must be an unsigned integer, got '{value}'"))
    })
}
