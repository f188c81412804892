//! crates/fluentlog/src/stringify.rs
//! Serialization of structured message bodies and attached data.

use std::fmt;

use serde_json::Value;

/// Encodes structured values into text for log lines.
pub trait Stringify: Send + Sync + fmt::Debug {
    /// Renders `value` as a string.
    fn encode(&self, value: &Value) -> String;
}

/// [`Stringify`] implementation backed by `serde_json`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonStringify {
    pretty: bool,
}

impl JsonStringify {
    /// Compact single-line JSON.
    #[must_use]
    pub const fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented multi-line JSON.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Stringify for JsonStringify {
    fn encode(&self, value: &Value) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        // Serializing a `Value` only fails for non-string map keys, which
        // `Value` cannot hold; fall back to the debug rendering regardless.
        encoded.unwrap_or_else(|_| format!("{value:?}"))
    }
}
