//! crates/fluentlog/src/message.rs
//! Message bodies accepted by `LogItem::log`.

use std::fmt;

use serde_json::Value;

use crate::stringify::Stringify;

type Producer = Box<dyn FnOnce() -> (Message, Option<Value>) + Send>;

/// Body of a log statement.
///
/// Plain text is used as-is, structured values are encoded with the logger's
/// [`Stringify`] collaborator, and deferred producers run only once the
/// statement has passed every gate.
pub enum Message {
    /// Plain text.
    Text(String),
    /// Structured value rendered through [`Stringify`].
    Structured(Value),
    /// Callback producing the message and optional data on demand.
    Deferred(Producer),
}

impl Message {
    /// Wraps a callback that builds the message lazily.
    ///
    /// The callback's second value is used as the record's data when the
    /// caller did not pass data explicitly.
    pub fn deferred<F, M>(producer: F) -> Self
    where
        F: FnOnce() -> (M, Option<Value>) + Send + 'static,
        M: Into<Self>,
    {
        Self::Deferred(Box::new(move || {
            let (message, data) = producer();
            (message.into(), data)
        }))
    }

    /// Resolves the body into display text, running deferred producers.
    ///
    /// `data` wins over any data returned by a producer.
    pub(crate) fn resolve(
        self,
        data: Option<Value>,
        stringify: &dyn Stringify,
    ) -> (String, Option<Value>) {
        let mut message = self;
        let mut data = data;
        loop {
            match message {
                Self::Text(text) => return (text, data),
                Self::Structured(value) => return (stringify.encode(&value), data),
                Self::Deferred(producer) => {
                    let (produced, produced_data) = producer();
                    if data.is_none() {
                        data = produced_data;
                    }
                    message = produced;
                }
            }
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Structured(value) => f.debug_tuple("Structured").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<fmt::Arguments<'_>> for Message {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Self::Text(args.to_string())
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}
