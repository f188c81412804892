//! crates/fluentlog/src/sink/mod.rs
//! Output sinks receiving records that passed every gate.
//!
//! Records are routed by severity: below [`Level::Warning`] goes to the
//! informational channel, [`Level::Warning`] to the warning channel, and
//! [`Level::Error`] and above to the error channel. When a logger's auxiliary
//! channel is switched on, Info-level records are additionally handed to
//! [`OutputSink::emit_auxiliary`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::levels::Level;

mod memory;
mod tracing_sink;
mod writer;

pub use memory::{MemorySink, SinkEvent};
pub use tracing_sink::TracingSink;
pub use writer::WriterSink;

/// A formatted log statement handed to an [`OutputSink`].
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    /// Name of the emitting logger.
    pub logger: Arc<str>,
    /// Severity the statement was emitted at.
    pub level: Level,
    /// Fully formatted line: logger name, level name and message.
    pub line: String,
    /// Resolved message text without the prefix.
    pub message: String,
    /// Human-readable call-site location.
    pub location: String,
    /// Module name reported for the call site.
    pub module: String,
    /// Raw structured data attached to the statement.
    pub data: Option<Value>,
    /// `data` rendered by the logger's stringify collaborator.
    pub data_text: Option<String>,
}

/// Channel a record was delivered on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Informational output (Trace, Debug, Info).
    Info,
    /// Warning output.
    Warn,
    /// Error output (Error, Fatal).
    Error,
    /// Optional analytics-style channel for Info records.
    Auxiliary,
}

impl Channel {
    /// Primary channel for records at `level`.
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        match level {
            Level::Trace | Level::Debug | Level::Info => Self::Info,
            Level::Warning => Self::Warn,
            Level::Error | Level::Fatal => Self::Error,
        }
    }
}

/// Destination for emitted log records. Emission is fire-and-forget.
pub trait OutputSink: Send + Sync + fmt::Debug {
    /// Receives Trace, Debug and Info records.
    fn emit_info(&self, record: &LogRecord);

    /// Receives Warning records.
    fn emit_warn(&self, record: &LogRecord);

    /// Receives Error and Fatal records.
    fn emit_error(&self, record: &LogRecord);

    /// Receives Info records while the logger's auxiliary channel is on.
    fn emit_auxiliary(&self, record: &LogRecord) {
        let _ = record;
    }
}

impl<S> OutputSink for Arc<S>
where
    S: OutputSink + ?Sized,
{
    fn emit_info(&self, record: &LogRecord) {
        (**self).emit_info(record);
    }

    fn emit_warn(&self, record: &LogRecord) {
        (**self).emit_warn(record);
    }

    fn emit_error(&self, record: &LogRecord) {
        (**self).emit_error(record);
    }

    fn emit_auxiliary(&self, record: &LogRecord) {
        (**self).emit_auxiliary(record);
    }
}

/// Routes `record` to the channel selected by its level.
pub(crate) fn dispatch(sink: &dyn OutputSink, record: &LogRecord, auxiliary: bool) {
    match record.level {
        Level::Trace | Level::Debug | Level::Info => sink.emit_info(record),
        Level::Warning => sink.emit_warn(record),
        Level::Error | Level::Fatal => sink.emit_error(record),
    }
    if auxiliary && record.level == Level::Info {
        sink.emit_auxiliary(record);
    }
}
