//! crates/fluentlog/src/sink/tracing_sink.rs
//! Default sink forwarding records to the `tracing` ecosystem.

use super::{LogRecord, OutputSink};
use crate::levels::Level;

/// Forwards records to `tracing` events under the `fluentlog` target.
///
/// Trace, Debug and Info records map onto the matching `tracing` levels,
/// Warning onto `WARN`, and Error/Fatal onto `ERROR`. Auxiliary records are
/// emitted at `INFO` under `fluentlog::auxiliary` so subscribers can route
/// them separately. The logger name, call-site location and serialized
/// data travel as structured fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl OutputSink for TracingSink {
    fn emit_info(&self, record: &LogRecord) {
        let logger = &*record.logger;
        let location = record.location.as_str();
        let data = record.data_text.as_deref();
        match record.level {
            Level::Trace => {
                tracing::trace!(target: "fluentlog", logger, location, data, "{}", record.line);
            }
            Level::Debug => {
                tracing::debug!(target: "fluentlog", logger, location, data, "{}", record.line);
            }
            _ => {
                tracing::info!(target: "fluentlog", logger, location, data, "{}", record.line);
            }
        }
    }

    fn emit_warn(&self, record: &LogRecord) {
        tracing::warn!(
            target: "fluentlog",
            logger = &*record.logger,
            location = record.location.as_str(),
            data = record.data_text.as_deref(),
            "{}",
            record.line
        );
    }

    fn emit_error(&self, record: &LogRecord) {
        tracing::error!(
            target: "fluentlog",
            logger = &*record.logger,
            location = record.location.as_str(),
            data = record.data_text.as_deref(),
            fatal = record.level == Level::Fatal,
            "{}",
            record.line
        );
    }

    fn emit_auxiliary(&self, record: &LogRecord) {
        tracing::info!(
            target: "fluentlog::auxiliary",
            logger = &*record.logger,
            module = record.module.as_str(),
            data = record.data_text.as_deref(),
            "{}",
            record.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::tests::record;

    #[test]
    fn emits_without_a_subscriber() {
        let sink = TracingSink::new();
        for level in Level::ALL {
            let record = record(level, "line");
            sink.emit_info(&record);
            sink.emit_warn(&record);
            sink.emit_error(&record);
            sink.emit_auxiliary(&record);
        }
    }
}
