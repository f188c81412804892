//! crates/fluentlog/src/sink/memory.rs
//! In-memory sink collecting delivered records.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Channel, LogRecord, OutputSink};

/// A record together with the channel it arrived on.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkEvent {
    /// Delivery channel.
    pub channel: Channel,
    /// The delivered record.
    pub record: LogRecord,
}

/// Sink that stores every delivery for later inspection.
///
/// Clones share one buffer, so a handle kept by the caller observes records
/// emitted through a logger that owns another clone.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, Vec<SinkEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, channel: Channel, record: &LogRecord) {
        self.events().push(SinkEvent {
            channel,
            record: record.clone(),
        });
    }

    /// Removes and returns every collected event in delivery order.
    pub fn drain(&self) -> Vec<SinkEvent> {
        self.events().drain(..).collect()
    }

    /// Returns a copy of the collected events without clearing them.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SinkEvent> {
        self.events().clone()
    }

    /// Formatted lines of every collected event, in delivery order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(|event| event.record.line.clone()).collect()
    }

    /// Number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events().len()
    }

    /// Reports whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }
}

impl OutputSink for MemorySink {
    fn emit_info(&self, record: &LogRecord) {
        self.push(Channel::Info, record);
    }

    fn emit_warn(&self, record: &LogRecord) {
        self.push(Channel::Warn, record);
    }

    fn emit_error(&self, record: &LogRecord) {
        self.push(Channel::Error, record);
    }

    fn emit_auxiliary(&self, record: &LogRecord) {
        self.push(Channel::Auxiliary, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Level;
    use crate::sink::tests::record;

    #[test]
    fn drain_clears_buffer() {
        let sink = MemorySink::new();
        sink.emit_info(&record(Level::Info, "first"));
        sink.emit_error(&record(Level::Error, "second"));

        let events = sink.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].channel, Channel::Info);
        assert_eq!(events[1].channel, Channel::Error);
        assert!(sink.is_empty());
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn snapshot_keeps_events() {
        let sink = MemorySink::new();
        sink.emit_warn(&record(Level::Warning, "careful"));
        assert_eq!(sink.snapshot().len(), 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.lines(), ["careful"]);
    }

    #[test]
    fn clones_share_events() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.emit_auxiliary(&record(Level::Info, "metric"));
        assert_eq!(handle.drain()[0].channel, Channel::Auxiliary);
    }
}
