//! crates/fluentlog/src/sink/writer.rs
//! Line-oriented sink streaming records into an [`io::Write`] target.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{LogRecord, OutputSink};
use crate::line_mode::LineMode;

/// Streams each record's formatted line, followed by its serialized data when
/// present, into a writer.
///
/// All channels share the writer. Write failures are dropped: emission is
/// best-effort and never surfaces to the logging call.
///
/// ```
/// use fluentlog::{Logger, WriterSink};
/// use std::sync::Arc;
///
/// let sink = Arc::new(WriterSink::new(Vec::new()));
/// let logger = Logger::builder().name("net").sink(Arc::clone(&sink)).build()?;
/// logger.at_warning().log("link down");
///
/// drop(logger);
/// let sink = Arc::try_unwrap(sink).unwrap();
/// assert_eq!(sink.into_inner(), b"[net] Warning: link down\n");
/// # Ok::<(), fluentlog::LogError>(())
/// ```
pub struct WriterSink<W> {
    writer: Mutex<W>,
    line_mode: LineMode,
}

impl<W> WriterSink<W> {
    /// Creates a sink that appends a newline after each record.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with an explicit [`LineMode`].
    #[must_use]
    pub fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            line_mode,
        }
    }

    /// Returns the configured [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn writer(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriterSink<io::Stderr> {
    /// Sink writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W> WriterSink<W>
where
    W: Write,
{
    fn render(&self, record: &LogRecord) -> io::Result<()> {
        let mut writer = self.writer();
        writer.write_all(record.line.as_bytes())?;
        if let Some(data) = &record.data_text {
            writer.write_all(b" ")?;
            writer.write_all(data.as_bytes())?;
        }
        if self.line_mode.append_newline() {
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

impl<W> OutputSink for WriterSink<W>
where
    W: Write + Send,
{
    fn emit_info(&self, record: &LogRecord) {
        let _ = self.render(record);
    }

    fn emit_warn(&self, record: &LogRecord) {
        let _ = self.render(record);
    }

    fn emit_error(&self, record: &LogRecord) {
        let _ = self.render(record);
    }
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("line_mode", &self.line_mode)
            .finish_non_exhaustive()
    }
}
