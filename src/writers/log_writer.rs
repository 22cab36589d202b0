use crate::{DeferredNow, LogEvent};
use log::Record;
use std::io;

/// Writes to a single log output stream.
///
/// Boxed instances of `LogWriter` can be used as additional log targets
/// (see [`Logger::add_writer`](crate::Logger::add_writer)).
pub trait LogWriter: Sync + Send {
    /// Writes out a log line.
    ///
    /// # Errors
    ///
    /// If writing to the output fails.
    fn write(&self, now: &mut DeferredNow, record: &Record) -> io::Result<()>;

    /// Writes out a log line for which the logger has built the [`LogEvent`] already.
    ///
    /// The logger builds the event once per record and hands it to all writers.
    /// The default implementation ignores the event and calls [`LogWriter::write`].
    ///
    /// # Errors
    ///
    /// If writing to the output fails.
    fn write_event(
        &self,
        now: &mut DeferredNow,
        record: &Record,
        _event: &LogEvent,
    ) -> io::Result<()> {
        self.write(now, record)
    }

    /// Flushes any buffered records.
    ///
    /// # Errors
    ///
    /// If flushing the output fails.
    fn flush(&self) -> io::Result<()>;

    /// Provides the maximum log level that is to be written.
    fn max_log_level(&self) -> log::LevelFilter {
        log::LevelFilter::Trace
    }

    /// Cleanup open resources, if necessary.
    fn shutdown(&self) {}
}
