use crate::{
    util::{eprint_err, io_error_code, ErrorCode},
    writers::{LogWriter, SecureLogWriter},
    SecureLayout, SecureLayoutError,
};
use std::sync::Arc;

/// Allows reconfiguring the logger while the program is running, and
/// **shuts down the logger when it is dropped**.
///
/// A `LoggerHandle` is returned from [`Logger::start()`](crate::Logger::start)
/// and [`Logger::build()`](crate::Logger::build).
///
/// Keep it alive until the very end of your program: when the last clone of the handle
/// is dropped, all writers are flushed and shut down.
///
/// ```rust
/// use secure_layout::{Logger, SecureLayout};
/// use std::error::Error;
/// fn main() -> Result<(), Box<dyn Error>> {
///     let logger = Logger::try_with_str("info")?.start()?;
///     // ...
///     logger.set_layout(SecureLayout::try_with_pattern("%d %-5p %m%n")?)?;
///     // ...
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct LoggerHandle
where
    Self: Send + Sync,
{
    writers_handle: Arc<WritersHandle>,
}
impl LoggerHandle {
    pub(crate) fn new(
        primary_writer: Arc<SecureLogWriter>,
        other_writers: Arc<Vec<Box<dyn LogWriter>>>,
    ) -> Self {
        Self {
            writers_handle: Arc::new(WritersHandle {
                primary_writer,
                other_writers,
            }),
        }
    }

    /// Replaces the layout of the primary writer.
    ///
    /// Records that are being written concurrently are finished with the previous layout,
    /// so every record in the output is framed consistently.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Poison` if some thread panicked while holding the layout.
    pub fn set_layout(&self, layout: SecureLayout) -> Result<(), SecureLayoutError> {
        self.writers_handle.primary_writer.set_layout(layout)
    }

    /// Flushes all writers.
    pub fn flush(&self) {
        self.writers_handle
            .primary_writer
            .flush()
            .unwrap_or_else(|e| {
                eprint_err(
                    io_error_code(&e, ErrorCode::Flush),
                    "flushing primary writer failed",
                    &e,
                );
            });
        for writer in self.writers_handle.other_writers.iter() {
            writer.flush().unwrap_or_else(|e| {
                eprint_err(
                    io_error_code(&e, ErrorCode::Flush),
                    "flushing additional writer failed",
                    &e,
                );
            });
        }
    }

    /// Shuts down all writers.
    ///
    /// This method is called implicitly when the last clone of the handle is dropped.
    /// Calling it explicitly is only necessary if the handle cannot be dropped,
    /// e.g. because it lives in a static.
    pub fn shutdown(&self) {
        self.writers_handle.shutdown();
    }
}

struct WritersHandle {
    primary_writer: Arc<SecureLogWriter>,
    other_writers: Arc<Vec<Box<dyn LogWriter>>>,
}
impl WritersHandle {
    fn shutdown(&self) {
        self.primary_writer.shutdown();
        for writer in self.other_writers.iter() {
            writer.shutdown();
        }
    }
}
impl Drop for WritersHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod test {
    use super::LoggerHandle;
    use crate::{
        writers::{LogWriter, SecureLogWriter},
        DeferredNow, LineEnding, SecureLayout,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    struct CountingWriter(Arc<AtomicUsize>);
    impl LogWriter for CountingWriter {
        fn write(&self, _now: &mut DeferredNow, _record: &log::Record) -> std::io::Result<()> {
            Ok(())
        }
        fn flush(&self) -> std::io::Result<()> {
            Ok(())
        }
        fn shutdown(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_last_clone_shuts_down() {
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let handle = LoggerHandle::new(
            Arc::new(SecureLogWriter::with_writer(
                SecureLayout::new(),
                Box::new(std::io::sink()),
            )),
            Arc::new(vec![
                Box::new(CountingWriter(Arc::clone(&shutdowns))) as Box<dyn LogWriter>
            ]),
        );
        let clone = handle.clone();
        drop(handle);
        assert_eq!(shutdowns.load(Ordering::SeqCst), 0);
        clone.flush();
        clone
            .set_layout(SecureLayout::new().with_line_ending(LineEnding::CrLf).unwrap())
            .unwrap();
        drop(clone);
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }
}
