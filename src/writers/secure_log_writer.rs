use crate::{
    util::{eprint_err, io_error_code, poison_err, ErrorCode},
    writers::LogWriter,
    DeferredNow, LogEvent, SecureLayout, SecureLayoutError,
};
use log::Record;
use std::{
    fs::OpenOptions,
    io::{LineWriter, Write},
    path::Path,
    sync::{Mutex, RwLock},
};

/// A [`LogWriter`] that formats each record with a [`SecureLayout`]
/// and writes the framed record to an output stream.
///
/// Each record is written with a single `write_all` while the output is locked,
/// so records from concurrent threads never interleave.
pub struct SecureLogWriter {
    layout: RwLock<SecureLayout>,
    output: Mutex<Box<dyn Write + Send>>,
    max_log_level: log::LevelFilter,
}
impl SecureLogWriter {
    /// Writes to stderr.
    #[must_use]
    pub fn to_stderr(layout: SecureLayout) -> Self {
        Self::with_writer(layout, Box::new(std::io::stderr()))
    }

    /// Writes to stdout.
    #[must_use]
    pub fn to_stdout(layout: SecureLayout) -> Self {
        Self::with_writer(layout, Box::new(std::io::stdout()))
    }

    /// Writes to the given file, which is created if necessary.
    ///
    /// With `append == false`, an existing file is truncated.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Io` if the file cannot be opened.
    pub fn to_file<P: AsRef<Path>>(
        layout: SecureLayout,
        path: P,
        append: bool,
    ) -> Result<Self, SecureLayoutError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self::with_writer(layout, Box::new(LineWriter::new(file))))
    }

    /// Writes to the given output.
    #[must_use]
    pub fn with_writer(layout: SecureLayout, output: Box<dyn Write + Send>) -> Self {
        Self {
            layout: RwLock::new(layout),
            output: Mutex::new(output),
            max_log_level: log::LevelFilter::Trace,
        }
    }

    /// Makes the writer ignore records with a level above the given one.
    #[must_use]
    pub fn max_log_level(mut self, max_log_level: log::LevelFilter) -> Self {
        self.max_log_level = max_log_level;
        self
    }

    /// Replaces the layout.
    ///
    /// Records that are being formatted while this method is called are finished
    /// with the previous layout.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Poison` if a thread panicked while holding the layout.
    pub fn set_layout(&self, layout: SecureLayout) -> Result<(), SecureLayoutError> {
        let mut guard = self
            .layout
            .write()
            .map_err(|_e| SecureLayoutError::Poison)?;
        *guard = layout;
        Ok(())
    }
}

impl LogWriter for SecureLogWriter {
    fn write(&self, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
        let event = LogEvent::from_record(record, now);
        self.write_event(now, record, &event)
    }

    fn write_event(
        &self,
        _now: &mut DeferredNow,
        _record: &Record,
        event: &LogEvent,
    ) -> std::io::Result<()> {
        let layout = self.layout.read().map_err(|_e| poison_err())?;
        let mut output = self.output.lock().map_err(|_e| poison_err())?;
        layout.write(&mut **output, event)
    }

    fn flush(&self) -> std::io::Result<()> {
        self.output.lock().map_err(|_e| poison_err())?.flush()
    }

    fn max_log_level(&self) -> log::LevelFilter {
        self.max_log_level
    }

    fn shutdown(&self) {
        self.flush().unwrap_or_else(|e| {
            eprint_err(
                io_error_code(&e, ErrorCode::Flush),
                "flushing on shutdown failed",
                &e,
            );
        });
    }
}

#[cfg(test)]
mod test {
    use super::SecureLogWriter;
    use crate::{writers::LogWriter, DeferredNow, LineEnding, SecureLayout};
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);
    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
    impl Shared {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn layout(pattern: &str) -> SecureLayout {
        SecureLayout::try_with_pattern(pattern)
            .unwrap()
            .with_line_ending(LineEnding::Lf)
            .unwrap()
    }

    #[test]
    fn test_write_and_set_layout() {
        let out = Shared::default();
        let writer = SecureLogWriter::with_writer(layout("%p %m"), Box::new(out.clone()));
        writer
            .write(
                &mut DeferredNow::new(),
                &log::Record::builder()
                    .level(log::Level::Error)
                    .args(format_args!("disk full"))
                    .build(),
            )
            .unwrap();
        writer.set_layout(layout("%m <%p>")).unwrap();
        writer
            .write(
                &mut DeferredNow::new(),
                &log::Record::builder()
                    .level(log::Level::Info)
                    .args(format_args!("fake®\nINFO forged"))
                    .build(),
            )
            .unwrap();
        writer.flush().unwrap();
        assert_eq!(
            out.text(),
            "ERROR disk full®\nfake®®\nINFO forged <INFO>®\n"
        );
    }

    #[test]
    fn test_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("test.log");
        {
            let writer = SecureLogWriter::to_file(layout("%m"), &path, false).unwrap();
            writer
                .write(
                    &mut DeferredNow::new(),
                    &log::Record::builder().args(format_args!("one")).build(),
                )
                .unwrap();
            writer.shutdown();
        }
        {
            let writer = SecureLogWriter::to_file(layout("%m"), &path, true).unwrap();
            writer
                .write(
                    &mut DeferredNow::new(),
                    &log::Record::builder().args(format_args!("two")).build(),
                )
                .unwrap();
            writer.shutdown();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one®\ntwo®\n");
    }

    #[test]
    fn test_poisoned_layout_is_reported_as_poison() {
        let writer = std::sync::Arc::new(SecureLogWriter::with_writer(
            layout("%m"),
            Box::new(std::io::sink()),
        ));
        let w = std::sync::Arc::clone(&writer);
        std::thread::spawn(move || {
            let _guard = w.layout.write().unwrap();
            panic!("poisoning the layout lock");
        })
        .join()
        .unwrap_err();

        let err = writer
            .write(
                &mut DeferredNow::new(),
                &log::Record::builder().args(format_args!("x")).build(),
            )
            .unwrap_err();
        assert!(matches!(
            crate::util::io_error_code(&err, crate::util::ErrorCode::Write),
            crate::util::ErrorCode::Poison
        ));
        assert!(matches!(
            writer.set_layout(layout("%m")),
            Err(crate::SecureLayoutError::Poison)
        ));
    }
}
