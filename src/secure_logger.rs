use crate::{
    util::{eprint_err, io_error_code, ErrorCode},
    writers::{LogWriter, SecureLogWriter},
    DeferredNow, LogEvent,
};
use std::sync::Arc;

// Implements log::Log to plug into the log crate.
//
// The primary writer gets all records up to `max_level`,
// every other writer gets the records up to its own max_log_level.
pub(crate) struct SecureLogger {
    max_level: log::LevelFilter,
    primary_writer: Arc<SecureLogWriter>,
    other_writers: Arc<Vec<Box<dyn LogWriter>>>,
}

impl SecureLogger {
    pub fn new(
        max_level: log::LevelFilter,
        primary_writer: Arc<SecureLogWriter>,
        other_writers: Arc<Vec<Box<dyn LogWriter>>>,
    ) -> Self {
        Self {
            max_level,
            primary_writer,
            other_writers,
        }
    }

    // The level that must be given to log::set_max_level.
    pub fn effective_max_level(&self) -> log::LevelFilter {
        self.other_writers
            .iter()
            .map(|w| w.max_log_level())
            .fold(self.max_level, std::cmp::max)
    }
}

impl log::Log for SecureLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.effective_max_level()
    }

    fn log(&self, record: &log::Record) {
        let level = record.level();
        let mut now = DeferredNow::new();
        // built at most once, and only if some writer takes the record
        let mut o_event: Option<LogEvent> = None;

        if level <= self.max_level {
            let event = o_event.get_or_insert_with(|| LogEvent::from_record(record, &mut now));
            self.primary_writer
                .write_event(&mut now, record, event)
                .unwrap_or_else(|e| {
                    eprint_err(
                        io_error_code(&e, ErrorCode::Write),
                        "writing log record failed",
                        &e,
                    );
                });
        }

        for writer in self.other_writers.iter() {
            if level <= writer.max_log_level() {
                let event =
                    o_event.get_or_insert_with(|| LogEvent::from_record(record, &mut now));
                writer
                    .write_event(&mut now, record, event)
                    .unwrap_or_else(|e| {
                        eprint_err(
                            io_error_code(&e, ErrorCode::Write),
                            "writing log record to additional writer failed",
                            &e,
                        );
                    });
            }
        }
    }

    fn flush(&self) {
        self.primary_writer.flush().unwrap_or_else(|e| {
            eprint_err(
                io_error_code(&e, ErrorCode::Flush),
                "flushing primary writer failed",
                &e,
            );
        });
        for writer in self.other_writers.iter() {
            writer.flush().unwrap_or_else(|e| {
                eprint_err(
                    io_error_code(&e, ErrorCode::Flush),
                    "flushing additional writer failed",
                    &e,
                );
            });
        }
    }
}
