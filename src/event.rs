use crate::{
    diagnostic::{Mdc, Ndc},
    util::{eprint_err, ErrorCode},
    DeferredNow,
};
use chrono::{DateTime, Local};
use log::{Level, Record};
use std::{
    backtrace::Backtrace, collections::BTreeMap, error::Error, fmt::Write, sync::OnceLock,
};

// Basis for the elapsed time (`%r`) of events that are created from log records.
static START: OnceLock<DateTime<Local>> = OnceLock::new();

pub(crate) fn process_start() -> DateTime<Local> {
    *START.get_or_init(Local::now)
}

/// The data of a single logging call, as input to
/// [`SecureLayout::format`](crate::SecureLayout::format).
///
/// Events are either created from a `log::Record` with [`LogEvent::from_record`],
/// or directly with [`LogEvent::new`] and the `with_*` methods.
#[derive(Clone, Debug)]
pub struct LogEvent {
    timestamp: DateTime<Local>,
    start: DateTime<Local>,
    level: Level,
    logger: String,
    module_path: Option<String>,
    file: Option<String>,
    line: Option<u32>,
    thread_name: String,
    message: String,
    ndc: String,
    mdc: BTreeMap<String, String>,
    trace: Option<Vec<String>>,
}

impl LogEvent {
    /// Creates an event with the current time and the name of the current thread,
    /// but without location, diagnostic context or trace.
    #[must_use]
    pub fn new<L: Into<String>, M: Into<String>>(level: Level, logger: L, message: M) -> Self {
        Self {
            timestamp: Local::now(),
            start: process_start(),
            level,
            logger: logger.into(),
            module_path: None,
            file: None,
            line: None,
            thread_name: current_thread_name(),
            message: message.into(),
            ndc: String::new(),
            mdc: BTreeMap::new(),
            trace: None,
        }
    }

    /// Creates an event from a `log::Record`.
    ///
    /// The current thread's name, [`Ndc`] and [`Mdc`] are captured.
    #[must_use]
    pub fn from_record(record: &Record, now: &mut DeferredNow) -> Self {
        Self {
            timestamp: *now.now(),
            start: process_start(),
            level: record.level(),
            logger: record.target().to_string(),
            module_path: record.module_path().map(ToString::to_string),
            file: record.file().map(ToString::to_string),
            line: record.line(),
            thread_name: current_thread_name(),
            message: render_args(record),
            ndc: Ndc::get(),
            mdc: Mdc::snapshot(),
            trace: None,
        }
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the basis for the elapsed time (`%r`).
    #[must_use]
    pub fn with_start(mut self, start: DateTime<Local>) -> Self {
        self.start = start;
        self
    }

    /// Sets the location of the logging call.
    #[must_use]
    pub fn with_location<S: Into<String>>(
        mut self,
        module_path: S,
        file: S,
        line: u32,
    ) -> Self {
        self.module_path = Some(module_path.into());
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Sets the thread name.
    #[must_use]
    pub fn with_thread_name<S: Into<String>>(mut self, thread_name: S) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Sets the nested diagnostic context.
    #[must_use]
    pub fn with_ndc<S: Into<String>>(mut self, ndc: S) -> Self {
        self.ndc = ndc.into();
        self
    }

    /// Adds a value to the mapped diagnostic context.
    #[must_use]
    pub fn with_mdc<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.mdc.insert(key.into(), value.into());
        self
    }

    /// Appends the given lines to the trace.
    #[must_use]
    pub fn with_trace<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trace
            .get_or_insert_with(Vec::new)
            .extend(lines.into_iter().map(Into::into));
        self
    }

    /// Appends the error and its chain of sources to the trace,
    /// one line per error, the sources prefixed with `Caused by: `.
    #[must_use]
    pub fn with_error(self, error: &dyn Error) -> Self {
        let mut lines = vec![error.to_string()];
        let mut o_source = error.source();
        while let Some(source) = o_source {
            lines.push(format!("Caused by: {source}"));
            o_source = source.source();
        }
        self.with_trace(lines)
    }

    /// Appends the lines of a captured backtrace to the trace.
    #[must_use]
    pub fn with_backtrace(self, backtrace: &Backtrace) -> Self {
        let text = backtrace.to_string();
        self.with_trace(text.lines().map(ToString::to_string).collect::<Vec<_>>())
    }

    /// Timestamp of the event.
    #[must_use]
    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }
    /// Milliseconds from the start basis to the timestamp.
    #[must_use]
    pub fn elapsed_millis(&self) -> i64 {
        self.timestamp
            .signed_duration_since(self.start)
            .num_milliseconds()
    }
    /// Level of the event.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }
    /// Name of the logger, i.e. the target of a `log::Record`.
    #[must_use]
    pub fn logger(&self) -> &str {
        &self.logger
    }
    /// Module path of the logging call, if known.
    #[must_use]
    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }
    /// Source file of the logging call, if known.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
    /// Source line of the logging call, if known.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.line
    }
    /// Name of the thread that created the event.
    #[must_use]
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
    /// The message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
    /// Nested diagnostic context.
    #[must_use]
    pub fn ndc(&self) -> &str {
        &self.ndc
    }
    /// Value from the mapped diagnostic context.
    #[must_use]
    pub fn mdc(&self, key: &str) -> Option<&str> {
        self.mdc.get(key).map(String::as_str)
    }
    /// Trace lines, present only if an error was attached.
    #[must_use]
    pub fn trace(&self) -> Option<&[String]> {
        self.trace.as_deref()
    }
}

fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}

// A failing Display impl of a logged value leaves what was written so far.
fn render_args(record: &Record) -> String {
    let mut message = String::new();
    if let Err(e) = write!(message, "{}", record.args()) {
        eprint_err(ErrorCode::Render, "rendering the log message failed", &e);
    }
    message
}
