use crate::{
    logger_handle::LoggerHandle,
    secure_logger::SecureLogger,
    writers::{LogWriter, SecureLogWriter},
    SecureLayout, SecureLayoutError,
};
use std::{io::Write, path::PathBuf, sync::Arc};

/// The entry-point for using `secure_layout` as the logger of a program.
///
/// Create a `Logger` with your desired (initial) level,
///
/// * by specifying it programmatically as a `String`,
///   using [`Logger::try_with_str()`],
/// * or by expecting it in the environment variable `RUST_LOG`, falling back to a given
///   `String`, using [`Logger::try_with_env_or_str()`],
/// * or by providing a `LevelFilter`, using [`Logger::with()`],
///
/// then use `Logger`'s configuration methods,
/// and finally call [`start()`](Logger::start).
///
/// By default, records are formatted with [`SecureLayout::new()`] and written to `stderr`.
///
/// ## Example
///
/// ```rust
/// use secure_layout::{Logger, SecureLayout};
/// # fn main() -> Result<(), secure_layout::SecureLayoutError> {
/// let _logger = Logger::try_with_env_or_str("info")?
///     .layout(SecureLayout::try_with_pattern("%d{ISO8601} %-5p [%t] %c - %m%n")?)
///     .log_to_file("app.log")
///     .append()
///     .start()?;
/// # Ok(())
/// # }
/// ```
pub struct Logger {
    max_level: log::LevelFilter,
    layout: SecureLayout,
    output: Output,
    append: bool,
    other_writers: Vec<Box<dyn LogWriter>>,
}

enum Output {
    Stderr,
    Stdout,
    File(PathBuf),
    Writer(Box<dyn Write + Send>),
}

/// Create a Logger instance and define how to access the (initial) level.
impl Logger {
    /// Creates a Logger that writes records up to the given level.
    #[must_use]
    pub fn with(max_level: log::LevelFilter) -> Self {
        Self {
            max_level,
            layout: SecureLayout::new(),
            output: Output::Stderr,
            append: false,
            other_writers: Vec::new(),
        }
    }

    /// Creates a Logger that parses the level from a `String` or `&str`,
    /// e.g. `"info"` or `"off"`.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::LevelFilter` if the given value is not a level.
    pub fn try_with_str<S: AsRef<str>>(s: S) -> Result<Self, SecureLayoutError> {
        Ok(Self::with(parse_level(s.as_ref())?))
    }

    /// Creates a Logger that reads the level from the environment variable `RUST_LOG`,
    /// or parses it from the given `String`, if `RUST_LOG` is not set.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::LevelFilter` if the value that is used is not a level.
    pub fn try_with_env_or_str<S: AsRef<str>>(s: S) -> Result<Self, SecureLayoutError> {
        match std::env::var("RUST_LOG") {
            Ok(value) => Self::try_with_str(value),
            Err(..) => Self::try_with_str(s),
        }
    }
}

/// Simple methods for influencing the behavior of the Logger.
impl Logger {
    /// Makes the logger use the given layout for the primary output.
    #[must_use]
    pub fn layout(mut self, layout: SecureLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Makes the logger write to `stderr` (this is the default).
    #[must_use]
    pub fn log_to_stderr(mut self) -> Self {
        self.output = Output::Stderr;
        self
    }

    /// Makes the logger write to `stdout`.
    #[must_use]
    pub fn log_to_stdout(mut self) -> Self {
        self.output = Output::Stdout;
        self
    }

    /// Makes the logger write to the given file.
    ///
    /// An existing file is truncated, unless [`Logger::append`] is used as well.
    #[must_use]
    pub fn log_to_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = Output::File(path.into());
        self
    }

    /// Makes the logger append to an existing file, rather than truncating it.
    ///
    /// Only has an effect with [`Logger::log_to_file`].
    #[must_use]
    pub fn append(mut self) -> Self {
        self.append = true;
        self
    }

    /// Makes the logger write to the given output.
    #[must_use]
    pub fn log_to_writer(mut self, w: Box<dyn Write + Send>) -> Self {
        self.output = Output::Writer(w);
        self
    }

    /// Registers an additional [`LogWriter`].
    ///
    /// It receives all records up to its own
    /// [`max_log_level`](crate::writers::LogWriter::max_log_level),
    /// independent of the level of the logger.
    ///
    /// See [the module documentation of `writers`](crate::writers).
    #[must_use]
    pub fn add_writer(mut self, writer: Box<dyn LogWriter>) -> Self {
        self.other_writers.push(writer);
        self
    }
}

/// Finally, start logging.
impl Logger {
    /// Consumes the Logger object and initializes `secure_layout` as the logger
    /// of the `log` crate.
    ///
    /// Keep the returned [`LoggerHandle`] alive until the program ends,
    /// its `Drop` flushes and shuts down the writers.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Io` if the log file cannot be opened,
    /// `SecureLayoutError::Log` if another logger is already registered.
    pub fn start(self) -> Result<LoggerHandle, SecureLayoutError> {
        let (logger, handle, max_level) = self.build_internal()?;
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(max_level);
        Ok(handle)
    }

    /// Consumes the Logger object and builds a boxed logger and a [`LoggerHandle`]
    /// for it, but does not register the logger with the `log` crate.
    ///
    /// This allows combining the logger with other implementations of `log::Log`,
    /// or using it directly.
    /// Mind that the caller is then responsible for calling `log::set_max_level`.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Io` if the log file cannot be opened.
    pub fn build(self) -> Result<(Box<dyn log::Log>, LoggerHandle), SecureLayoutError> {
        let (logger, handle, _max_level) = self.build_internal()?;
        Ok((Box::new(logger), handle))
    }

    fn build_internal(
        self,
    ) -> Result<(SecureLogger, LoggerHandle, log::LevelFilter), SecureLayoutError> {
        let primary_writer = Arc::new(match self.output {
            Output::Stderr => SecureLogWriter::to_stderr(self.layout),
            Output::Stdout => SecureLogWriter::to_stdout(self.layout),
            Output::File(path) => SecureLogWriter::to_file(self.layout, path, self.append)?,
            Output::Writer(w) => SecureLogWriter::with_writer(self.layout, w),
        });
        let other_writers = Arc::new(self.other_writers);

        let logger = SecureLogger::new(
            self.max_level,
            Arc::clone(&primary_writer),
            Arc::clone(&other_writers),
        );
        let max_level = logger.effective_max_level();
        Ok((
            logger,
            LoggerHandle::new(primary_writer, other_writers),
            max_level,
        ))
    }
}

fn parse_level(s: &str) -> Result<log::LevelFilter, SecureLayoutError> {
    s.trim()
        .parse::<log::LevelFilter>()
        .map_err(|_e| SecureLayoutError::LevelFilter(s.to_string()))
}

#[cfg(test)]
mod test {
    use super::Logger;
    use crate::{LineEnding, SecureLayout, SecureLayoutError};
    use log::{LevelFilter, Record};
    use std::io::Read;

    #[test]
    fn test_level_parsing() {
        assert_eq!(
            Logger::try_with_str("info").unwrap().max_level,
            LevelFilter::Info
        );
        assert_eq!(
            Logger::try_with_str(" WARN ").unwrap().max_level,
            LevelFilter::Warn
        );
        assert_eq!(
            Logger::try_with_str("off").unwrap().max_level,
            LevelFilter::Off
        );
        assert!(matches!(
            Logger::try_with_str("mymod=debug"),
            Err(SecureLayoutError::LevelFilter(s)) if s == "mymod=debug"
        ));
    }

    #[test]
    fn test_build_to_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("built.log");
        let (logger, handle) = Logger::with(LevelFilter::Info)
            .layout(
                SecureLayout::try_with_pattern("%p %m%n")
                    .unwrap()
                    .with_line_ending(LineEnding::Lf)
                    .unwrap(),
            )
            .log_to_file(&path)
            .build()
            .unwrap();

        logger.log(
            &Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("a®b"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("dropped"))
                .build(),
        );
        drop(handle);

        let mut content = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "WARN a®®b®\n");
    }

    #[test]
    fn test_unopenable_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        assert!(matches!(
            Logger::with(LevelFilter::Info)
                .log_to_file(dir.path().join("no_such_dir").join("x.log"))
                .build(),
            Err(SecureLayoutError::Io(_))
        ));
    }
}
