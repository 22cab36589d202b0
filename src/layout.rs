use crate::{
    escape::escape_in_place,
    pattern::{Renderer, RendererChain},
    util::{eprint_err, with_buffer, ErrorCode},
    DeferredNow, LineEnding, LogEvent, SecureLayoutError,
};
use log::Record;
use std::io::Write;

/// Default conversion pattern; prints just the message.
pub const DEFAULT_PATTERN: &str = "%m%n";

/// Conversion pattern with elapsed time, thread, level, logger, and nested diagnostic
/// context.
pub const TTCC_PATTERN: &str = "%r [%t] %p %c %x - %m%n";

/// Default record separator, the character `®` (U+00AE).
pub const DEFAULT_RECORD_SEPARATOR: &str = "\u{00AE}";

/// Default escape sequence, identical to the default record separator.
pub const DEFAULT_ESCAPE_SEQUENCE: &str = DEFAULT_RECORD_SEPARATOR;

/// A layout that renders log events with a conversion pattern and frames each of them
/// as a self-delimiting record.
///
/// Every record ends with the record separator, followed by the line terminator.
/// Occurrences of the escape sequence in the rendered text are doubled,
/// and, if the record separator differs from the escape sequence, occurrences of the
/// record separator get the escape sequence in front.
/// A reader of the log stream can thus find the record boundaries without being fooled
/// by message content (see [`RecordReader`](crate::RecordReader)).
///
/// The trace of an event (see [`LogEvent::with_error`]) is always part of the record.
///
/// # Example
///
/// ```rust
/// use secure_layout::{LogEvent, SecureLayout};
///
/// let layout = SecureLayout::try_with_pattern("%-5p %m").unwrap();
/// let event = LogEvent::new(log::Level::Info, "app", "forged®entry");
/// assert_eq!(layout.format(&event), "INFO  forged®®entry®\n");
/// ```
///
/// `format` can be called concurrently from many threads; the configuration methods
/// need exclusive access.
#[derive(Debug)]
pub struct SecureLayout {
    pattern: String,
    chain: RendererChain,
    record_separator: String,
    escape_sequence: String,
    line_ending: LineEnding,
}
impl Default for SecureLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureLayout {
    /// Creates a layout with [`DEFAULT_PATTERN`], [`DEFAULT_RECORD_SEPARATOR`],
    /// [`DEFAULT_ESCAPE_SEQUENCE`], and the platform's line terminator.
    #[must_use]
    pub fn new() -> Self {
        Self::try_with_pattern(DEFAULT_PATTERN).unwrap(/* ok */)
    }

    /// Creates a layout with the given conversion pattern.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Pattern` if the pattern cannot be compiled.
    pub fn try_with_pattern(pattern: &str) -> Result<Self, SecureLayoutError> {
        let line_ending = LineEnding::default();
        Ok(Self {
            pattern: pattern.to_string(),
            chain: RendererChain::compile(pattern, line_ending)?,
            record_separator: DEFAULT_RECORD_SEPARATOR.to_string(),
            escape_sequence: DEFAULT_ESCAPE_SEQUENCE.to_string(),
            line_ending,
        })
    }

    /// Sets the record separator.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::EmptyRecordSeparator` if the given separator is empty.
    pub fn with_record_separator<S: Into<String>>(
        mut self,
        record_separator: S,
    ) -> Result<Self, SecureLayoutError> {
        self.set_record_separator(record_separator)?;
        Ok(self)
    }

    /// Sets the escape sequence.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::EmptyEscapeSequence` if the given sequence is empty.
    pub fn with_escape_sequence<S: Into<String>>(
        mut self,
        escape_sequence: S,
    ) -> Result<Self, SecureLayoutError> {
        self.set_escape_sequence(escape_sequence)?;
        Ok(self)
    }

    /// Sets the line terminator.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Pattern` if the pattern cannot be recompiled.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Result<Self, SecureLayoutError> {
        self.set_line_ending(line_ending)?;
        Ok(self)
    }

    /// Appends a custom renderer to the compiled pattern.
    ///
    /// The renderer is lost if the pattern or the line ending are changed later.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.chain = self.chain.with_step(renderer);
        self
    }

    /// Replaces the conversion pattern.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Pattern` if the pattern cannot be compiled;
    /// the layout then continues to use the previous pattern.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<(), SecureLayoutError> {
        self.chain = RendererChain::compile(pattern, self.line_ending)?;
        self.pattern = pattern.to_string();
        Ok(())
    }

    /// Replaces the record separator.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::EmptyRecordSeparator` if the given separator is empty.
    pub fn set_record_separator<S: Into<String>>(
        &mut self,
        record_separator: S,
    ) -> Result<(), SecureLayoutError> {
        let record_separator = record_separator.into();
        if record_separator.is_empty() {
            return Err(SecureLayoutError::EmptyRecordSeparator);
        }
        self.record_separator = record_separator;
        Ok(())
    }

    /// Replaces the escape sequence.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::EmptyEscapeSequence` if the given sequence is empty.
    pub fn set_escape_sequence<S: Into<String>>(
        &mut self,
        escape_sequence: S,
    ) -> Result<(), SecureLayoutError> {
        let escape_sequence = escape_sequence.into();
        if escape_sequence.is_empty() {
            return Err(SecureLayoutError::EmptyEscapeSequence);
        }
        self.escape_sequence = escape_sequence;
        Ok(())
    }

    /// Replaces the line terminator, and recompiles the pattern.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Pattern` if the pattern cannot be recompiled.
    pub fn set_line_ending(&mut self, line_ending: LineEnding) -> Result<(), SecureLayoutError> {
        self.chain = RendererChain::compile(&self.pattern, line_ending)?;
        self.line_ending = line_ending;
        Ok(())
    }

    /// The conversion pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The record separator.
    #[must_use]
    pub fn record_separator(&self) -> &str {
        &self.record_separator
    }

    /// The escape sequence.
    #[must_use]
    pub fn escape_sequence(&self) -> &str {
        &self.escape_sequence
    }

    /// The line ending.
    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Produces the framed record for the given event.
    #[must_use]
    pub fn format(&self, event: &LogEvent) -> String {
        with_buffer(|buffer| {
            self.format_into(event, buffer);
            buffer.clone()
        })
    }

    /// Produces the framed record for the given `log::Record`.
    #[must_use]
    pub fn format_record(&self, now: &mut DeferredNow, record: &Record) -> String {
        self.format(&LogEvent::from_record(record, now))
    }

    /// Writes the framed record for the given event in a single `write_all` call.
    ///
    /// # Errors
    ///
    /// If writing fails.
    pub fn write(&self, w: &mut dyn Write, event: &LogEvent) -> std::io::Result<()> {
        with_buffer(|buffer| {
            self.format_into(event, buffer);
            w.write_all(buffer.as_bytes())
        })
    }

    fn format_into(&self, event: &LogEvent, buffer: &mut String) {
        let terminator = self.line_ending.as_str();

        if let Err(e) = self.chain.render(event, buffer) {
            eprint_err(ErrorCode::Render, "rendering a field failed", &e);
        }

        if let Some(trace) = event.trace() {
            for line in trace {
                buffer.push_str(line);
                buffer.push_str(terminator);
            }
        }

        escape_in_place(buffer, &self.escape_sequence, &self.record_separator);

        if buffer.ends_with(terminator) {
            buffer.insert_str(buffer.len() - terminator.len(), &self.record_separator);
        } else {
            buffer.push_str(&self.record_separator);
            buffer.push_str(terminator);
        }
    }
}

#[cfg(test)]
mod test {
    use super::SecureLayout;
    use crate::{LineEnding, LogEvent, SecureLayoutError};
    use log::Level;

    fn layout(pattern: &str) -> SecureLayout {
        SecureLayout::try_with_pattern(pattern)
            .unwrap()
            .with_line_ending(LineEnding::Lf)
            .unwrap()
    }

    fn info(message: &str) -> LogEvent {
        LogEvent::new(Level::Info, "test", message)
    }

    #[test]
    fn test_embedded_separator_is_doubled() {
        assert_eq!(layout("%m").format(&info("A®B")), "A®®B®\n");
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(layout("%m").format(&info("")), "®\n");
        assert_eq!(layout("").format(&info("ignored")), "®\n");
        assert_eq!(layout("%m%n").format(&info("")), "®\n");
    }

    #[test]
    fn test_marker_goes_before_trailing_terminator() {
        assert_eq!(layout("%m%n").format(&info("abc")), "abc®\n");
        assert_eq!(layout("%m").format(&info("abc\n")), "abc®\n");
        assert_eq!(layout("%m%n%n").format(&info("abc")), "abc\n®\n");
    }

    #[test]
    fn test_trace_is_escaped_and_framed() {
        let event = info("failed").with_trace(["line ®1", "line 2"]);
        assert_eq!(
            layout("%m%n").format(&event),
            "failed\nline ®®1\nline 2®\n"
        );
        let event = info("failed").with_trace(Vec::<String>::new());
        assert_eq!(layout("%m").format(&event), "failed®\n");
    }

    #[test]
    fn test_distinct_sequences() {
        let layout = layout("%m")
            .with_record_separator("|")
            .unwrap()
            .with_escape_sequence("\\")
            .unwrap();
        assert_eq!(layout.format(&info("a|b")), "a\\|b|\n");
        assert_eq!(layout.format(&info("a\\b")), "a\\\\b|\n");
        assert_eq!(layout.format(&info("|||")), "\\|\\|\\||\n");
    }

    #[test]
    fn test_crlf() {
        let layout = layout("%m%n").with_line_ending(LineEnding::CrLf).unwrap();
        assert_eq!(layout.format(&info("x")), "x®\r\n");
        assert_eq!(layout.format(&info("x").with_trace(["t"])), "x\r\nt®\r\n");
    }

    #[test]
    fn test_configuration_errors() {
        let mut layout = layout("%m");
        assert!(matches!(
            layout.set_record_separator(""),
            Err(SecureLayoutError::EmptyRecordSeparator)
        ));
        assert!(matches!(
            layout.set_escape_sequence(String::new()),
            Err(SecureLayoutError::EmptyEscapeSequence)
        ));
        assert!(matches!(
            layout.set_pattern("%m %"),
            Err(SecureLayoutError::Pattern(_))
        ));
        // the previous configuration is still active
        assert_eq!(layout.pattern(), "%m");
        assert_eq!(layout.record_separator(), "®");
        assert_eq!(layout.escape_sequence(), "®");
        assert_eq!(layout.format(&info("ok")), "ok®\n");
    }

    #[test]
    fn test_failing_renderer_keeps_record_intact() {
        let layout = layout("[%m]").with_renderer(Box::new(
            |_: &LogEvent, buf: &mut String| -> std::fmt::Result {
                buf.push_str("®garbage");
                Err(std::fmt::Error)
            },
        ));
        assert_eq!(layout.format(&info("x")), "[x]®\n");
    }

    #[test]
    fn test_write() {
        let mut out = Vec::<u8>::new();
        let layout = layout("%p %m");
        layout.write(&mut out, &info("one")).unwrap();
        layout.write(&mut out, &info("two")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "INFO one®\nINFO two®\n");
    }
}
