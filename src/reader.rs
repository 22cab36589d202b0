use crate::{
    escape::{ends_with_marker, unescape},
    LineEnding, SecureLayout,
};
use std::io::{BufRead, Error, ErrorKind};

/// Splits a stream that was written with a [`SecureLayout`] back into records.
///
/// Each item is the record's text with escaping reverted and without its end marker.
/// If the layout's pattern ended with a line break, that line break was replaced by the
/// end marker and is thus not part of the returned text.
///
/// ```rust
/// use secure_layout::{RecordReader, SecureLayout};
///
/// let stream = "first®\nsecond\nline, with ®® inside®\n";
/// let records = RecordReader::for_layout(stream.as_bytes(), &SecureLayout::new())
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
/// assert_eq!(records, vec!["first", "second\nline, with ® inside"]);
/// ```
pub struct RecordReader<R: BufRead> {
    reader: R,
    escape_sequence: String,
    record_separator: String,
    terminator: &'static str,
    done: bool,
}
impl<R: BufRead> RecordReader<R> {
    /// Creates a reader that expects records with the given escape sequence,
    /// record separator, and line ending.
    pub fn new<S: Into<String>>(
        reader: R,
        escape_sequence: S,
        record_separator: S,
        line_ending: LineEnding,
    ) -> Self {
        Self {
            reader,
            escape_sequence: escape_sequence.into(),
            record_separator: record_separator.into(),
            terminator: line_ending.as_str(),
            done: false,
        }
    }

    /// Creates a reader that expects records as they are written by the given layout.
    pub fn for_layout(reader: R, layout: &SecureLayout) -> Self {
        Self::new(
            reader,
            layout.escape_sequence(),
            layout.record_separator(),
            layout.line_ending(),
        )
    }

    fn read_record(&mut self) -> std::io::Result<Option<String>> {
        let mut raw = String::new();
        loop {
            if self.reader.read_line(&mut raw)? == 0 {
                return if raw.is_empty() {
                    Ok(None)
                } else {
                    Err(Error::new(
                        ErrorKind::UnexpectedEof,
                        "stream ends within a record",
                    ))
                };
            }
            if ends_with_marker(
                &raw,
                &self.escape_sequence,
                &self.record_separator,
                self.terminator,
            ) {
                let body_len = raw.len() - self.record_separator.len() - self.terminator.len();
                return Ok(Some(unescape(
                    &raw[..body_len],
                    &self.escape_sequence,
                    &self.record_separator,
                )));
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.read_record().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}
