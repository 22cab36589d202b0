//! The two escape passes of the framing protocol, and their inverse.
//!
//! Pass 1 doubles every occurrence of the escape sequence.
//! Pass 2, which is only done if the record separator differs from the escape sequence,
//! puts an escape sequence in front of every occurrence of the record separator.
//! Both passes scan from left to right for non-overlapping occurrences and never rescan
//! what they inserted.
//!
//! The inverse, [`unescape`], first undoes pass 2 and then pass 1. It restores the original
//! text exactly for the default configuration, and for every pair of sequences where no
//! proper suffix of one sequence is a prefix of the other.

/// Applies both escape passes to `text`.
#[must_use]
pub fn escape(text: &str, escape: &str, separator: &str) -> String {
    let mut buffer = text.to_string();
    escape_in_place(&mut buffer, escape, separator);
    buffer
}

/// Reverts [`escape`].
#[must_use]
pub fn unescape(text: &str, escape: &str, separator: &str) -> String {
    let mut buffer = text.to_string();
    if separator != escape {
        let escaped_separator = [escape, separator].concat();
        buffer = replace_occurrences(&buffer, &escaped_separator, separator);
    }
    let escaped_escape = [escape, escape].concat();
    replace_occurrences(&buffer, &escaped_escape, escape)
}

// Both passes, on the formatting buffer. Allocates only if something is to be escaped.
pub(crate) fn escape_in_place(buffer: &mut String, escape: &str, separator: &str) {
    if buffer.contains(escape) {
        let escaped = [escape, escape].concat();
        *buffer = replace_occurrences(buffer, escape, &escaped);
    }
    if separator != escape && buffer.contains(separator) {
        let escaped = [escape, separator].concat();
        *buffer = replace_occurrences(buffer, separator, &escaped);
    }
}

// Returns true if text ends with a record separator that is not escaped, followed by
// the line terminator.
pub(crate) fn ends_with_marker(
    text: &str,
    escape: &str,
    separator: &str,
    terminator: &str,
) -> bool {
    let Some(before_marker) = text
        .strip_suffix(terminator)
        .and_then(|t| t.strip_suffix(separator))
    else {
        return false;
    };
    // pass 1 leaves only even runs of the escape sequence in the body, and pass 2 adds
    // one more in front of each escaped separator; so the separator is a marker if and
    // only if it is preceded by an even number of escape sequences
    trailing_run(before_marker, escape) % 2 == 0
}

// Number of consecutive occurrences of `sequence` at the end of `text`.
fn trailing_run(mut text: &str, sequence: &str) -> usize {
    let mut count = 0;
    while let Some(rest) = text.strip_suffix(sequence) {
        text = rest;
        count += 1;
    }
    count
}

fn replace_occurrences(text: &str, from: &str, to: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8 + to.len());
    let mut last_end = 0;
    for (start, part) in text.match_indices(from) {
        result.push_str(&text[last_end..start]);
        result.push_str(to);
        last_end = start + part.len();
    }
    result.push_str(&text[last_end..]);
    result
}
