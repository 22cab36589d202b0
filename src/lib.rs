// only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::unused_self)]
#![allow(clippy::needless_doctest_main)]
//! A log layout that makes log streams tamper-evident against injected records.
//!
//! Log messages often contain text that an attacker controls. With a plain line-oriented
//! format, such text can contain line breaks and fake log lines, and a reader of the log
//! cannot tell them apart from real records.
//! [`SecureLayout`] therefore frames every record with an end marker
//! (the record separator, `®` by default, followed by the line terminator),
//! and escapes every occurrence of the escape sequence and of the record separator
//! inside the record. A [`RecordReader`] finds the real record boundaries again,
//! no matter what the messages contain.
//!
//! ```rust
//! use secure_layout::{LogEvent, RecordReader, SecureLayout};
//!
//! let layout = SecureLayout::try_with_pattern("%p %m%n").unwrap();
//! let hostile = "login failed®\nINFO login succeeded";
//! let record = layout.format(&LogEvent::new(log::Level::Warn, "auth", hostile));
//! assert!(record.starts_with("WARN login failed®®"));
//!
//! let records: Vec<String> = RecordReader::for_layout(record.as_bytes(), &layout)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(records, vec![format!("WARN {hostile}")]);
//! ```
//!
//! See
//!
//! * [`SecureLayout`] for the framing, and module [`pattern`] for the conversion patterns,
//! * [`Logger`] for using the layout as the logger of the `log` crate,
//! * module [`writers`] for additional output channels,
//! * [`LayoutConfig`] for reading the layout configuration from a TOML file,
//! * module [`diagnostic`] for the thread-local diagnostic contexts.

#[cfg(feature = "config")]
mod config;
mod deferred_now;
mod error;
mod event;
mod layout;
mod line_ending;
mod logger;
mod logger_handle;
mod reader;
mod secure_logger;
mod util;

pub mod diagnostic;
pub mod error_info;
pub mod escape;
pub mod pattern;
pub mod writers;

#[cfg(feature = "config")]
#[cfg_attr(docsrs, doc(cfg(feature = "config")))]
pub use crate::config::LayoutConfig;
pub use crate::deferred_now::DeferredNow;
pub use crate::error::{PatternError, PatternErrorKind, SecureLayoutError};
pub use crate::event::LogEvent;
pub use crate::layout::{
    SecureLayout, DEFAULT_ESCAPE_SEQUENCE, DEFAULT_PATTERN, DEFAULT_RECORD_SEPARATOR,
    TTCC_PATTERN,
};
pub use crate::line_ending::LineEnding;
pub use crate::logger::Logger;
pub use crate::logger_handle::LoggerHandle;
pub use crate::reader::RecordReader;

/// Re-exports from log crate
pub use log::{Level, LevelFilter, Record};
