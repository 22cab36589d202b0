//! Contains the trait [`LogWriter`] for log output channels,
//! and the [`SecureLogWriter`], which writes framed records to a stream or a file.
//!
//! The primary writer of a [`Logger`](crate::Logger) is a `SecureLogWriter`;
//! additional writers can be registered with
//! [`Logger::add_writer`](crate::Logger::add_writer), e.g. to send the same records
//! with a different layout to a second file:
//!
//! ```rust
//! use secure_layout::{writers::SecureLogWriter, Logger, SecureLayout, TTCC_PATTERN};
//!
//! fn main() -> Result<(), secure_layout::SecureLayoutError> {
//!     let audit = SecureLogWriter::to_file(
//!         SecureLayout::try_with_pattern(TTCC_PATTERN)?,
//!         "audit.log",
//!         true,
//!     )?
//!     .max_log_level(log::LevelFilter::Warn);
//!
//!     let _handle = Logger::try_with_str("info")?
//!         .log_to_stderr()
//!         .add_writer(Box::new(audit))
//!         .start()?;
//!
//!     log::warn!("goes to stderr and to audit.log");
//!     log::info!("goes to stderr only");
//!     Ok(())
//! }
//! ```

mod log_writer;
mod secure_log_writer;

pub use self::log_writer::LogWriter;
pub use self::secure_log_writer::SecureLogWriter;
