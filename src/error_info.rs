//! Error codes of `secure_layout`.
//!
//! Errors that occur while log records are formatted or written cannot be returned to the
//! code that issued the log call. They are printed to `stderr` instead, together with one of
//! the following error codes. Logging itself never panics.
//!
//! ## `Render`
//!
//! One step of the compiled conversion pattern, usually a custom renderer added with
//! [`SecureLayout::with_renderer`](crate::SecureLayout::with_renderer), or a `Display`
//! implementation of a logged object, returned an error.
//!
//! Example:
//!
//! ```text
//! [secure_layout][ERRCODE::Render] rendering a field failed, caused by Error
//! ```
//!
//! The partial output of the failing step is discarded, and the remaining steps are
//! rendered as usual, so the record is still escaped and ends with its end marker.
//!
//! ## `Write`
//!
//! Writing a framed record to the output failed.
//!
//! Example:
//!
//! ```text
//! [secure_layout][ERRCODE::Write] writing log record failed, caused by Os { code: 28, .. }
//! ```
//!
//! Typical reasons are a full disk or a closed pipe.
//! A failure of one writer does not prevent other writers from getting the record.
//!
//! ## `Flush`
//!
//! Explicit flushing, or flushing during shutdown, failed.
//!
//! Example:
//!
//! ```text
//! [secure_layout][ERRCODE::Flush] flushing primary writer failed, caused by ...
//! ```
//!
//! ## `Poison`
//!
//! Log records can be written by all threads of your program. The writers thus keep the
//! layout and the output in an `RwLock` and a `Mutex`. In case that a thread panics
//! while owning one of these locks, the lock is subsequently considered "poisoned".
//!
//! Most likely the root cause for this is some panic! in a `Debug` or `Display` implementation
//! of a logged object.
