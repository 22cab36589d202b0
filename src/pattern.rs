//! Compiles conversion patterns into renderer chains.
//!
//! A conversion pattern is composed of literal text and conversion specifiers.
//! Each conversion specifier starts with a `%`, followed by optional format modifiers,
//! a conversion character, and, for some conversion characters, an option in braces.
//!
//! | char | output |
//! |------|--------|
//! | `c`  | logger name; `%c{2}` prints only the last two components |
//! | `C`  | module path of the logging call; precision as with `c` |
//! | `d`  | timestamp; `%d{ISO8601}` (default), `%d{ABSOLUTE}`, `%d{DATE}`, or a `chrono` format like `%d{%H:%M:%S}` |
//! | `F`  | source file |
//! | `l`  | location, as `module(file:line)` |
//! | `L`  | source line |
//! | `m`  | message |
//! | `M`  | last component of the module path |
//! | `n`  | line terminator |
//! | `p`  | level |
//! | `r`  | milliseconds since the start of the program |
//! | `t`  | thread name |
//! | `x`  | nested diagnostic context |
//! | `X`  | mapped diagnostic context value, `%X{key}` |
//! | `%`  | a single `%` (written as `%%`) |
//!
//! Format modifiers: `-` left-justifies, a number defines the minimum width (the field
//! is padded with spaces), a `.` and a number define the maximum width; longer values are
//! truncated **from the beginning**. So `%-5p` prints the level left-justified with at
//! least five characters, and `%.10c` prints the last ten characters of the logger name.
use crate::{error::PatternError, LineEnding, LogEvent};
use std::fmt;

mod formatting;
mod parser;

pub(crate) use formatting::FormattingInfo;

/// A single step of a [`RendererChain`]; appends text for the given event to the buffer.
pub type Renderer = Box<dyn Fn(&LogEvent, &mut String) -> fmt::Result + Send + Sync>;

/// The compiled form of a conversion pattern: an ordered sequence of [`Renderer`]s.
pub struct RendererChain {
    steps: Vec<Renderer>,
}
impl RendererChain {
    /// Compiles the given conversion pattern.
    ///
    /// # Errors
    ///
    /// `PatternError` if the pattern is malformed.
    pub fn compile(pattern: &str, line_ending: LineEnding) -> Result<Self, PatternError> {
        Ok(Self {
            steps: parser::parse(pattern, line_ending)?,
        })
    }

    /// Appends a custom step.
    #[must_use]
    pub fn with_step(mut self, renderer: Renderer) -> Self {
        self.steps.push(renderer);
        self
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the chain has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Lets all steps append their output, in chain order.
    ///
    /// The output of a failing step is removed again, the remaining steps are still
    /// executed.
    ///
    /// # Errors
    ///
    /// `fmt::Error` if at least one step failed.
    pub fn render(&self, event: &LogEvent, buffer: &mut String) -> fmt::Result {
        let mut result = Ok(());
        for step in &self.steps {
            let len = buffer.len();
            if let Err(e) = step(event, buffer) {
                buffer.truncate(len);
                result = Err(e);
            }
        }
        result
    }
}
impl fmt::Debug for RendererChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererChain")
            .field("steps", &self.steps.len())
            .finish()
    }
}
