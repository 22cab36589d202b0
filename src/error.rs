use thiserror::Error;

/// Describes errors in the configuration and initialization of `secure_layout`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SecureLayoutError {
    /// The escape sequence must not be empty.
    #[error("the escape sequence must not be empty")]
    EmptyEscapeSequence,

    /// The record separator must not be empty.
    #[error("the record separator must not be empty")]
    EmptyRecordSeparator,

    /// The conversion pattern could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Invalid level filter.
    #[error("Invalid level filter")]
    LevelFilter(String),

    /// The output stream or file cannot be written or opened.
    #[error("Log cannot be written")]
    Io(#[from] std::io::Error),

    /// Logger initialization failed.
    #[error("Logger initialization failed")]
    Log(#[from] log::SetLoggerError),

    /// Some synchronization object is poisoned.
    #[error("Some synchronization object is poisoned")]
    Poison,

    /// The layout configuration cannot be parsed.
    #[cfg(feature = "config")]
    #[cfg_attr(docsrs, doc(cfg(feature = "config")))]
    #[error("The layout configuration cannot be parsed")]
    Toml(#[from] toml::de::Error),
}

/// Describes why a conversion pattern could not be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid conversion pattern at position {position}: {kind}")]
pub struct PatternError {
    /// Byte offset into the pattern where the problem was detected.
    pub position: usize,
    /// What is wrong.
    pub kind: PatternErrorKind,
}

/// The different reasons why a conversion pattern can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternErrorKind {
    /// The pattern ends with a `%` that starts no conversion.
    #[error("dangling '%' at the end of the pattern")]
    DanglingPercent,

    /// The conversion character is not known.
    #[error("unknown conversion character '{0}'")]
    UnknownConversion(char),

    /// An option in braces is not closed.
    #[error("unterminated '{{'")]
    UnterminatedOption,

    /// A `.` is not followed by a maximum width.
    #[error("'.' must be followed by a maximum width")]
    MissingMaxWidth,

    /// `%X` needs a key in braces.
    #[error("%X requires a key, e.g. %X{{user}}")]
    MissingKey,

    /// The precision option of `%c` or `%C` is not a positive number.
    #[error("invalid precision '{0}'")]
    InvalidPrecision(String),

    /// The date format of `%d` is not understood.
    #[error("invalid date format '{0}'")]
    InvalidDateFormat(String),
}
