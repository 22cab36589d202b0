use crate::{
    LineEnding, SecureLayout, SecureLayoutError, DEFAULT_ESCAPE_SEQUENCE, DEFAULT_PATTERN,
    DEFAULT_RECORD_SEPARATOR,
};
use serde_derive::Deserialize;
use std::path::Path;

/// Configuration of a [`SecureLayout`], as it can be read from a TOML file.
///
/// All fields are optional; missing fields get their default value.
///
/// ```toml
/// pattern = "%d{ISO8601} %-5p [%t] %c - %m%n"
/// record_separator = "®"
/// escape_sequence = "®"
/// line_ending = "lf"        # or "crlf", or "platform"
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Conversion pattern, see module [`pattern`](crate::pattern).
    pub pattern: String,
    /// Record separator.
    pub record_separator: String,
    /// Escape sequence.
    pub escape_sequence: String,
    /// Line ending.
    pub line_ending: LineEnding,
}
impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            record_separator: DEFAULT_RECORD_SEPARATOR.to_string(),
            escape_sequence: DEFAULT_ESCAPE_SEQUENCE.to_string(),
            line_ending: LineEnding::default(),
        }
    }
}

impl LayoutConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Toml` if the string is not a valid configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, SecureLayoutError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// `SecureLayoutError::Io` if the file cannot be read,
    /// `SecureLayoutError::Toml` if its content is not a valid configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SecureLayoutError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Creates the layout.
    ///
    /// # Errors
    ///
    /// If the pattern cannot be compiled, or one of the sequences is empty.
    pub fn build(&self) -> Result<SecureLayout, SecureLayoutError> {
        SecureLayout::try_with_pattern(&self.pattern)?
            .with_line_ending(self.line_ending)?
            .with_record_separator(self.record_separator.as_str())?
            .with_escape_sequence(self.escape_sequence.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::LayoutConfig;
    use crate::{LineEnding, LogEvent, SecureLayoutError};

    #[test]
    fn test_full_config() {
        let config = LayoutConfig::from_toml_str(
            r#"
            pattern = "%p %m"
            record_separator = "<EOR>"
            escape_sequence = "\\"
            line_ending = "crlf"
            "#,
        )
        .unwrap();
        assert_eq!(config.line_ending, LineEnding::CrLf);
        let layout = config.build().unwrap();
        assert_eq!(
            layout.format(&LogEvent::new(log::Level::Error, "t", "x<EOR>y")),
            "ERROR x\\<EOR>y<EOR>\r\n"
        );
    }

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::from_toml_str("").unwrap();
        assert_eq!(config, LayoutConfig::default());
        assert_eq!(config.build().unwrap().pattern(), "%m%n");
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            LayoutConfig::from_toml_str("patern = \"%m\""),
            Err(SecureLayoutError::Toml(_))
        ));
        assert!(matches!(
            LayoutConfig::from_toml_str("record_separator = \"\"")
                .unwrap()
                .build(),
            Err(SecureLayoutError::EmptyRecordSeparator)
        ));
        assert!(matches!(
            LayoutConfig::from_toml_str("pattern = \"%m%\"")
                .unwrap()
                .build(),
            Err(SecureLayoutError::Pattern(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(&path, "pattern = \"%m\"\nline_ending = \"lf\"\n").unwrap();
        let config = LayoutConfig::from_file(&path).unwrap();
        assert_eq!(config.pattern, "%m");
        assert!(matches!(
            LayoutConfig::from_file(dir.path().join("missing.toml")),
            Err(SecureLayoutError::Io(_))
        ));
    }
}
