//! Core error types for caption data handling
//!
//! Most operations on the render path are total and never surface these
//! errors. They exist for the strict parsing entry points and for loading
//! snapshots from disk, where callers want a reason instead of a silent default.

use core::fmt;
use thiserror::Error;

/// Convenience result type used across caption-core
pub type Result<T> = core::result::Result<T, CoreError>;

/// Main error type for caption-core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Time format parsing errors
    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    /// Color format parsing errors
    #[error("Invalid color format: {0}")]
    InvalidColor(String),

    /// Numeric value parsing errors
    #[error("Invalid numeric value: {0}")]
    InvalidNumeric(String),

    /// Output aspect format outside the supported set
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Structural parse error in an imported caption file
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number where the problem was detected
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Errors when serializing or deserializing snapshots
    #[error("Serialization error: {0}")]
    Serde(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl CoreError {
    /// Create time error from invalid format
    pub fn invalid_time<T: fmt::Display>(time: T, reason: &str) -> Self {
        Self::InvalidTime(format!("'{time}': {reason}"))
    }

    /// Create color error from invalid format
    pub fn invalid_color<T: fmt::Display>(color: T) -> Self {
        Self::InvalidColor(format!("{color}"))
    }

    /// Create numeric error from parsing failure
    pub fn invalid_numeric<T: fmt::Display>(value: T, reason: &str) -> Self {
        Self::InvalidNumeric(format!("'{value}': {reason}"))
    }

    /// Create parse error at a given line
    pub fn parse<T: fmt::Display>(line: usize, message: T) -> Self {
        Self::Parse {
            line,
            message: format!("{message}"),
        }
    }

    /// Create serialization error
    pub fn serde<T: fmt::Display>(message: T) -> Self {
        Self::Serde(format!("{message}"))
    }

    /// Check if the caller can fall back to a default and keep rendering
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidTime(_)
            | Self::InvalidColor(_)
            | Self::InvalidNumeric(_)
            | Self::Parse { .. } => true,

            Self::UnsupportedFormat(_) | Self::Serde(_) | Self::Io(_) => false,
        }
    }

    /// Get suggested action for this error
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidTime(_) => Some("Use seconds ('12.5'), 'MM:SS' or 'HH:MM:SS,mmm'"),
            Self::InvalidColor(_) => Some("Use a hex color like '#FFFFFF' or '#6e00ff'"),
            Self::UnsupportedFormat(_) => Some("Use '9:16' (portrait) or '16:9' (landscape)"),
            Self::Parse { .. } => Some("Check that each SRT block has an 'HH:MM:SS,mmm --> HH:MM:SS,mmm' line"),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(CoreError::invalid_time("x", "bad")
            .to_string()
            .starts_with("Invalid time format:"));
        assert!(CoreError::invalid_color("#zz")
            .to_string()
            .contains("#zz"));
        assert_eq!(
            CoreError::parse(4, "missing timing line").to_string(),
            "Parse error at line 4: missing timing line"
        );
    }

    #[test]
    fn recoverability_matches_category() {
        assert!(CoreError::invalid_time("x", "bad").is_recoverable());
        assert!(!CoreError::UnsupportedFormat("4:3".into()).is_recoverable());
        assert!(!CoreError::Io("gone".into()).is_recoverable());
    }

    #[test]
    fn io_errors_convert() {
        let err: CoreError = std::io::Error::other("boom").into();
        assert!(matches!(err, CoreError::Io(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn suggestions_exist_for_user_facing_errors() {
        assert!(CoreError::invalid_time("x", "bad").suggestion().is_some());
        assert!(CoreError::serde("eof").suggestion().is_none());
    }
}
