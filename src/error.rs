use thiserror::Error;

/// Unified error type for stampver operations
#[derive(Error, Debug)]
pub enum StampError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Format error: {0}")]
    Format(String),
}

/// Convenience type alias for Results in stampver
pub type Result<T> = std::result::Result<T, StampError>;

impl StampError {
    /// Create an XML error with context
    pub fn xml(msg: impl Into<String>) -> Self {
        StampError::Xml(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        StampError::Version(msg.into())
    }

    /// Create a format error with context
    pub fn format(msg: impl Into<String>) -> Self {
        StampError::Format(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StampError::xml("unexpected end of document");
        assert_eq!(err.to_string(), "XML error: unexpected end of document");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StampError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(StampError::version("test").to_string().contains("Version"));
        assert!(StampError::format("test").to_string().contains("Format"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (StampError::xml("x"), "XML error"),
            (StampError::version("x"), "Version parsing error"),
            (StampError::format("x"), "Format error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_empty_messages() {
        let errors = vec![
            StampError::xml(""),
            StampError::version(""),
            StampError::format(""),
        ];

        for err in errors {
            // Even with empty message, the error type prefix should be present
            assert!(!err.to_string().is_empty());
        }
    }
}
