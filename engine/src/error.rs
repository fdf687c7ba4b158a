//! Error types for the roster engine.
//!
//! Collection operations never fail: a missing identifier is a valid,
//! silent outcome. Errors only surface at the conversion and configuration
//! boundaries.

use thiserror::Error;

/// All possible errors from the roster engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Conversion errors
    #[error("entity must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("serialization failed: {0}")]
    Serialization(String),

    // Configuration errors
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::NotAnObject("Array");
        assert_eq!(err.to_string(), "entity must be a JSON object, got Array");

        let err = Error::InvalidConfig("id field must not be empty".into());
        assert_eq!(
            err.to_string(),
            "invalid config: id field must not be empty"
        );
    }

    #[test]
    fn from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
