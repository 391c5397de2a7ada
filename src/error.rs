//! Error types for the locker library.
//!
//! Uses thiserror for derive macros and provides caller-actionable error messages.

use thiserror::Error;

/// Main error type for locker operations.
///
/// Store failures are never retried by this layer; they surface here on the
/// specific operation that hit them. Read misses are not errors: absent keys
/// come back as `Ok(None)` or `Ok(false)` from the relevant operations.
#[derive(Error, Debug)]
pub enum LockerError {
    /// Caller passed an invalid argument (e.g., an empty category or id).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing store rejected or failed an operation.
    #[error("store operation failed: {0}")]
    Store(String),

    /// A key-search pattern could not be compiled.
    #[error("invalid key pattern: {0}")]
    Pattern(String),
}

/// Result type alias for locker operations.
pub type Result<T> = std::result::Result<T, LockerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_message_is_descriptive() {
        let err = LockerError::InvalidArgument("category must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid argument: category must not be empty"
        );
    }

    #[test]
    fn store_error_message_carries_cause() {
        let err = LockerError::Store("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn pattern_error_message_carries_cause() {
        let err = LockerError::Pattern("unclosed alternate group".to_string());
        assert!(err.to_string().contains("unclosed alternate group"));
    }
}
