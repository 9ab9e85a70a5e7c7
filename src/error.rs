//! Error types for the tradelog reconstructor.
//!
//! Clean error handling using `thiserror` for ergonomic error definitions.
//!
//! Note that almost nothing that happens *during* parsing is an error:
//! malformed lines, unknown event types and unresolvable order events are
//! skipped and counted, never surfaced. The error type exists for the
//! boundary of the parse — a missing source file or an I/O failure while
//! reading it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for reconstructor operations.
pub type Result<T> = std::result::Result<T, TradelogError>;

/// Main error type for reconstructor operations.
#[derive(Error, Debug, Clone)]
pub enum TradelogError {
    /// The log file does not exist.
    ///
    /// This is the "no data" outcome of a parse: distinct from a file that
    /// exists but contains no recognized events, which yields an empty
    /// (but valid) dataset.
    #[error("log file not found: {0}")]
    MissingSource(PathBuf),

    /// Generic error with context (I/O failures while reading, etc.).
    #[error("Error: {0}")]
    Generic(String),
}

impl TradelogError {
    /// Create a generic error from any string-like type.
    pub fn generic(msg: impl Into<String>) -> Self {
        TradelogError::Generic(msg.into())
    }

    /// Whether this is the missing-source ("no data") outcome.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, TradelogError::MissingSource(_))
    }
}

// Implement From for common error types for ergonomic error handling
impl From<std::io::Error> for TradelogError {
    fn from(err: std::io::Error) -> Self {
        TradelogError::Generic(format!("IO error: {err}"))
    }
}

impl From<String> for TradelogError {
    fn from(err: String) -> Self {
        TradelogError::Generic(err)
    }
}

impl From<&str> for TradelogError {
    fn from(err: &str) -> Self {
        TradelogError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TradelogError::MissingSource(PathBuf::from("/tmp/missing.csv"));
        assert_eq!(err.to_string(), "log file not found: /tmp/missing.csv");
        assert!(err.is_missing_source());
    }

    #[test]
    fn test_result_type() {
        let result: Result<i32> = Err(TradelogError::generic("bad"));
        assert!(result.is_err());
        assert!(!result.unwrap_err().is_missing_source());
    }
}
