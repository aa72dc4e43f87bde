//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Resource does not exist
    #[display("not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Resource already exists (uploads never overwrite)
    #[display("already exists: {_0}")]
    AlreadyExists(#[error(not(source))] String),
    /// Destination could not be reached
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// Destination answered with an unexpected status
    #[display("destination API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, if any.
        message: String,
    },
    /// Destination answered 2xx but the body had the wrong shape
    #[display("malformed response: {_0}")]
    MalformedResponse(#[error(not(source))] String),
    /// Folder path or file name contains invalid characters or escapes root
    #[display("invalid name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Network("down".into()), true)]
    #[case(ErrorKind::Api { status: 503, message: String::new() }, true)]
    #[case(ErrorKind::Api { status: 429, message: String::new() }, true)]
    #[case(ErrorKind::Api { status: 401, message: String::new() }, false)]
    #[case(ErrorKind::AlreadyExists("a".into()), false)]
    #[case(ErrorKind::InvalidName("..".into()), false)]
    fn test_is_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
