//! Photo Source Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A photo source error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for photo source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The source API could not be reached, or the connection broke mid-response.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The source API answered with an error object instead of a response.
    #[display("source API error {code}: {message}")]
    Api {
        /// API-specific error code.
        code: i64,
        /// Human-readable message from the API.
        message: String,
    },
    /// The response did not have the expected shape (missing fields, a photo
    /// without size variants, a timestamp out of range...).
    #[display("malformed response: {_0}")]
    MalformedResponse(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Nothing in this crate actually retries; the flag exists so callers
    /// can decide for themselves.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
