//! Configuration Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, matching the other crates in this workspace.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every variant is fatal: there is nothing to retry when a credential file
/// is missing a key, the user has to go and fix it.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A required key was absent from every configured provider.
    #[display("missing configuration key `{_1}` (from {})", _0.display())]
    Missing(#[error(not(source))] PathBuf, #[error(not(source))] String),
    /// The configuration was present but could not be parsed or had the
    /// wrong shape.
    #[display("invalid configuration: {}", _0.display())]
    Invalid(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
