//! Destination backend trait and implementations.
//!
//! This module defines the `DestinationBackend` trait, the handful of
//! remote operations a copy needs: does a folder exist, create it, list it,
//! and have the destination fetch a URL into it.

#[cfg(any(test, feature = "mock"))]
mod mock;
mod ro;
#[cfg(feature = "yandex")]
mod yandex;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
#[cfg(feature = "yandex")]
pub use self::yandex::YandexDiskBackend;
use crate::error::Result;
use async_trait::async_trait;

/// Unified interface for destination backends.
///
/// # Path Handling
/// Folder paths are relative to the storage root and must be validated using
/// [`validate_folder`](crate::validate_folder) before use; file names must
/// pass [`validate_name`](crate::validate_name). Implementations should
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use albumcopy_storage::{backend::DestinationBackend, error::Result};
///
/// async fn upload_once(backend: &dyn DestinationBackend, url: &str) -> Result<bool> {
///     if !backend.exists("Photos").await? {
///         backend.create_folder("Photos").await?;
///     }
///     if backend.list("Photos").await?.iter().any(|name| name == "0.jpeg") {
///         return Ok(false);
///     }
///     backend.upload_url("Photos", "0.jpeg", url).await?;
///     Ok(true)
/// }
/// ```
#[async_trait]
pub trait DestinationBackend: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// Whether writes are dropped instead of performed.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Check whether a folder (or any resource) exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Create a folder. Its parent must already exist.
    ///
    /// Returns [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists) if
    /// something is already there.
    async fn create_folder(&self, path: &str) -> Result<()>;

    /// Names of the entries directly inside `folder`.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the folder
    /// does not exist.
    async fn list(&self, folder: &str) -> Result<Vec<String>>;

    /// Ask the destination to fetch `url` and store it as `folder/name`.
    ///
    /// Never overwrites: returns
    /// [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists) if the name
    /// is taken. The fetch may complete asynchronously on the remote side
    /// after this returns.
    async fn upload_url(&self, folder: &str, name: &str, url: &str) -> Result<()>;
}
