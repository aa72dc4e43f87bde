//! Photo source trait and implementations.
//!
//! A [`PhotoSource`] hands back one page of [`PhotoRecord`](crate::models::PhotoRecord)s
//! for an account. The real implementation talks to the VK API; tests use
//! [`MockSource`].

#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(feature = "vk")]
mod vk;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockSource;
#[cfg(feature = "vk")]
pub use self::vk::VkSource;
use crate::error::Result;
use crate::models::PhotoPage;
use async_trait::async_trait;

/// Read side of the copy: lists an account's photos.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Name of the configured source, used for logging only.
    fn name(&self) -> &str;

    /// Fetch the first page of the account's wall album.
    ///
    /// The page's `count` is the album total reported by the source and may
    /// exceed the number of items returned.
    async fn fetch(&self, owner_id: &str) -> Result<PhotoPage>;
}
