//! Photo source models.
//!
//! These mirror the JSON returned by the source's photo listing endpoint and
//! are only ever deserialized; nothing here outlives the response they came
//! from except through a [`CatalogEntry`](crate::CatalogEntry).

use serde::Deserialize;

/// One page of photo records.
///
/// `count` is the album total as reported by the source, which may exceed
/// `items.len()` when the album spans several pages. Only the first page is
/// ever requested.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoPage {
    pub count: u64,
    pub items: Vec<PhotoRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoRecord {
    pub likes: Likes,
    /// Upload time, Unix epoch seconds.
    pub date: i64,
    pub sizes: Vec<SizeVariant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Likes {
    pub count: u64,
}

/// One rendition of a photo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SizeVariant {
    pub width: u32,
    pub height: u32,
    /// Size label (`s`, `m`, `x`, `w`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}
impl SizeVariant {
    /// Pixel area, widened so that it can never overflow.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}
