//! Like-count catalogue.
//!
//! Turns raw [`PhotoRecord`]s into [`CatalogEntry`]s (best size variant plus
//! a formatted upload time) grouped into [`Bucket`]s by like-count. Bucket
//! order is the order in which each like-count first appeared in the source,
//! and entries keep source order within their bucket.

use crate::backend::PhotoSource;
use crate::error::{ErrorKind, Result};
use crate::models::PhotoRecord;
use crate::select::largest_variant;
use crate::timestamp::{Zone, format_timestamp};
use exn::OptionExt;
use std::collections::HashMap;
use tracing::instrument;

/// A photo reduced to what naming and uploading need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub likes: u64,
    /// Upload time, already formatted for use in file names.
    pub date: String,
    /// URL of the largest size variant.
    pub url: String,
    /// Size label of the largest size variant.
    pub size: String,
}
impl CatalogEntry {
    /// Select the best variant and format the upload time of one record.
    pub fn from_record(record: &PhotoRecord, zone: &dyn Zone) -> Result<Self> {
        let best = largest_variant(&record.sizes)
            .ok_or_raise(|| ErrorKind::MalformedResponse(format!("photo dated {} has no size variants", record.date)))?;
        Ok(Self {
            likes: record.likes.count,
            date: format_timestamp(record.date, zone)?,
            url: best.url.clone(),
            size: best.kind.clone(),
        })
    }
}

/// All catalogue entries sharing one like-count. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    likes: u64,
    entries: Vec<CatalogEntry>,
}
impl Bucket {
    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a bucket is only created alongside its first entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Insertion-ordered mapping of like-count to [`Bucket`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    buckets: Vec<Bucket>,
}
impl Catalog {
    /// Group already-built entries by like-count, preserving order.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut index: HashMap<u64, usize> = HashMap::new();
        let mut buckets: Vec<Bucket> = Vec::new();
        for entry in entries {
            match index.get(&entry.likes) {
                Some(&position) => buckets[position].entries.push(entry),
                None => {
                    index.insert(entry.likes, buckets.len());
                    buckets.push(Bucket { likes: entry.likes, entries: vec![entry] });
                },
            }
        }
        Self { buckets }
    }

    /// Build the catalogue from raw records. Fails on the first record that
    /// has no size variants or an unrepresentable timestamp.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PhotoRecord>, zone: &dyn Zone) -> Result<Self> {
        let entries = records
            .into_iter()
            .map(|record| CatalogEntry::from_record(record, zone))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_entries(entries))
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn get(&self, likes: u64) -> Option<&Bucket> {
        self.buckets.iter().find(|bucket| bucket.likes == likes)
    }

    /// Like-counts in catalogue order.
    pub fn likes(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.iter().map(Bucket::likes)
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Fetch the first page of an account's photos and catalogue them.
#[instrument(skip(source, zone), fields(source = source.name()))]
pub async fn build_catalog(source: &dyn PhotoSource, owner_id: &str, zone: &dyn Zone) -> Result<Catalog> {
    let page = source.fetch(owner_id).await?;
    let fetched = page.items.len() as u64;
    if page.count > fetched {
        tracing::warn!(total = page.count, fetched, "Album has more photos than one page; only the first page is used");
    }
    let catalog = Catalog::from_records(&page.items, zone)?;
    tracing::info!(photos = catalog.len(), like_counts = catalog.buckets().len(), "Catalogued photos");
    Ok(catalog)
}
