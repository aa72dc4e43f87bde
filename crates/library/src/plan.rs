//! Upload planning.
//!
//! Walks a [`Catalog`] bucket by bucket and decides, for every photo, the file
//! name it will be stored under and the URL the destination should fetch it
//! from. The result is an [`UploadPlan`]: a [`SummaryEntry`] list for export,
//! and the [`Manifest`] that actually drives the upload.
//!
//! # Naming
//!
//! A like-count held by one photo produces `"{likes}.jpeg"`. A like-count held
//! by several photos produces `"{likes} {date}.jpeg"` for **every** photo in
//! that bucket. Names are assumed unique: two photos with the same like-count
//! uploaded in the same second would collide, in which case the summary lists
//! both and the manifest keeps one key.
//!
//! # URL mapping
//!
//! See [`UrlMapping`].

use crate::error::Result;
use crate::template::NameGenerator;
use albumcopy_source::{Bucket, Catalog};
use albumcopy_storage::Manifest;
use serde::Serialize;
use tracing::instrument;

/// How manifest names are mapped to source URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlMapping {
    /// Zero-like photos map to their own URL; every photo in a bucket with a
    /// positive like-count maps to the URL of the *first* photo in that
    /// bucket.
    ///
    /// Source quirk, preserved for behavioral parity: a bucket of several
    /// photos liked the same number of times gets distinct names that all
    /// upload the same picture.
    #[default]
    Legacy,
    /// Every photo maps to its own URL.
    PerEntry,
}

/// One line of the exported summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    #[serde(rename = "file name")]
    pub file_name: String,
    pub size: String,
}

/// Output of [`UploadPlanner::plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPlan {
    /// One entry per catalogued photo, in bucket-then-entry order. Never
    /// deduplicated.
    pub summary: Vec<SummaryEntry>,
    /// File name → URL, in first-insertion order.
    pub manifest: Manifest,
}

pub struct UploadPlanner {
    names: NameGenerator,
    mapping: UrlMapping,
}
impl UploadPlanner {
    pub fn new(names: NameGenerator, mapping: UrlMapping) -> Self {
        Self { names, mapping }
    }

    #[instrument(skip_all, fields(photos = catalog.len(), mapping = ?self.mapping))]
    pub fn plan(&self, catalog: &Catalog) -> Result<UploadPlan> {
        let mut plan = UploadPlan::default();
        for bucket in catalog.buckets() {
            let shared = bucket.len() > 1;
            for (position, entry) in bucket.entries().iter().enumerate() {
                let file_name = self.names.generate(entry, shared)?;
                plan.summary.push(SummaryEntry { file_name: file_name.clone(), size: entry.size.clone() });
                let url = self.source_url(bucket, position);
                if let Some(previous) = plan.manifest.insert(file_name.clone(), url)
                    && previous != url
                {
                    tracing::warn!(file_name = %file_name, "Two photos produced the same file name; keeping the later URL");
                }
            }
        }
        tracing::debug!(summary = plan.summary.len(), manifest = plan.manifest.len(), "Planned uploads");
        Ok(plan)
    }

    /// URL for the entry at `position` within `bucket`.
    fn source_url<'a>(&self, bucket: &'a Bucket, position: usize) -> &'a str {
        let entries = bucket.entries();
        match self.mapping {
            UrlMapping::PerEntry => &entries[position].url,
            // All zero-like photos share one bucket, so the position is a
            // bounded index into that bucket alone.
            UrlMapping::Legacy if bucket.likes() == 0 => &entries[position].url,
            UrlMapping::Legacy => &entries[0].url,
        }
    }
}
