//! Idempotent copy into a destination folder.
//!
//! [`DestinationStore`] owns one destination folder on one backend. It makes
//! sure the folder exists, lists it once, and then copies a [`Manifest`] into
//! it by URL, never re-uploading a name that was already there.
//!
//! The listing is cached for the lifetime of the store and never refreshed.
//! Uploads within one run are assumed never to collide with other concurrent
//! writers. Names the store uploads itself are remembered, so copying the
//! same manifest twice through one store skips them the second time.
//!
//! Over a [read-only](crate::backend::DestinationBackend::is_read_only)
//! backend nothing is written: log lines say what *would* happen and the
//! [`CopyReport`] is marked as a dry run.

use crate::error::{ErrorKind, Result};
use crate::{BackendHandle, Manifest, validate_folder};
use async_stream::stream;
use futures::{Stream, TryStreamExt};
use std::collections::HashSet;
use std::pin::pin;
use tokio::sync::{Mutex, OnceCell};
use tracing::instrument;

/// What [`DestinationStore::ensure_folder`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    Created,
    AlreadyExists,
}

/// Progress events emitted by [`DestinationStore::create_copy`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`Listed`](Self::Listed): exactly once, with the number of entries
///    already in the folder.
/// 3. [`Skipped`](Self::Skipped) / [`Copied`](Self::Copied): zero or more
///    times, one per visited manifest entry, in manifest order.
/// 4. [`Complete`](Self::Complete): exactly once, signalling the stream is
///    finished.
///
/// An error terminates the stream early, in which case
/// [`Complete`](Self::Complete) is never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyEvent {
    /// Copying has begun: `total` manifest entries, at most `limit` visited.
    Started { total: usize, limit: usize },
    /// The folder listing is available.
    Listed(usize),
    /// The name was already in the folder; nothing uploaded.
    Skipped(String),
    /// The destination accepted an upload-by-URL for this name.
    Copied(String),
    /// All visited entries are done.
    Complete,
}

/// Outcome of [`DestinationStore::copy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Newly uploaded names, in order.
    pub copied: Vec<String>,
    /// Names skipped because they were already present, in order.
    pub skipped: Vec<String>,
    /// Number of entries in the manifest, visited or not.
    pub total: usize,
    /// The backend dropped every write; `copied` lists what would have been
    /// uploaded.
    pub dry_run: bool,
}

pub struct DestinationStore {
    backend: BackendHandle,
    folder: String,
    existing: OnceCell<HashSet<String>>,
    uploaded: Mutex<HashSet<String>>,
}

impl DestinationStore {
    /// Validate the folder path and make sure the folder exists.
    pub async fn new(backend: BackendHandle, folder: impl AsRef<str>) -> Result<Self> {
        let store = Self {
            backend,
            folder: validate_folder(folder)?,
            existing: OnceCell::new(),
            uploaded: Mutex::new(HashSet::new()),
        };
        store.ensure_folder().await?;
        Ok(store)
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Create the folder unless it already exists.
    ///
    /// Check-then-create is not atomic; if something else creates the folder
    /// in between, the backend's "already exists" answer is accepted.
    #[instrument(skip(self), fields(backend = self.backend.name(), folder = %self.folder))]
    pub async fn ensure_folder(&self) -> Result<FolderStatus> {
        if self.backend.exists(&self.folder).await? {
            tracing::info!("Folder already exists; files with the same names will not be copied");
            return Ok(FolderStatus::AlreadyExists);
        }
        match self.backend.create_folder(&self.folder).await {
            Ok(()) if self.backend.is_read_only() => {
                tracing::info!(dry_run = true, "Folder would be created");
                Ok(FolderStatus::Created)
            },
            Ok(()) => {
                tracing::info!("Folder created");
                Ok(FolderStatus::Created)
            },
            Err(e) if matches!(&*e, ErrorKind::AlreadyExists(_)) => {
                tracing::info!("Folder appeared concurrently; files with the same names will not be copied");
                Ok(FolderStatus::AlreadyExists)
            },
            Err(e) => Err(e),
        }
    }

    /// Names in the folder when it was first listed, fetched on first call
    /// and cached. Uploads made through this store are not included.
    pub async fn list_folder(&self) -> Result<&HashSet<String>> {
        self.existing
            .get_or_try_init(|| async {
                let names: HashSet<String> = self.backend.list(&self.folder).await?.into_iter().collect();
                tracing::debug!(folder = %self.folder, entries = names.len(), "Listed destination folder");
                Ok(names)
            })
            .await
    }

    /// Streams [`CopyEvent`]s while copying `manifest` into the folder.
    ///
    /// At most `max_new` manifest entries are *visited*, in manifest order;
    /// entries past that point are never looked at, even when some visited
    /// entries were skipped as duplicates. Since every visit copies at most
    /// one file, this also bounds the number of new files to `max_new`.
    ///
    /// Duplicates are not errors: they yield [`CopyEvent::Skipped`] and log a
    /// warning. Any backend failure ends the stream with that error.
    pub fn create_copy<'a>(
        &'a self,
        manifest: &'a Manifest,
        max_new: usize,
    ) -> impl Stream<Item = Result<CopyEvent>> + 'a {
        // `rustfmt` does not format macros that use braces. Wrap in parentheses!
        stream!({
            yield Ok(CopyEvent::Started { total: manifest.len(), limit: max_new });

            let existing = match self.list_folder().await {
                Ok(existing) => existing,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            yield Ok(CopyEvent::Listed(existing.len()));
            let dry_run = self.backend.is_read_only();

            for (name, url) in manifest.iter().take(max_new) {
                if existing.contains(name) || self.uploaded.lock().await.contains(name) {
                    tracing::warn!(name, folder = %self.folder, "File already exists, skipping");
                    yield Ok(CopyEvent::Skipped(name.to_string()));
                    continue;
                }
                if let Err(e) = self.backend.upload_url(&self.folder, name, url).await {
                    yield Err(e);
                    return;
                }
                if dry_run {
                    tracing::info!(name, dry_run, "Would copy");
                } else {
                    self.uploaded.lock().await.insert(name.to_string());
                    tracing::info!(name, "Copied");
                }
                yield Ok(CopyEvent::Copied(name.to_string()));
            }

            yield Ok(CopyEvent::Complete);
        })
    }

    /// Runs [`create_copy`](Self::create_copy) to completion and collects
    /// the outcome.
    #[instrument(skip_all, fields(backend = self.backend.name(), folder = %self.folder, max_new))]
    pub async fn copy(&self, manifest: &Manifest, max_new: usize) -> Result<CopyReport> {
        let mut report =
            CopyReport { total: manifest.len(), dry_run: self.backend.is_read_only(), ..CopyReport::default() };
        let mut events = pin!(self.create_copy(manifest, max_new));
        while let Some(event) = events.try_next().await? {
            match event {
                CopyEvent::Skipped(name) => report.skipped.push(name),
                CopyEvent::Copied(name) => report.copied.push(name),
                CopyEvent::Started { .. } | CopyEvent::Listed(_) | CopyEvent::Complete => {},
            }
        }
        if report.dry_run {
            tracing::info!(would_copy = report.copied.len(), total = report.total, "Dry run complete; nothing was uploaded");
        } else {
            tracing::info!(copied = report.copied.len(), total = report.total, "Backup complete");
        }
        Ok(report)
    }
}
