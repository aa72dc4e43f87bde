//! In-memory destination backend for testing.

use crate::backend::DestinationBackend;
use crate::error::{ErrorKind, Result};
use crate::{validate_folder, validate_name};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// An upload recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub folder: String,
    pub name: String,
    pub url: String,
}

/// In-memory destination backend for testing.
///
/// Folders are stored in a `HashMap` behind a [`RwLock`], so all trait
/// methods can operate on `&self` without external synchronisation. Uploads
/// add their name to the folder listing and are recorded in order, and the
/// number of [`list`](DestinationBackend::list) calls is counted so tests can
/// check caching.
pub struct MockBackend {
    name: String,
    folders: RwLock<HashMap<String, Vec<String>>>,
    uploads: RwLock<Vec<Upload>>,
    failing: HashSet<String>,
    list_calls: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend pre-populated with folders and their entries.
    ///
    /// Panics if any folder or name fails validation. If test setup is wrong,
    /// then test should not pass.
    pub fn with_folders<F, N>(folders: impl IntoIterator<Item = (F, N)>) -> Self
    where
        F: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let mut map = HashMap::new();
        for (folder, names) in folders {
            let folder = folder.into();
            let Ok(validated) = validate_folder(&folder) else {
                // The panic here is DELIBERATE. There is no error result.
                panic!("MockBackend::with_folders: invalid folder {folder:?}");
            };
            let names: Vec<String> = names.into_iter().map(Into::into).collect();
            if let Some(name) = names.iter().find(|name| validate_name(name).is_err()) {
                panic!("MockBackend::with_folders: invalid name {name:?}");
            }
            map.insert(validated, names);
        }
        Self {
            name: "mock".to_string(),
            folders: RwLock::new(map),
            uploads: RwLock::new(Vec::new()),
            failing: HashSet::new(),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Change the name of the mock backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make every upload of `url` fail with a network error.
    pub fn with_failing_url(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// Uploads performed so far, in order.
    pub async fn uploads(&self) -> Vec<Upload> {
        self.uploads.read().await.clone()
    }

    /// How many times [`list`](DestinationBackend::list) has been called.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let folders: [(&str, [&str; 0]); 0] = [];
        Self::with_folders(folders)
    }
}

#[async_trait]
impl DestinationBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let path = validate_folder(path)?;
        Ok(self.folders.read().await.contains_key(&path))
    }

    async fn create_folder(&self, path: &str) -> Result<()> {
        let path = validate_folder(path)?;
        let mut guard = self.folders.write().await;
        if guard.contains_key(&path) {
            exn::bail!(ErrorKind::AlreadyExists(path));
        }
        guard.insert(path, Vec::new());
        Ok(())
    }

    async fn list(&self, folder: &str) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let folder = validate_folder(folder)?;
        self.folders.read().await.get(&folder).cloned().ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(folder)))
    }

    async fn upload_url(&self, folder: &str, name: &str, url: &str) -> Result<()> {
        let folder = validate_folder(folder)?;
        validate_name(name)?;
        if self.failing.contains(url) {
            exn::bail!(ErrorKind::Network(format!("failed to fetch {url}")));
        }
        let mut guard = self.folders.write().await;
        let entries = guard.get_mut(&folder).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(folder.clone())))?;
        if entries.iter().any(|existing| existing == name) {
            exn::bail!(ErrorKind::AlreadyExists(format!("{folder}/{name}")));
        }
        entries.push(name.to_string());
        self.uploads.write().await.push(Upload { folder, name: name.to_string(), url: url.to_string() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list() {
        let backend = MockBackend::default();
        assert!(!backend.exists("Photos").await.unwrap());
        backend.create_folder("Photos").await.unwrap();
        assert!(backend.exists("Photos").await.unwrap());
        assert!(backend.list("Photos").await.unwrap().is_empty());
        assert_eq!(backend.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_existing_folder() {
        let backend = MockBackend::with_folders([("Photos", ["a.jpeg"])]);
        let err = backend.create_folder("Photos").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_missing_folder() {
        let backend = MockBackend::default();
        let err = backend.list("Nope").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_upload_records_and_lists() {
        let backend = MockBackend::with_folders([("Photos", ["a.jpeg"])]);
        backend.upload_url("Photos", "b.jpeg", "https://example.com/b").await.unwrap();
        assert_eq!(backend.list("Photos").await.unwrap(), vec!["a.jpeg".to_string(), "b.jpeg".to_string()]);
        assert_eq!(
            backend.uploads().await,
            vec![Upload { folder: "Photos".into(), name: "b.jpeg".into(), url: "https://example.com/b".into() }]
        );
    }

    #[tokio::test]
    async fn test_upload_never_overwrites() {
        let backend = MockBackend::with_folders([("Photos", ["a.jpeg"])]);
        let err = backend.upload_url("Photos", "a.jpeg", "https://example.com/a").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_upload_into_missing_folder() {
        let backend = MockBackend::default();
        let err = backend.upload_url("Photos", "a.jpeg", "https://example.com/a").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failing_url() {
        let backend = MockBackend::with_folders([("Photos", [] as [&str; 0])]).with_failing_url("https://bad");
        let err = backend.upload_url("Photos", "a.jpeg", "https://bad").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        assert!(backend.uploads().await.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_invalid_names() {
        let backend = MockBackend::with_folders([("Photos", [] as [&str; 0])]);
        assert!(backend.upload_url("Photos", "../a.jpeg", "u").await.is_err());
        assert!(backend.upload_url("../Photos", "a.jpeg", "u").await.is_err());
    }

    #[test]
    #[should_panic(expected = "invalid folder")]
    fn test_with_folders_panics_on_bad_folder() {
        MockBackend::with_folders([("../escape", ["a.jpeg"])]);
    }
}
