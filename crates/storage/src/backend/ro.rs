//! Readonly destination backend.
//!
//! This module provides a backend implementation that wraps other
//! implementations and prevents write operations from executing, but
//! indicating success on return.

use crate::backend::DestinationBackend;
use crate::error::{ErrorKind, Result};
use crate::BackendHandle;
use async_trait::async_trait;

/// Read-only destination backend.
///
/// Wraps another backend and silently drops folder creation and uploads,
/// logging an [`info event`](tracing::Event) for each. A folder that would
/// have been created lists as empty.
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DestinationBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        self.inner.exists(path).await
    }

    async fn create_folder(&self, path: &str) -> Result<()> {
        tracing::info!(path, "Skipping folder creation during read-only mode");
        Ok(())
    }

    async fn list(&self, folder: &str) -> Result<Vec<String>> {
        match self.inner.list(folder).await {
            Err(e) if matches!(&*e, ErrorKind::NotFound(_)) => Ok(Vec::new()),
            result => result,
        }
    }

    async fn upload_url(&self, folder: &str, name: &str, url: &str) -> Result<()> {
        tracing::info!(folder, name, url, "Skipping upload during read-only mode");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_drops_writes() {
        let inner = Arc::new(MockBackend::with_folders([("Photos", ["0.jpeg"])]));
        let backend = ReadOnlyBackend::new(inner.clone());
        backend.create_folder("New").await.unwrap();
        backend.upload_url("Photos", "1.jpeg", "https://example.com/1.jpg").await.unwrap();
        assert!(!inner.exists("New").await.unwrap());
        assert_eq!(inner.list("Photos").await.unwrap(), vec!["0.jpeg".to_string()]);
        assert!(inner.uploads().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_folder_lists_empty() {
        let backend = ReadOnlyBackend::new(Arc::new(MockBackend::default()));
        assert!(backend.list("Nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_pass_through() {
        let inner = Arc::new(MockBackend::with_folders([("Photos", ["a.jpeg"])]).with_name("ro"));
        assert!(!inner.is_read_only());
        let backend = ReadOnlyBackend::new(inner);
        assert_eq!(backend.name(), "ro");
        assert!(backend.is_read_only());
        assert!(backend.exists("Photos").await.unwrap());
        assert_eq!(backend.list("Photos").await.unwrap(), vec!["a.jpeg".to_string()]);
    }
}
