//! In-memory photo source for testing.

use crate::backend::PhotoSource;
use crate::error::{ErrorKind, Result};
use crate::models::PhotoPage;
use async_trait::async_trait;
use std::collections::HashMap;

/// Photo source that serves canned pages per owner ID.
///
/// Fetching an owner without a canned page raises
/// [`ErrorKind::Api`], the same way the real API rejects unknown accounts.
#[derive(Debug, Clone)]
pub struct MockSource {
    name: String,
    pages: HashMap<String, PhotoPage>,
}

impl MockSource {
    pub fn with_page(mut self, owner_id: impl Into<String>, page: PhotoPage) -> Self {
        self.pages.insert(owner_id.into(), page);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
impl Default for MockSource {
    fn default() -> Self {
        Self { name: "mock".to_string(), pages: HashMap::new() }
    }
}

#[async_trait]
impl PhotoSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, owner_id: &str) -> Result<PhotoPage> {
        match self.pages.get(owner_id) {
            Some(page) => Ok(page.clone()),
            None => exn::bail!(ErrorKind::Api { code: 30, message: format!("profile {owner_id} is private") }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_owner() {
        let source = MockSource::default().with_name("test");
        assert_eq!(source.name(), "test");
        let err = source.fetch("1").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Api { code: 30, .. }));
    }
}
