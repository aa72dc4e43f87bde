use std::collections::HashMap;

/// Insertion-ordered mapping of file name to source URL.
///
/// This is the upload contract handed to
/// [`DestinationStore::create_copy`](crate::DestinationStore::create_copy):
/// names are visited in the order they were first inserted. Re-inserting a
/// name replaces its URL but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the URL for `name`, returning the previous URL.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) -> Option<String> {
        let name = name.into();
        let url = url.into();
        match self.index.get(&name) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, url)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, url));
                None
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&position| self.entries[position].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// `(name, url)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, U: Into<String>> FromIterator<(N, U)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (N, U)>>(iter: I) -> Self {
        let mut manifest = Self::new();
        for (name, url) in iter {
            manifest.insert(name, url);
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let manifest: Manifest = [("c", "3"), ("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(manifest.iter().collect::<Vec<_>>(), vec![("c", "3"), ("a", "1"), ("b", "2")]);
        assert_eq!(manifest.len(), 3);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut manifest = Manifest::new();
        assert_eq!(manifest.insert("a", "1"), None);
        assert_eq!(manifest.insert("b", "2"), None);
        assert_eq!(manifest.insert("a", "3"), Some("1".to_string()));
        assert_eq!(manifest.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
        assert_eq!(manifest.get("a"), Some("3"));
        assert!(manifest.contains("b"));
        assert!(!manifest.contains("c"));
    }
}
