//! File name templating for planned uploads.
//!
//! Converts [`CatalogEntry`] data into file names using [upon] templates.
//! The template syntax follows upon's Mustache-like conventions
//! (`{{ variable }}`, `{{ value|formatter }}`).
//!
//! Two templates are needed: one for a like-count that only a single photo
//! has, and one for a like-count shared by several photos, which must
//! include something that tells those photos apart.
//!
//! # Template Variables
//!
//! | Variable | Type     | Description                                         |
//! |----------|----------|-----------------------------------------------------|
//! | `likes`  | `u64`    | Like count of the photo                             |
//! | `date`   | `String` | Upload time, formatted `YYYY-MM-DD time HH-MM-SS`   |
//! | `size`   | `String` | Size label of the chosen variant                    |
//!
//! # Example
//!
//! ```
//! use albumcopy_library::{NameGenerator, DEFAULT_TEMPLATE_MULTIPLE, DEFAULT_TEMPLATE_SINGLE};
//! use albumcopy_source::CatalogEntry;
//!
//! let entry = CatalogEntry {
//!     likes: 12,
//!     date: "2021-03-04 time 05-06-07".into(),
//!     url: "https://example.com/photo.jpg".into(),
//!     size: "z".into(),
//! };
//! let names = NameGenerator::new(DEFAULT_TEMPLATE_SINGLE, DEFAULT_TEMPLATE_MULTIPLE).unwrap();
//! assert_eq!(names.generate(&entry, false).unwrap(), "12.jpeg");
//! assert_eq!(names.generate(&entry, true).unwrap(), "12 2021-03-04 time 05-06-07.jpeg");
//! ```

use crate::error::{ErrorKind, Result};
use albumcopy_source::CatalogEntry;
use albumcopy_storage::validate_name;
use exn::ResultExt;
use tracing::instrument;
use upon::{Engine, Template};

/// Name of a photo whose like-count no other photo has.
pub const DEFAULT_TEMPLATE_SINGLE: &str = "{{ likes }}";
/// Name of a photo sharing its like-count with others.
pub const DEFAULT_TEMPLATE_MULTIPLE: &str = "{{ likes }} {{ date }}";
/// Every uploaded photo gets this extension, whatever the source served.
pub const EXTENSION: &str = "jpeg";

/// Generates file names from [`CatalogEntry`] data and a pair of templates.
///
/// Both templates are compiled eagerly so that syntax errors surface at
/// creation time rather than halfway through planning.
pub struct NameGenerator {
    engine: Engine<'static>,
    single: Template<'static>,
    multiple: Template<'static>,
}
impl NameGenerator {
    pub fn new(single: impl AsRef<str>, multiple: impl AsRef<str>) -> Result<Self> {
        let engine = Engine::new();
        let single = engine.compile(single.as_ref().to_string()).or_raise(|| ErrorKind::Template)?;
        let multiple = engine.compile(multiple.as_ref().to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, single, multiple })
    }

    /// Renders the appropriate template and appends [`EXTENSION`].
    ///
    /// `shared` selects the template for a like-count held by more than one
    /// photo. The result must be usable as a single file name inside the
    /// destination folder.
    #[instrument(skip_all, fields(likes = entry.likes, shared))]
    pub fn generate(&self, entry: &CatalogEntry, shared: bool) -> Result<String> {
        let template = if shared { &self.multiple } else { &self.single };
        let stem = template.render(&self.engine, Self::parameters(entry)).to_string().or_raise(|| ErrorKind::Template)?;
        let name = format!("{}.{EXTENSION}", stem.trim());
        validate_name(&name).or_raise(|| ErrorKind::InvalidName(name.clone()))?;
        Ok(name)
    }

    fn parameters(entry: &CatalogEntry) -> upon::Value {
        upon::value! {
            likes: entry.likes,
            date: entry.date.as_str(),
            size: entry.size.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(likes: u64) -> CatalogEntry {
        CatalogEntry {
            likes,
            date: "1970-01-01 time 00-00-00".to_string(),
            url: "https://example.com/a.jpg".to_string(),
            size: "w".to_string(),
        }
    }

    fn defaults() -> NameGenerator {
        NameGenerator::new(DEFAULT_TEMPLATE_SINGLE, DEFAULT_TEMPLATE_MULTIPLE).unwrap()
    }

    #[rstest]
    #[case(0, false, "0.jpeg")]
    #[case(7, false, "7.jpeg")]
    #[case(0, true, "0 1970-01-01 time 00-00-00.jpeg")]
    #[case(5, true, "5 1970-01-01 time 00-00-00.jpeg")]
    fn test_default_names(#[case] likes: u64, #[case] shared: bool, #[case] expected: &str) {
        assert_eq!(defaults().generate(&entry(likes), shared).unwrap(), expected);
    }

    #[test]
    fn test_custom_templates() {
        let names = NameGenerator::new("likes-{{ likes }}", "{{ likes }}_{{ size }}_{{ date }}").unwrap();
        assert_eq!(names.generate(&entry(3), false).unwrap(), "likes-3.jpeg");
        assert_eq!(names.generate(&entry(3), true).unwrap(), "3_w_1970-01-01 time 00-00-00.jpeg");
    }

    #[test]
    fn test_invalid_syntax() {
        let err = NameGenerator::new("{{ likes", DEFAULT_TEMPLATE_MULTIPLE).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Template));
    }

    #[test]
    fn test_unknown_variable() {
        let names = NameGenerator::new("{{ nope }}", DEFAULT_TEMPLATE_MULTIPLE).unwrap();
        let err = names.generate(&entry(1), false).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Template));
    }

    #[test]
    fn test_rejects_nested_paths() {
        let names = NameGenerator::new("{{ likes }}/{{ size }}", DEFAULT_TEMPLATE_MULTIPLE).unwrap();
        let err = names.generate(&entry(1), false).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidName(name) if name == "1/w.jpeg"));
    }
}
