//! Folder path and file name validation.
//!
//! Remote paths are plain `/`-separated strings relative to the storage root.
//! These functions make sure that nothing we send escapes that root and that
//! file names stay a single path segment.

use crate::error::{ErrorKind, Result};

/// Validates and normalizes a folder path relative to the storage root.
///
/// Empty and `.` segments are dropped, `..` pops the previous segment and
/// must never leave the root. Null bytes are rejected.
///
/// # Examples
///
/// ```
/// use albumcopy_storage::validate_folder;
/// // Valid paths
/// assert_eq!(validate_folder("VK backups").unwrap(), "VK backups");
/// assert_eq!(validate_folder("/a//b/./c/").unwrap(), "a/b/c");
/// assert_eq!(validate_folder("a/../b").unwrap(), "b");
/// // Invalid paths
/// assert!(validate_folder("../etc").is_err());
/// assert!(validate_folder("a/../..").is_err());
/// assert!(validate_folder("a\0b").is_err());
/// assert!(validate_folder("").is_err());
/// ```
pub fn validate_folder(path: impl AsRef<str>) -> Result<String> {
    let path = path.as_ref();
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if segments.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidName(path.to_string()));
                }
            },
            // Null bytes are accepted by HTTP query encoding but never by the
            // filesystem behind it.
            s if s.contains('\0') => exn::bail!(ErrorKind::InvalidName(path.to_string())),
            s => segments.push(s),
        }
    }
    match segments.is_empty() {
        true => exn::bail!(ErrorKind::InvalidName(path.to_string())),
        false => Ok(segments.join("/")),
    }
}

/// Validates a file name: exactly one non-empty path segment.
///
/// # Examples
///
/// ```
/// use albumcopy_storage::validate_name;
/// assert!(validate_name("0 2020-01-01 time 00-00-00.jpeg").is_ok());
/// assert!(validate_name("a/b.jpeg").is_err());
/// assert!(validate_name("..").is_err());
/// ```
pub fn validate_name(name: impl AsRef<str>) -> Result<()> {
    let name = name.as_ref();
    if name.trim().is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
        exn::bail!(ErrorKind::InvalidName(name.to_string()));
    }
    Ok(())
}
