//! Entry filtering for folder walks.

use std::ffi::OsStr;
use std::path::Path;

/// Names skipped unconditionally: archive-manager and OS metadata.
pub const IGNORED_NAMES: [&str; 2] = ["__MACOSX", ".DS_Store"];

/// Checks if an entry must be skipped, and not descended into.
///
/// Only the final component is compared, and only for an exact match.
///
/// # Examples
///
/// ```
/// use docsift::walk::filters;
/// use std::path::Path;
///
/// assert!(filters::is_ignored(Path::new("photos/__MACOSX")));
/// assert!(filters::is_ignored(Path::new(".DS_Store")));
/// assert!(!filters::is_ignored(Path::new("__MACOSX.txt")));
/// ```
#[must_use]
pub fn is_ignored(path: &Path) -> bool {
    path.file_name().is_some_and(is_ignored_name)
}

fn is_ignored_name(name: &OsStr) -> bool {
    IGNORED_NAMES.iter().any(|ignored| name == *ignored)
}
