//! Common traits for archive extractors.

use std::path::Path;

use crate::Result;

/// Trait for archive extraction backends.
///
/// An extractor unpacks the archive at `source` into the existing directory
/// `dest`. Implementations must never write outside `dest`.
pub trait ArchiveExtractor {
    /// Extracts the archive and returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Extraction`](crate::SiftError::Extraction) when
    /// the archive is corrupt, encrypted without a matching password, or uses
    /// an unsupported codec. Files written before the failure stay in `dest`.
    fn extract(&self, source: &Path, dest: &Path, password: Option<&str>) -> Result<usize>;

    /// Returns the archive format name.
    fn format_name(&self) -> &str;
}
