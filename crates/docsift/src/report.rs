//! Walk statistics.

/// Report of a folder or archive walk.
///
/// Updated as the walk is drained; read it through
/// [`Walk::report`](crate::Walk::report).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Number of documents yielded.
    pub files_yielded: usize,

    /// Number of files skipped (unclassified, not allow-listed, or oversize).
    pub files_skipped: usize,

    /// Number of archives unpacked without error.
    pub archives_extracted: usize,

    /// Number of archives whose extraction failed.
    pub archives_failed: usize,

    /// Warnings generated during the walk.
    pub warnings: Vec<String>,
}

impl WalkReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number of archives the walk tried to unpack.
    #[must_use]
    pub fn archives_seen(&self) -> usize {
        self.archives_extracted + self.archives_failed
    }
}
