//! Scoped temporary workspace for one archive extraction.
//!
//! A [`Workspace`] owns a temporary directory that receives the extracted
//! entries and a temporary file holding the raw archive bytes. The file name
//! carries the sniffed extension so format-detecting extractors pick the
//! right codec. Both are deleted when the workspace is dropped, whether the
//! extraction succeeded, failed, or the walk was abandoned half way.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tempfile::TempDir;

use crate::Result;
use crate::SiftError;
use crate::formats::FileExtension;
use crate::formats::common::ExtractorResolver;

const TEMP_PREFIX: &str = "docsift-";

/// Lifecycle of one archive extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveState {
    /// Workspace created, archive bytes written.
    Created,
    /// Extractor running.
    Extracting,
    /// Extractor finished without error.
    Extracted,
    /// Extractor failed; the directory may hold a partial extraction.
    ExtractionFailed,
    /// The extracted directory is being walked.
    WalkingTemp,
}

/// Temporary directory and archive file scoped to one extraction.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    archive: NamedTempFile,
    extension: FileExtension,
    state: ArchiveState,
}

impl Workspace {
    /// Creates the workspace and writes `content` to the archive file.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Workspace`] if the temporary directory or file
    /// cannot be created or written.
    pub fn create(content: &[u8], extension: FileExtension) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()
            .map_err(SiftError::Workspace)?;

        let suffix = format!(".{extension}");
        let mut archive = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile()
            .map_err(SiftError::Workspace)?;
        archive.write_all(content).map_err(SiftError::Workspace)?;
        archive.flush().map_err(SiftError::Workspace)?;

        Ok(Self {
            dir,
            archive,
            extension,
            state: ArchiveState::Created,
        })
    }

    /// Directory receiving the extracted entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Temporary file holding the raw archive bytes.
    #[must_use]
    pub fn archive_path(&self) -> &Path {
        self.archive.path()
    }

    /// Sniffed archive kind.
    #[must_use]
    pub fn extension(&self) -> FileExtension {
        self.extension
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ArchiveState {
        self.state
    }

    /// Runs the extractor chosen by `resolver` against the archive file.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::UnsupportedFormat`] if `resolver` has no backend
    /// for the kind, or the extractor's error.
    pub fn extract(
        &mut self,
        resolver: ExtractorResolver,
        password: Option<&str>,
    ) -> Result<usize> {
        self.state = ArchiveState::Extracting;
        let result = resolver(self.extension)
            .ok_or(SiftError::UnsupportedFormat)
            .and_then(|extractor| {
                extractor.extract(self.archive.path(), self.dir.path(), password)
            });

        self.state = if result.is_ok() {
            ArchiveState::Extracted
        } else {
            ArchiveState::ExtractionFailed
        };
        result
    }

    /// Marks the extracted directory as being walked.
    pub fn begin_walk(&mut self) {
        self.state = ArchiveState::WalkingTemp;
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        tracing::trace!(
            dir = %self.dir.path().display(),
            state = ?self.state,
            "releasing archive workspace"
        );
    }
}
