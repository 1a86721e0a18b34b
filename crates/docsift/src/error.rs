//! Error types for sniffing and walking operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `SiftError`.
pub type Result<T> = std::result::Result<T, SiftError>;

/// Errors that can occur while walking folders and archives.
#[derive(Error, Debug)]
pub enum SiftError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed for a specific entry.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// The path being visited when traversal failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The folder handed to the walker does not exist or is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// An allow-list entry does not name a known file extension.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),

    /// An archive could not be unpacked.
    #[error("failed to extract {format} archive: {reason}")]
    Extraction {
        /// Archive format name (`zip`, `7z`, `rar`).
        format: String,
        /// Human readable failure reason.
        reason: String,
    },

    /// No extractor exists for the requested kind.
    #[error("unsupported archive format")]
    UnsupportedFormat,

    /// The temporary workspace for an archive could not be created.
    #[error("failed to prepare temporary workspace: {0}")]
    Workspace(#[source] std::io::Error),
}

impl SiftError {
    /// Creates an extraction error for the given format.
    pub fn extraction(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the walk can carry on after this error.
    ///
    /// Extraction failures (bad password, corrupt archive, missing codec)
    /// are contained by the walker and only cost the files of that archive.
    /// Filesystem failures end the walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift::SiftError;
    ///
    /// let err = SiftError::extraction("zip", "invalid password");
    /// assert!(err.is_recoverable());
    ///
    /// let err = SiftError::Io(std::io::Error::other("disk gone"));
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Extraction { .. } | Self::UnsupportedFormat)
    }
}

impl From<walkdir::Error> for SiftError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        Self::Walk { path, source }
    }
}
