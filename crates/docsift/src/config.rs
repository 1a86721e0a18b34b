//! Walk configuration and allow-lists.

use std::collections::BTreeSet;

use crate::Result;
use crate::formats::FileExtension;

/// A set of file kinds gating what the walker yields or unpacks.
///
/// # Examples
///
/// ```
/// use docsift::AllowList;
/// use docsift::formats::FileExtension;
///
/// let documents = AllowList::parse(["docx", "JPG"])?;
/// assert!(documents.contains(FileExtension::Jpg));
/// assert!(!documents.contains(FileExtension::Pdf));
/// # Ok::<(), docsift::SiftError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(BTreeSet<FileExtension>);

impl AllowList {
    /// Creates an empty allow-list. Nothing matches it.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allow-list containing every archive kind.
    #[must_use]
    pub fn archives() -> Self {
        FileExtension::ARCHIVES.into_iter().collect()
    }

    /// Allow-list containing every document kind.
    #[must_use]
    pub fn documents() -> Self {
        FileExtension::DOCUMENTS.into_iter().collect()
    }

    /// Parses extension strings such as `"pdf"`, `".DOCX"` or `"jpeg"`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::UnknownExtension`](crate::SiftError::UnknownExtension)
    /// for the first string that names no known kind.
    pub fn parse<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extensions
            .into_iter()
            .map(|ext| ext.as_ref().parse::<FileExtension>())
            .collect()
    }

    /// Adds a kind. Returns `false` if it was already present.
    pub fn insert(&mut self, extension: FileExtension) -> bool {
        self.0.insert(extension)
    }

    /// Returns `true` if `extension` is allowed.
    #[must_use]
    pub fn contains(&self, extension: FileExtension) -> bool {
        self.0.contains(&extension)
    }

    /// Returns `true` if nothing is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of allowed kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the allowed kinds in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = FileExtension> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<FileExtension> for AllowList {
    fn from_iter<T: IntoIterator<Item = FileExtension>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[FileExtension; N]> for AllowList {
    fn from(extensions: [FileExtension; N]) -> Self {
        extensions.into_iter().collect()
    }
}

/// Configuration for folder and archive walks.
///
/// # Examples
///
/// ```
/// use docsift::AllowList;
/// use docsift::WalkConfig;
///
/// // Every document kind, every archive kind, no nested unpacking
/// let config = WalkConfig::default();
///
/// // Customize for specific needs
/// let custom = WalkConfig::default()
///     .with_documents(AllowList::parse(["pdf"])?)
///     .with_recursive(true)
///     .with_password(Some("secret".to_string()));
/// # Ok::<(), docsift::SiftError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Document kinds that are yielded.
    pub documents: AllowList,

    /// Archive kinds that are unpacked.
    pub archives: AllowList,

    /// Unpack archives found inside unpacked archives.
    pub recursive: bool,

    /// Password handed to every archive extraction.
    pub password: Option<String>,

    /// Files larger than this many bytes are skipped with a warning.
    pub max_file_size: Option<u64>,
}

impl Default for WalkConfig {
    /// Default values:
    /// - `documents`: every document kind
    /// - `archives`: every archive kind
    /// - `recursive`: false
    /// - `password`: none
    /// - `max_file_size`: unbounded
    fn default() -> Self {
        Self {
            documents: AllowList::documents(),
            archives: AllowList::archives(),
            recursive: false,
            password: None,
            max_file_size: None,
        }
    }
}

impl WalkConfig {
    /// Creates a configuration from explicit allow-lists.
    ///
    /// Only document kinds in `documents` and archive kinds in `archives`
    /// take effect; a document kind in `archives` is never unpacked and an
    /// archive kind in `documents` is never yielded.
    #[must_use]
    pub fn new(archives: AllowList, documents: AllowList) -> Self {
        Self {
            documents,
            archives,
            ..Self::default()
        }
    }

    /// Sets the yielded document kinds.
    #[must_use]
    pub fn with_documents(mut self, documents: AllowList) -> Self {
        self.documents = documents;
        self
    }

    /// Sets the unpacked archive kinds.
    #[must_use]
    pub fn with_archives(mut self, archives: AllowList) -> Self {
        self.archives = archives;
        self
    }

    /// Enables or disables unpacking of nested archives.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sets the extraction password.
    #[must_use]
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Sets the per-file size cap.
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: Option<u64>) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Returns `true` if `extension` should be yielded.
    #[must_use]
    pub fn yields(&self, extension: FileExtension) -> bool {
        extension.is_document() && self.documents.contains(extension)
    }

    /// Archive allow-list for the contents of an unpacked archive.
    ///
    /// Empty unless `recursive` is set.
    #[must_use]
    pub fn nested_archives(&self) -> AllowList {
        if self.recursive {
            self.archives.clone()
        } else {
            AllowList::empty()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::SiftError;

    #[test]
    fn test_default_config() {
        let config = WalkConfig::default();
        assert_eq!(config.documents.len(), FileExtension::DOCUMENTS.len());
        assert_eq!(config.archives.len(), FileExtension::ARCHIVES.len());
        assert!(!config.recursive);
        assert!(config.password.is_none());
        assert!(config.max_file_size.is_none());
    }

    #[test]
    fn test_parse_deduplicates() {
        let list = AllowList::parse(["jpg", "jpeg", "JPG"]).unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.contains(FileExtension::Jpg));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = AllowList::parse(["pdf", "exe"]).unwrap_err();
        assert!(matches!(err, SiftError::UnknownExtension(ref s) if s == "exe"));
    }

    #[test]
    fn test_nested_archives_follows_recursive_flag() {
        let config = WalkConfig::default();
        assert!(config.nested_archives().is_empty());

        let config = config.with_recursive(true);
        assert_eq!(config.nested_archives(), AllowList::archives());
    }

    #[test]
    fn test_yields_ignores_archive_kinds() {
        let config = WalkConfig::new(
            AllowList::empty(),
            AllowList::from([FileExtension::Zip, FileExtension::Pdf]),
        );
        assert!(config.yields(FileExtension::Pdf));
        assert!(!config.yields(FileExtension::Zip));
    }

    #[test]
    fn test_builder_methods() {
        let config = WalkConfig::default()
            .with_archives(AllowList::from([FileExtension::Zip]))
            .with_documents(AllowList::empty())
            .with_password(Some("pw".to_string()))
            .with_max_file_size(Some(1024));
        assert!(config.archives.contains(FileExtension::Zip));
        assert!(!config.archives.contains(FileExtension::Rar));
        assert!(config.documents.is_empty());
        assert_eq!(config.password.as_deref(), Some("pw"));
        assert_eq!(config.max_file_size, Some(1024));
    }
}
