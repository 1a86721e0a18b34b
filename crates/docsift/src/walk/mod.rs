//! Lazy folder and archive walking.
//!
//! A [`Walk`] is an iterator over the documents found under a folder or
//! inside an archive. Archives found along the way are unpacked into a
//! [`Workspace`] and walked in turn. The walk keeps an explicit stack of
//! frames instead of recursing, so nesting depth is bounded by the archive
//! structure only. Each frame owns its workspace; popping or dropping the
//! frame deletes it.
//!
//! # Examples
//!
//! ```no_run
//! use docsift::AllowList;
//! use docsift::Walker;
//! use docsift::WalkConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WalkConfig::new(AllowList::parse(["zip"])?, AllowList::parse(["pdf", "docx"])?);
//! for file in Walker::new(config).walk_folder("/srv/inbox")? {
//!     let file = file?;
//!     println!("{} ({} bytes)", file.label, file.content.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod filters;
pub mod workspace;

use std::iter::FusedIterator;
use std::path::Path;

use walkdir::DirEntry;
use walkdir::FilterEntry;
use walkdir::WalkDir;

use crate::AllowList;
use crate::Result;
use crate::SiftError;
use crate::WalkConfig;
use crate::WalkReport;
use crate::formats::FileExtension;
use crate::formats::classify;
use crate::formats::common::ExtractorResolver;
use crate::formats::common::extractor_for;
use crate::path::basename_without_extension;

pub use workspace::ArchiveState;
pub use workspace::Workspace;

type Entries = FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>;

/// A document found by a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Full file content.
    pub content: Vec<u8>,

    /// Original stem plus the sniffed extension (`report.docx`), or the bare
    /// extension when the file has no stem.
    pub label: String,

    /// Sniffed kind.
    pub extension: FileExtension,
}

impl ExtractedFile {
    /// Splits the file into its `(content, label)` pair.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.content, self.label)
    }
}

/// Entry point for folder and archive walks.
#[derive(Debug, Clone)]
pub struct Walker {
    config: WalkConfig,
    resolver: ExtractorResolver,
}

impl Walker {
    /// Creates a walker using the built-in extraction backends.
    #[must_use]
    pub fn new(config: WalkConfig) -> Self {
        Self {
            config,
            resolver: extractor_for,
        }
    }

    /// Replaces the function that picks an extraction backend per archive
    /// kind.
    #[must_use]
    pub fn with_resolver(mut self, resolver: ExtractorResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Returns the walk configuration.
    #[must_use]
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Walks a folder tree depth-first.
    ///
    /// Nothing is read until the returned [`Walk`] is advanced.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::NotADirectory`] if `folder` is not an existing
    /// directory.
    pub fn walk_folder(&self, folder: impl AsRef<Path>) -> Result<Walk> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(SiftError::NotADirectory {
                path: folder.to_path_buf(),
            });
        }

        let mut walk = Walk::new(self.config.clone(), self.resolver);
        walk.stack.push(Frame {
            entries: directory_entries(folder),
            archives: self.config.archives.clone(),
            workspace: None,
        });
        Ok(walk)
    }

    /// Walks the contents of an in-memory archive.
    ///
    /// The blob is sniffed first and only unpacked if its kind is in the
    /// archive allow-list; otherwise the walk is empty. Nothing happens
    /// until the returned [`Walk`] is advanced.
    pub fn walk_archive(&self, content: impl Into<Vec<u8>>) -> Walk {
        let mut walk = Walk::new(self.config.clone(), self.resolver);
        walk.pending = Some(content.into());
        walk
    }
}

/// One entry of the walk worklist.
struct Frame {
    entries: Entries,
    archives: AllowList,
    workspace: Option<Workspace>,
}

/// Lazy sequence of documents produced by a [`Walker`].
///
/// Filesystem failures are yielded as `Err` and end the walk. Archive
/// extraction failures are logged, recorded in the [`WalkReport`], and only
/// cost the files of that archive. Dropping the walk deletes every temporary
/// workspace it still holds.
pub struct Walk {
    config: WalkConfig,
    resolver: ExtractorResolver,
    pending: Option<Vec<u8>>,
    stack: Vec<Frame>,
    report: WalkReport,
}

impl Walk {
    fn new(config: WalkConfig, resolver: ExtractorResolver) -> Self {
        Self {
            config,
            resolver,
            pending: None,
            stack: Vec::new(),
            report: WalkReport::new(),
        }
    }

    /// Statistics and warnings gathered so far.
    #[must_use]
    pub fn report(&self) -> &WalkReport {
        &self.report
    }

    /// Consumes the walk, releasing all workspaces, and returns its report.
    #[must_use]
    pub fn into_report(self) -> WalkReport {
        let Self { report, .. } = self;
        report
    }

    /// Number of archive workspaces currently held open.
    #[must_use]
    pub fn open_workspaces(&self) -> usize {
        self.stack
            .iter()
            .filter(|frame| frame.workspace.is_some())
            .count()
    }

    /// Sniffs the top-level blob of an archive walk and unpacks it.
    fn start_archive(&mut self, content: &[u8]) -> Result<()> {
        match classify(content) {
            Some(extension) if unpacks(&self.config.archives, extension) => {
                self.open_archive(content, extension, extension.as_str())
            }
            other => {
                tracing::debug!(kind = ?other, "top-level blob is not an allowed archive");
                self.report.files_skipped += 1;
                Ok(())
            }
        }
    }

    /// Unpacks an archive into a fresh workspace and pushes it as a frame.
    ///
    /// Extraction failures are contained: the (possibly partial) workspace
    /// is still walked.
    fn open_archive(
        &mut self,
        content: &[u8],
        extension: FileExtension,
        origin: &str,
    ) -> Result<()> {
        let mut workspace = Workspace::create(content, extension)?;

        match workspace.extract(self.resolver, self.config.password.as_deref()) {
            Ok(files) => {
                tracing::debug!(archive = origin, files, "archive extracted");
                self.report.archives_extracted += 1;
            }
            Err(err) => {
                tracing::warn!(archive = origin, error = %err, "archive extraction failed");
                self.report.archives_failed += 1;
                self.report.add_warning(format!("{origin}: {err}"));
            }
        }

        workspace.begin_walk();
        self.stack.push(Frame {
            entries: directory_entries(workspace.dir()),
            archives: self.config.nested_archives(),
            workspace: Some(workspace),
        });
        Ok(())
    }

    /// Reads, sniffs and dispatches one regular file.
    fn visit_file(&mut self, path: &Path) -> Result<Option<ExtractedFile>> {
        if let Some(max) = self.config.max_file_size {
            let size = std::fs::metadata(path)
                .map_err(|source| SiftError::Walk {
                    path: path.to_path_buf(),
                    source,
                })?
                .len();
            if size > max {
                tracing::warn!(path = %path.display(), size, max, "skipping oversize file");
                self.report.files_skipped += 1;
                self.report.add_warning(format!(
                    "{}: {size} bytes exceeds limit of {max}",
                    path.display()
                ));
                return Ok(None);
            }
        }

        let content = std::fs::read(path).map_err(|source| SiftError::Walk {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(extension) = classify(&content) else {
            tracing::debug!(path = %path.display(), "unclassified content");
            self.report.files_skipped += 1;
            return Ok(None);
        };

        if self.config.yields(extension) {
            self.report.files_yielded += 1;
            return Ok(Some(ExtractedFile {
                content,
                label: label_for(path, extension),
                extension,
            }));
        }

        let unpack = self
            .stack
            .last()
            .is_some_and(|frame| unpacks(&frame.archives, extension));
        if unpack {
            let origin = path.display().to_string();
            self.open_archive(&content, extension, &origin)?;
        } else {
            tracing::debug!(path = %path.display(), kind = %extension, "kind not allowed");
            self.report.files_skipped += 1;
        }
        Ok(None)
    }

    /// Ends the walk after a fatal error, releasing every workspace.
    fn fail(&mut self, err: SiftError) -> SiftError {
        self.pending = None;
        self.stack.clear();
        err
    }
}

impl Iterator for Walk {
    type Item = Result<ExtractedFile>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(content) = self.pending.take()
            && let Err(err) = self.start_archive(&content)
        {
            return Some(Err(self.fail(err)));
        }

        loop {
            let next_entry = self.stack.last_mut()?.entries.next();

            let Some(entry) = next_entry else {
                // Frame exhausted: dropping it releases its workspace
                self.stack.pop();
                tracing::debug!(depth = self.stack.len(), "frame finished");
                continue;
            };

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => return Some(Err(self.fail(err.into()))),
            };
            if !entry.file_type().is_file() {
                continue;
            }

            match self.visit_file(entry.path()) {
                Ok(Some(file)) => return Some(Ok(file)),
                Ok(None) => {}
                Err(err) => return Some(Err(self.fail(err))),
            }
        }
    }
}

impl FusedIterator for Walk {}

impl std::fmt::Debug for Walk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walk")
            .field("config", &self.config)
            .field("frames", &self.stack.len())
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

/// Walks a folder with explicit allow-lists and no nested unpacking.
///
/// # Errors
///
/// Returns [`SiftError::NotADirectory`] if `folder` is not a directory.
pub fn walk_folder(
    folder: impl AsRef<Path>,
    archives: AllowList,
    documents: AllowList,
) -> Result<Walk> {
    Walker::new(WalkConfig::new(archives, documents)).walk_folder(folder)
}

/// Walks an in-memory archive with explicit allow-lists.
pub fn walk_archive(
    content: impl Into<Vec<u8>>,
    password: Option<String>,
    archives: AllowList,
    documents: AllowList,
    recursive: bool,
) -> Walk {
    let config = WalkConfig::new(archives, documents)
        .with_password(password)
        .with_recursive(recursive);
    Walker::new(config).walk_archive(content)
}

fn unpacks(archives: &AllowList, extension: FileExtension) -> bool {
    extension.is_archive() && archives.contains(extension)
}

fn label_for(path: &Path, extension: FileExtension) -> String {
    let stem = basename_without_extension(path);
    if stem.is_empty() {
        extension.to_string()
    } else {
        format!("{stem}.{extension}")
    }
}

fn keep_entry(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !filters::is_ignored(entry.path())
}

fn directory_entries(root: &Path) -> Entries {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(keep_entry as fn(&DirEntry) -> bool)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::formats::ArchiveExtractor;
    use crate::test_utils;
    use std::fs;
    use tempfile::TempDir;

    fn documents(exts: &[&str]) -> AllowList {
        AllowList::parse(exts).unwrap()
    }

    fn labels(walk: Walk) -> Vec<String> {
        walk.map(|file| file.unwrap().label).collect()
    }

    struct FailingExtractor;

    impl ArchiveExtractor for FailingExtractor {
        fn extract(&self, _source: &Path, _dest: &Path, _password: Option<&str>) -> Result<usize> {
            Err(SiftError::extraction("zip", "codec exploded"))
        }

        fn format_name(&self) -> &str {
            "zip"
        }
    }

    fn failing_resolver(_: FileExtension) -> Option<Box<dyn ArchiveExtractor>> {
        Some(Box::new(FailingExtractor))
    }

    #[test]
    fn test_label_uses_sniffed_extension() {
        assert_eq!(label_for(Path::new("a/photo.JPG"), FileExtension::Jpg), "photo.jpg");
        assert_eq!(label_for(Path::new("scan.bin"), FileExtension::Pdf), "scan.pdf");
        assert_eq!(label_for(Path::new("README"), FileExtension::Txt), "README.txt");
    }

    #[test]
    fn test_walk_folder_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("x.pdf");
        fs::write(&file, b"%PDF-1.4").unwrap();

        let err = Walker::new(WalkConfig::default()).walk_folder(&file).unwrap_err();
        assert!(matches!(err, SiftError::NotADirectory { .. }));
    }

    #[test]
    fn test_walk_folder_yields_allowed_documents() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.pdf"), b"%PDF-1.4").unwrap();
        fs::write(temp.path().join("b.png"), test_utils::png_bytes()).unwrap();
        fs::write(temp.path().join("c.dat"), [0u8, 1, 2, 3]).unwrap();

        let mut walk = walk_folder(temp.path(), AllowList::empty(), documents(&["pdf"])).unwrap();
        let first = walk.next().unwrap().unwrap();
        assert_eq!(first.label, "a.pdf");
        assert!(walk.next().is_none());
        assert_eq!(walk.report().files_yielded, 1);
        assert_eq!(walk.report().files_skipped, 2);
    }

    #[test]
    fn test_walk_folder_descends_depth_first_in_name_order() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("b/inner")).unwrap();
        fs::write(temp.path().join("a.txt"), b"alpha").unwrap();
        fs::write(temp.path().join("b/inner/c.txt"), b"gamma").unwrap();
        fs::write(temp.path().join("b/d.txt"), b"delta").unwrap();
        fs::write(temp.path().join("e.txt"), b"epsilon").unwrap();

        let walk = walk_folder(temp.path(), AllowList::empty(), documents(&["txt"])).unwrap();
        assert_eq!(labels(walk), ["a.txt", "d.txt", "c.txt", "e.txt"]);
    }

    #[test]
    fn test_ignored_entries_are_not_traversed() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("__MACOSX")).unwrap();
        fs::write(temp.path().join("__MACOSX/._a.pdf"), b"%PDF-1.4").unwrap();
        fs::write(temp.path().join(".DS_Store"), b"%PDF-1.4").unwrap();
        fs::write(temp.path().join("keep.pdf"), b"%PDF-1.4").unwrap();

        let walk = walk_folder(temp.path(), AllowList::archives(), documents(&["pdf"])).unwrap();
        assert_eq!(labels(walk), ["keep.pdf"]);
    }

    #[test]
    fn test_archive_kind_in_document_list_is_not_yielded() {
        let zip = test_utils::create_test_zip(vec![("a.pdf", b"%PDF-1.4")]);
        let walk = walk_archive(
            zip,
            None,
            AllowList::empty(),
            AllowList::from([FileExtension::Zip, FileExtension::Pdf]),
            false,
        );
        assert!(labels(walk).is_empty());
    }

    #[test]
    fn test_walk_archive_not_in_allow_list_is_empty() {
        let zip = test_utils::create_test_zip(vec![("a.pdf", b"%PDF-1.4")]);
        let walk = walk_archive(
            zip,
            None,
            AllowList::from([FileExtension::SevenZ]),
            documents(&["pdf"]),
            false,
        );
        let report_before = walk.report().clone();
        assert_eq!(report_before.archives_seen(), 0);
        assert!(labels(walk).is_empty());
    }

    #[test]
    fn test_walk_archive_is_lazy() {
        let zip = test_utils::create_test_zip(vec![("a.pdf", b"%PDF-1.4")]);
        let walk = Walker::new(WalkConfig::default()).walk_archive(zip);
        assert_eq!(walk.open_workspaces(), 0);
        assert_eq!(walk.report().archives_seen(), 0);
    }

    #[test]
    fn test_extraction_failure_is_contained() {
        let zip = test_utils::create_test_zip(vec![("a.pdf", b"%PDF-1.4")]);
        let mut walk = Walker::new(WalkConfig::default())
            .with_resolver(failing_resolver)
            .walk_archive(zip);

        assert!(walk.next().is_none());
        assert_eq!(walk.report().archives_failed, 1);
        assert_eq!(walk.report().warnings.len(), 1);
        assert!(walk.report().warnings[0].contains("codec exploded"));
        assert_eq!(walk.open_workspaces(), 0);
    }

    #[test]
    fn test_early_abandonment_releases_workspace() {
        let zip = test_utils::create_test_zip(vec![
            ("a.pdf", b"%PDF-1.4"),
            ("b.pdf", b"%PDF-1.5"),
        ]);
        let mut walk = walk_archive(zip, None, AllowList::archives(), documents(&["pdf"]), false);

        let first = walk.next().unwrap().unwrap();
        assert_eq!(first.label, "a.pdf");
        assert_eq!(walk.open_workspaces(), 1);

        let dir = walk.stack[0].workspace.as_ref().unwrap().dir().to_path_buf();
        let archive = walk.stack[0]
            .workspace
            .as_ref()
            .unwrap()
            .archive_path()
            .to_path_buf();
        assert!(dir.exists());

        drop(walk);
        assert!(!dir.exists());
        assert!(!archive.exists());
    }

    #[test]
    fn test_oversize_files_are_skipped_with_warning() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.txt"), "x".repeat(64)).unwrap();
        fs::write(temp.path().join("small.txt"), "x").unwrap();

        let config = WalkConfig::default().with_max_file_size(Some(16));
        let mut walk = Walker::new(config).walk_folder(temp.path()).unwrap();

        assert_eq!(walk.next().unwrap().unwrap().label, "small.txt");
        assert!(walk.next().is_none());
        assert_eq!(walk.report().warnings.len(), 1);
    }

    #[test]
    fn test_into_parts() {
        let file = ExtractedFile {
            content: b"%PDF".to_vec(),
            label: "a.pdf".to_string(),
            extension: FileExtension::Pdf,
        };
        let (content, label) = file.into_parts();
        assert_eq!(content, b"%PDF");
        assert_eq!(label, "a.pdf");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_ends_walk() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("a.pdf");
        fs::write(&locked, b"%PDF-1.4").unwrap();
        fs::write(temp.path().join("b.pdf"), b"%PDF-1.4").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Running as root bypasses permission checks
        if fs::read(&locked).is_ok() {
            return;
        }

        let mut walk = walk_folder(temp.path(), AllowList::empty(), documents(&["pdf"])).unwrap();
        let err = walk.next().unwrap().unwrap_err();
        assert!(matches!(err, SiftError::Walk { .. }));
        assert!(walk.next().is_none());
    }
}
