//! Extraction utilities shared between archive backends.
//!
//! # Functions
//!
//! - [`extractor_for`]: Picks the backend for an archive kind
//! - [`write_entry`]: Buffered file write with parent directory creation
//! - [`enclosed_path`]: Rejects entry names that would escape the destination

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::command::CommandExtractor;
use super::extension::FileExtension;
use super::sevenz::SevenZExtractor;
use super::traits::ArchiveExtractor;
use super::zip::ZipExtractor;

/// Picks the extraction backend for an archive kind.
pub type ExtractorResolver = fn(FileExtension) -> Option<Box<dyn ArchiveExtractor>>;

/// Returns the extraction backend for an archive kind.
///
/// Returns `None` for document kinds.
///
/// # Examples
///
/// ```
/// use docsift::formats::ArchiveExtractor;
/// use docsift::formats::FileExtension;
/// use docsift::formats::common::extractor_for;
///
/// let extractor = extractor_for(FileExtension::Zip).unwrap();
/// assert_eq!(extractor.format_name(), "zip");
/// assert!(extractor_for(FileExtension::Pdf).is_none());
/// ```
#[must_use]
pub fn extractor_for(extension: FileExtension) -> Option<Box<dyn ArchiveExtractor>> {
    match extension {
        FileExtension::Zip => Some(Box::new(ZipExtractor::new())),
        FileExtension::SevenZ => Some(Box::new(SevenZExtractor::new())),
        FileExtension::Rar => Some(Box::new(CommandExtractor::rar())),
        _ => None,
    }
}

/// Writes `reader` to `output_path` through a 64KB buffer.
///
/// Parent directories are created if needed. Returns the number of bytes
/// written.
///
/// # Errors
///
/// Returns an error if directory creation, file creation, or the copy fails.
pub fn write_entry<R: Read + ?Sized>(reader: &mut R, output_path: &Path) -> std::io::Result<u64> {
    if let Some(parent) = output_path.parent() {
        create_dir_all(parent)?;
    }

    let output_file = File::create(output_path)?;
    let mut buffered_writer = BufWriter::with_capacity(64 * 1024, output_file);
    let bytes_written = std::io::copy(reader, &mut buffered_writer)?;
    buffered_writer.flush()?;

    Ok(bytes_written)
}

/// Converts an archive entry name into a relative path that stays inside
/// the destination directory.
///
/// Returns `None` for absolute paths, drive prefixes, `..` components, and
/// names that reduce to nothing.
///
/// # Examples
///
/// ```
/// use docsift::formats::common::enclosed_path;
/// use std::path::PathBuf;
///
/// assert_eq!(enclosed_path("a/./b.txt"), Some(PathBuf::from("a/b.txt")));
/// assert_eq!(enclosed_path("../etc/passwd"), None);
/// assert_eq!(enclosed_path("/etc/passwd"), None);
/// ```
#[must_use]
pub fn enclosed_path(name: &str) -> Option<PathBuf> {
    let normalized = name.replace('\\', "/");
    let mut result = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!result.as_os_str().is_empty()).then_some(result)
}
