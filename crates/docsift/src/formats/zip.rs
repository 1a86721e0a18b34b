//! ZIP archive extraction.
//!
//! Entries are written one by one so that names escaping the destination are
//! dropped instead of aborting the whole archive. Encrypted entries (ZipCrypto
//! and AES) are decrypted with the supplied password.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufReader;
use std::path::Path;

use crate::Result;
use crate::SiftError;

use super::common;
use super::traits::ArchiveExtractor;

const FORMAT_NAME: &str = "zip";

/// ZIP extraction backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Creates a new ZIP extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, source: &Path, dest: &Path, password: Option<&str>) -> Result<usize> {
        let file = File::open(source)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(zip_error)?;

        let mut files_extracted = 0;
        for index in 0..archive.len() {
            let mut entry = match password {
                Some(password) => archive.by_index_decrypt(index, password.as_bytes()),
                None => archive.by_index(index),
            }
            .map_err(zip_error)?;

            let Some(relative) = entry.enclosed_name().and_then(|p| {
                p.to_str().and_then(common::enclosed_path)
            }) else {
                tracing::debug!(entry = entry.name(), "skipping zip entry outside destination");
                continue;
            };
            let output_path = dest.join(relative);

            if entry.is_dir() {
                create_dir_all(&output_path)?;
                continue;
            }

            common::write_entry(&mut entry, &output_path).map_err(|e| {
                SiftError::extraction(FORMAT_NAME, format!("{}: {e}", output_path.display()))
            })?;
            files_extracted += 1;
        }

        Ok(files_extracted)
    }

    fn format_name(&self) -> &str {
        FORMAT_NAME
    }
}

fn zip_error(err: zip::result::ZipError) -> SiftError {
    SiftError::extraction(FORMAT_NAME, err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils;
    use tempfile::TempDir;

    fn write_archive(dir: &TempDir, data: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join("archive.zip");
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_zip_extractor_format_name() {
        assert_eq!(ZipExtractor::new().format_name(), "zip");
    }

    #[test]
    fn test_extract_plain_zip() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let source = write_archive(
            &temp,
            &test_utils::create_test_zip(vec![("a.txt", b"hello"), ("dir/b.txt", b"world")]),
        );

        let count = ZipExtractor::new().extract(&source, out.path(), None).unwrap();

        assert_eq!(count, 2);
        assert_eq!(std::fs::read(out.path().join("a.txt")).unwrap(), b"hello");
        assert_eq!(std::fs::read(out.path().join("dir/b.txt")).unwrap(), b"world");
    }

    #[test]
    fn test_extract_encrypted_without_password_fails() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let source = write_archive(
            &temp,
            &test_utils::create_encrypted_zip(vec![("secret.pdf", b"%PDF-1.4")], "hunter2"),
        );

        let err = ZipExtractor::new().extract(&source, out.path(), None).unwrap_err();

        assert!(matches!(err, SiftError::Extraction { ref format, .. } if format == "zip"));
        assert!(!out.path().join("secret.pdf").exists());
    }

    #[test]
    fn test_extract_encrypted_with_password() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let source = write_archive(
            &temp,
            &test_utils::create_encrypted_zip(vec![("secret.pdf", b"%PDF-1.4")], "hunter2"),
        );

        let count = ZipExtractor::new()
            .extract(&source, out.path(), Some("hunter2"))
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(std::fs::read(out.path().join("secret.pdf")).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_extract_corrupt_zip_fails() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let source = write_archive(&temp, b"PK\x03\x04garbage");

        let err = ZipExtractor::new().extract(&source, out.path(), None).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_traversal_entry_is_dropped() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let source = write_archive(
            &temp,
            &test_utils::create_test_zip(vec![("../escape.txt", b"x"), ("ok.txt", b"y")]),
        );

        let count = ZipExtractor::new().extract(&source, out.path(), None).unwrap();

        assert_eq!(count, 1);
        assert!(out.path().join("ok.txt").exists());
        assert!(!out.path().parent().unwrap().join("escape.txt").exists());
    }
}
