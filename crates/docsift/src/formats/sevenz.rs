//! 7z archive extraction.
//!
//! Uses the sevenz-rust2 callback API so every entry name can be checked
//! before anything is written.
//!
//! # Symlink and Hardlink Limitations
//!
//! sevenz-rust2 does not expose link metadata. Unix symlinks are written as
//! regular files holding the target path, which is harmless for content
//! sniffing.

use std::cell::Cell;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use sevenz_rust2::Password;

use crate::Result;
use crate::SiftError;

use super::common;
use super::traits::ArchiveExtractor;

const FORMAT_NAME: &str = "7z";

/// 7z extraction backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SevenZExtractor;

impl SevenZExtractor {
    /// Creates a new 7z extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveExtractor for SevenZExtractor {
    fn extract(&self, source: &Path, dest: &Path, password: Option<&str>) -> Result<usize> {
        let reader = BufReader::new(File::open(source)?);
        let password = password.map_or_else(Password::empty, Password::from);
        let files_extracted = Cell::new(0usize);

        let extract_fn = |entry: &sevenz_rust2::ArchiveEntry,
                          reader: &mut dyn Read,
                          _dest_dir: &PathBuf|
         -> std::result::Result<bool, sevenz_rust2::Error> {
            let Some(relative) = common::enclosed_path(&entry.name) else {
                tracing::debug!(entry = %entry.name, "skipping 7z entry outside destination");
                return Ok(true);
            };
            let output_path = dest.join(relative);

            if entry.is_directory() {
                std::fs::create_dir_all(&output_path)?;
            } else {
                common::write_entry(reader, &output_path)?;
                files_extracted.set(files_extracted.get() + 1);
            }

            Ok(true)
        };

        sevenz_rust2::decompress_with_extract_fn_and_password(reader, dest, password, extract_fn)?;

        Ok(files_extracted.get())
    }

    fn format_name(&self) -> &str {
        FORMAT_NAME
    }
}

impl From<sevenz_rust2::Error> for SiftError {
    fn from(err: sevenz_rust2::Error) -> Self {
        Self::extraction(FORMAT_NAME, err.to_string())
    }
}
