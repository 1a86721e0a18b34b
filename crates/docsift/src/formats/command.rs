//! Extraction through an external archiver binary.
//!
//! RAR has no maintained pure-Rust decoder, so RAR archives are handed to the
//! `7z` binary, which reads ZIP, 7z and RAR alike.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::process::Stdio;

use walkdir::WalkDir;

use crate::Result;
use crate::SiftError;

use super::traits::ArchiveExtractor;

/// Default archiver binary.
pub const DEFAULT_PROGRAM: &str = "7z";

/// Runs `<program> x -y -o<dest> -p<password> <source>`.
///
/// An empty `-p` is always passed so the archiver fails on encrypted
/// archives instead of prompting for a password.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: OsString,
    format: &'static str,
}

impl CommandExtractor {
    /// Creates an extractor that runs `program` and reports `format` in
    /// errors.
    pub fn new(program: impl Into<OsString>, format: &'static str) -> Self {
        Self {
            program: program.into(),
            format,
        }
    }

    /// RAR extractor backed by the default archiver binary.
    #[must_use]
    pub fn rar() -> Self {
        Self::new(DEFAULT_PROGRAM, "rar")
    }

    /// Returns the program this extractor runs.
    #[must_use]
    pub fn program(&self) -> &OsString {
        &self.program
    }
}

impl ArchiveExtractor for CommandExtractor {
    fn extract(&self, source: &Path, dest: &Path, password: Option<&str>) -> Result<usize> {
        let mut output_flag = OsString::from("-o");
        output_flag.push(dest.as_os_str());

        let output = Command::new(&self.program)
            .arg("x")
            .arg("-y")
            .arg(output_flag)
            .arg(format!("-p{}", password.unwrap_or_default()))
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                SiftError::extraction(
                    self.format,
                    format!("cannot run {}: {e}", self.program.to_string_lossy()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SiftError::extraction(
                self.format,
                format!(
                    "{} exited with {}: {}",
                    self.program.to_string_lossy(),
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        let files_extracted = WalkDir::new(dest)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .count();
        Ok(files_extracted)
    }

    fn format_name(&self) -> &str {
        self.format
    }
}
