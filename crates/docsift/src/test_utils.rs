//! In-memory fixtures for tests.
//!
//! Builders for the archives and document signatures the walker sniffs, so
//! tests never depend on files checked into the repository.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use sevenz_rust2::Password;
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Creates an in-memory ZIP archive from a list of `(path, content)` entries.
///
/// Entries are stored uncompressed.
///
/// # Examples
///
/// ```
/// use docsift::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// assert!(zip_data.starts_with(b"PK\x03\x04"));
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Creates a ZIP archive whose entries are ZipCrypto-encrypted with
/// `password`.
#[must_use]
pub fn create_encrypted_zip(entries: Vec<(&str, &[u8])>, password: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .with_deprecated_encryption(password.as_bytes())
        .unwrap();

    for (path, data) in entries {
        zip.start_file(path, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Creates an in-memory 7z archive from a list of `(path, content)` entries.
///
/// With a password the content is AES-encrypted. The entries are staged in a
/// temporary directory because sevenz-rust2 compresses from the filesystem.
#[must_use]
pub fn create_test_7z(entries: Vec<(&str, &[u8])>, password: Option<&str>) -> Vec<u8> {
    let staging = tempfile::TempDir::new().unwrap();
    for (path, data) in entries {
        let target = staging.path().join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(target, data).unwrap();
    }

    let writer = Cursor::new(Vec::new());
    let writer = match password {
        Some(password) => {
            sevenz_rust2::compress_encrypted(staging.path(), writer, Password::from(password))
                .unwrap()
        }
        None => sevenz_rust2::compress(staging.path(), writer).unwrap(),
    };
    writer.into_inner()
}

/// Minimal Word package: `[Content_Types].xml` plus a `word/` part.
#[must_use]
pub fn docx_bytes() -> Vec<u8> {
    ZipTestBuilder::new()
        .add_file("[Content_Types].xml", CONTENT_TYPES)
        .add_file("word/document.xml", b"<w:document/>")
        .build()
}

/// Minimal Excel package: `[Content_Types].xml` plus an `xl/` part.
#[must_use]
pub fn xlsx_bytes() -> Vec<u8> {
    ZipTestBuilder::new()
        .add_file("[Content_Types].xml", CONTENT_TYPES)
        .add_file("xl/workbook.xml", b"<workbook/>")
        .build()
}

const CONTENT_TYPES: &[u8] = b"<?xml version=\"1.0\"?><Types/>";

/// JPEG/JFIF header followed by a few payload bytes.
#[must_use]
pub fn jpeg_bytes() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    data.extend_from_slice(b"JFIF\0");
    data.extend_from_slice(&[0x01, 0x01, 0x00, 0xFF, 0xD9]);
    data
}

/// PNG signature followed by an IHDR chunk header.
#[must_use]
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D]);
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&[0x00; 13]);
    data
}

/// A tiny PDF body.
#[must_use]
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj <<>> endobj\n%%EOF\n".to_vec()
}

/// OLE2 compound file header with one directory entry named `stream`.
///
/// Only what the sniffer looks at: the magic and the UTF-16LE stream name.
#[must_use]
pub fn ole_bytes(stream: &str) -> Vec<u8> {
    let mut data = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    data.resize(512, 0);
    data.extend(stream.encode_utf16().flat_map(u16::to_le_bytes));
    data.resize(1024, 0);
    data
}

/// Builder for ZIP test archives.
///
/// # Examples
///
/// ```
/// use docsift::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .build();
/// ```
pub struct ZipTestBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Builds and returns the ZIP archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
