//! Content-based file type detection.
//!
//! Detection never looks at file names. A buffer is first mapped to a media
//! type from its byte signature (and, for ZIP and OLE2 containers, from the
//! names of the streams inside), then the media type is mapped to a
//! [`FileExtension`] by an ordered rule table.

use std::io::Cursor;

use super::extension::FileExtension;

const ZIP_LOCAL_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const ZIP_SPANNED_MAGIC: &[u8] = b"PK\x07\x08";

/// RAR 4.x and 5.x share this prefix.
const RAR_MAGIC: &[u8] = b"Rar!\x1a\x07";

/// 7z archives start with the signature: `37 7A BC AF 27 1C`
const SEVENZ_MAGIC: [u8; 6] = [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];

/// OLE2 compound file (legacy Office formats).
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const PDF_MAGIC: &[u8] = b"%PDF-";
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";

const MIME_ZIP: &str = "application/zip";
const MIME_RAR: &str = "application/vnd.rar";
const MIME_SEVENZ: &str = "application/x-7z-compressed";
const MIME_OLE: &str = "application/x-ole-storage";
const MIME_DOC: &str = "application/msword";
const MIME_XLS: &str = "application/vnd.ms-excel";
const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const MIME_PPTX: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
const MIME_JPEG: &str = "image/jpeg";
const MIME_PNG: &str = "image/png";
const MIME_PDF: &str = "application/pdf";
const MIME_GIF: &str = "image/gif";
const MIME_HTML: &str = "text/html";
const MIME_JSON: &str = "application/json";
const MIME_TEXT: &str = "text/plain";

/// One entry of the media type to extension table.
struct SniffRule {
    matches: fn(&str) -> bool,
    extension: FileExtension,
}

/// Ordered media type rules. First match wins.
///
/// `word` alone is ambiguous: the legacy binary format is
/// `application/msword`, the XML one carries `document` as well.
const RULES: &[SniffRule] = &[
    SniffRule {
        matches: |m| m.contains("zip"),
        extension: FileExtension::Zip,
    },
    SniffRule {
        matches: |m| m.contains("rar"),
        extension: FileExtension::Rar,
    },
    SniffRule {
        matches: |m| m.contains("7z"),
        extension: FileExtension::SevenZ,
    },
    SniffRule {
        matches: |m| m.contains("word") && !m.contains("document"),
        extension: FileExtension::Doc,
    },
    SniffRule {
        matches: |m| m.contains("word") && m.contains("document"),
        extension: FileExtension::Docx,
    },
    SniffRule {
        matches: |m| m.contains("excel"),
        extension: FileExtension::Xls,
    },
    SniffRule {
        matches: |m| m.contains("sheet"),
        extension: FileExtension::Xlsx,
    },
    SniffRule {
        matches: |m| m.contains("jpeg") || m.contains("jpg"),
        extension: FileExtension::Jpg,
    },
    SniffRule {
        matches: |m| m.contains("png"),
        extension: FileExtension::Png,
    },
    SniffRule {
        matches: |m| m.contains("pdf"),
        extension: FileExtension::Pdf,
    },
    SniffRule {
        matches: |m| m.contains("gif"),
        extension: FileExtension::Gif,
    },
    SniffRule {
        matches: |m| m.contains("html"),
        extension: FileExtension::Html,
    },
    SniffRule {
        matches: |m| m.contains("json"),
        extension: FileExtension::Json,
    },
    SniffRule {
        matches: |m| m.contains("text/plain"),
        extension: FileExtension::Txt,
    },
];

/// Classifies a buffer by its content.
///
/// Returns `None` for empty, truncated, or unrecognized content. Never
/// panics and has no side effects.
///
/// # Examples
///
/// ```
/// use docsift::formats::FileExtension;
/// use docsift::formats::detect::classify;
///
/// assert_eq!(classify(b"%PDF-1.7\n"), Some(FileExtension::Pdf));
/// assert_eq!(classify(b""), None);
/// ```
#[must_use]
pub fn classify(content: &[u8]) -> Option<FileExtension> {
    sniff_media_type(content).and_then(classify_media_type)
}

/// Maps a media type string to an extension using the ordered rule table.
///
/// Matching is case-insensitive.
#[must_use]
pub fn classify_media_type(media_type: &str) -> Option<FileExtension> {
    let lower = media_type.to_ascii_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map(|rule| rule.extension)
}

/// Derives a media type from the byte signature of `content`.
///
/// Returns `None` when no signature matches and the content is not text.
#[must_use]
pub fn sniff_media_type(content: &[u8]) -> Option<&'static str> {
    if content.is_empty() {
        return None;
    }

    if content.starts_with(ZIP_LOCAL_MAGIC)
        || content.starts_with(ZIP_EMPTY_MAGIC)
        || content.starts_with(ZIP_SPANNED_MAGIC)
    {
        return Some(sniff_zip_container(content));
    }
    if content.starts_with(RAR_MAGIC) {
        return Some(MIME_RAR);
    }
    if content.starts_with(&SEVENZ_MAGIC) {
        return Some(MIME_SEVENZ);
    }
    if content.starts_with(&OLE_MAGIC) {
        return Some(sniff_ole_container(content));
    }
    if content.starts_with(&JPEG_MAGIC) {
        return Some(MIME_JPEG);
    }
    if content.starts_with(&PNG_MAGIC) {
        return Some(MIME_PNG);
    }
    if content.starts_with(PDF_MAGIC) {
        return Some(MIME_PDF);
    }
    if content.starts_with(GIF87_MAGIC) || content.starts_with(GIF89_MAGIC) {
        return Some(MIME_GIF);
    }

    sniff_text(content)
}

/// Tells Office Open XML packages apart from plain ZIP archives.
///
/// A truncated or unreadable central directory still counts as ZIP since the
/// local header signature matched.
fn sniff_zip_container(content: &[u8]) -> &'static str {
    let Ok(archive) = zip::ZipArchive::new(Cursor::new(content)) else {
        return MIME_ZIP;
    };

    let mut has_content_types = false;
    let mut package = None;
    for name in archive.file_names() {
        if name == "[Content_Types].xml" {
            has_content_types = true;
        } else if package.is_none() {
            if name.starts_with("word/") {
                package = Some(MIME_DOCX);
            } else if name.starts_with("xl/") {
                package = Some(MIME_XLSX);
            } else if name.starts_with("ppt/") {
                package = Some(MIME_PPTX);
            }
        }
    }

    match package {
        Some(mime) if has_content_types => mime,
        _ => MIME_ZIP,
    }
}

/// Looks for well-known stream names in an OLE2 compound file.
fn sniff_ole_container(content: &[u8]) -> &'static str {
    if contains_utf16le(content, "WordDocument") {
        MIME_DOC
    } else if contains_utf16le(content, "Workbook") || contains_utf16le(content, "Book") {
        MIME_XLS
    } else {
        MIME_OLE
    }
}

fn contains_utf16le(haystack: &[u8], needle: &str) -> bool {
    let encoded: Vec<u8> = needle.encode_utf16().flat_map(u16::to_le_bytes).collect();
    haystack
        .windows(encoded.len())
        .any(|window| window == encoded.as_slice())
}

fn sniff_text(content: &[u8]) -> Option<&'static str> {
    if content.contains(&0) {
        return None;
    }
    let text = std::str::from_utf8(content).ok()?;
    let trimmed = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    let head: String = trimmed.chars().take(16).collect::<String>().to_lowercase();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return Some(MIME_HTML);
    }

    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return Some(MIME_JSON);
    }

    let printable = text
        .chars()
        .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t' | '\u{0c}'));
    printable.then_some(MIME_TEXT)
}
