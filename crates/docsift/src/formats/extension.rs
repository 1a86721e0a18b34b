//! Recognized file kinds.

use std::fmt;
use std::str::FromStr;

use crate::SiftError;

/// A file kind recognized by content sniffing.
///
/// The kinds are partitioned into archives, which the walker unpacks, and
/// documents, which the walker yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileExtension {
    /// 7z archive.
    SevenZ,
    /// RAR archive.
    Rar,
    /// ZIP archive.
    Zip,
    /// Legacy binary Word document.
    Doc,
    /// Office Open XML Word document.
    Docx,
    /// Legacy binary Excel workbook.
    Xls,
    /// Office Open XML Excel workbook.
    Xlsx,
    /// JPEG image.
    Jpg,
    /// PNG image.
    Png,
    /// PDF document.
    Pdf,
    /// GIF image.
    Gif,
    /// Plain UTF-8 text.
    Txt,
    /// JSON document.
    Json,
    /// HTML document.
    Html,
}

impl FileExtension {
    /// Archive kinds.
    pub const ARCHIVES: [Self; 3] = [Self::SevenZ, Self::Rar, Self::Zip];

    /// Document kinds.
    pub const DOCUMENTS: [Self; 11] = [
        Self::Doc,
        Self::Docx,
        Self::Xls,
        Self::Xlsx,
        Self::Jpg,
        Self::Png,
        Self::Pdf,
        Self::Gif,
        Self::Txt,
        Self::Json,
        Self::Html,
    ];

    /// Returns the lower-case extension string, without a leading dot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SevenZ => "7z",
            Self::Rar => "rar",
            Self::Zip => "zip",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Gif => "gif",
            Self::Txt => "txt",
            Self::Json => "json",
            Self::Html => "html",
        }
    }

    /// Returns `true` for archive kinds.
    #[must_use]
    pub const fn is_archive(self) -> bool {
        matches!(self, Self::SevenZ | Self::Rar | Self::Zip)
    }

    /// Returns `true` for document kinds.
    #[must_use]
    pub const fn is_document(self) -> bool {
        !self.is_archive()
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileExtension {
    type Err = SiftError;

    /// Parses an extension string, ignoring case and a leading dot.
    ///
    /// `jpeg` is accepted as an alias of `jpg`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed
            .strip_prefix('.')
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        match lower.as_str() {
            "7z" => Ok(Self::SevenZ),
            "rar" => Ok(Self::Rar),
            "zip" => Ok(Self::Zip),
            "doc" => Ok(Self::Doc),
            "docx" => Ok(Self::Docx),
            "xls" => Ok(Self::Xls),
            "xlsx" => Ok(Self::Xlsx),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            "gif" => Ok(Self::Gif),
            "txt" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(SiftError::UnknownExtension(s.to_string())),
        }
    }
}
