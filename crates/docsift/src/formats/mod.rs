//! File kinds, content sniffing, and archive extraction backends.

pub mod command;
pub mod common;
pub mod detect;
pub mod extension;
pub mod sevenz;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use command::CommandExtractor;
pub use detect::classify;
pub use extension::FileExtension;
pub use sevenz::SevenZExtractor;
pub use traits::ArchiveExtractor;
pub use self::zip::ZipExtractor;
