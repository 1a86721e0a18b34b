//! Content-sniffing document walker for folders and archives.
//!
//! `docsift` walks a folder tree or an in-memory archive and lazily yields
//! the documents it finds. File kinds are decided from content signatures,
//! never from names. Archives (zip, 7z, rar) found along the way are
//! unpacked into scoped temporary workspaces that are deleted as soon as
//! their contents have been walked, or when the walk is dropped.
//!
//! # Examples
//!
//! ```no_run
//! use docsift::AllowList;
//! use docsift::walk_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("upload.zip")?;
//! let walk = walk_archive(
//!     bytes,
//!     None,
//!     AllowList::parse(["zip", "7z"])?,
//!     AllowList::parse(["pdf", "docx", "jpg"])?,
//!     true,
//! );
//! for file in walk {
//!     let (content, label) = file?.into_parts();
//!     println!("{label}: {} bytes", content.len());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod formats;
pub mod ids;
pub mod path;
pub mod registry;
pub mod report;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod walk;

// Re-export main API types
pub use config::AllowList;
pub use config::WalkConfig;
pub use error::Result;
pub use error::SiftError;
pub use formats::FileExtension;
pub use formats::classify;
pub use ids::ShortIdRegistry;
pub use registry::SingletonRegistry;
pub use report::WalkReport;
pub use walk::ExtractedFile;
pub use walk::Walk;
pub use walk::Walker;
pub use walk::walk_archive;
pub use walk::walk_folder;
