//! Source text ownership and location tracking.
//!
//! [`SourceDb`] owns every loaded text. [`FileId`] and [`Span`] name byte
//! ranges inside it, and [`LineIndex`] turns byte offsets into the 1-based
//! [`Location`] values carried by tokens and diagnostics.

#![warn(missing_docs)]

pub mod file_id;
pub mod location;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use location::{LineIndex, Location};
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
