//! Shared foundational types used across the hdlio front end.
//!
//! This crate provides the language revision tags, the per-revision
//! reserved-word and construct table, parse options shared by every dialect
//! parser, source fingerprints, and the internal error type.

#![warn(missing_docs)]

pub mod fingerprint;
pub mod options;
pub mod result;
pub mod version;
pub mod version_table;

pub use fingerprint::SourceFingerprint;
pub use options::{ParseOptions, RecoveryMode, VersionMismatchPolicy};
pub use result::{HdlResult, InternalError};
pub use version::{LanguageFamily, LanguageVersion, ParseVersionError};
pub use version_table::{is_construct_available, is_reserved, reserved_words, Construct};
