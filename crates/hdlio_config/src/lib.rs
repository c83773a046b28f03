//! Parsing and validation of `hdlio.toml` project configuration files.
//!
//! A project file names one or more libraries, the source files that
//! populate each, and the parse options to use. [`resolve_library`] turns a
//! library entry into absolute paths and the effective [`ParseOptions`].
//!
//! [`ParseOptions`]: hdlio_common::ParseOptions

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_library, ResolvedLibrary};
pub use types::*;
