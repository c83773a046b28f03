//! The error type of the document-level API.

use hdlio_common::{InternalError, LanguageFamily, LanguageVersion};
use hdlio_config::ConfigError;
use hdlio_diagnostics::Diagnostic;
use std::path::PathBuf;

/// Why a parse or load produced no result.
///
/// Problems inside a text that recovery can handle are diagnostics, not
/// errors. An error means nothing was added to any library.
#[derive(Debug, thiserror::Error)]
pub enum HdlError {
    /// The input file does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The first error diagnostic of a strict parse.
    #[error("{}:{}: {}", .0.location, .0.unit_context, .0.message)]
    Syntax(Box<Diagnostic>),

    /// A lenient load found no design unit in its input.
    #[error("no design units found in {}", path.display())]
    NoDesignUnits {
        /// The input's path or name.
        path: PathBuf,
        /// Everything the parser reported for the input.
        diagnostics: Vec<Diagnostic>,
    },

    /// The file extension names a different language than the version.
    #[error("{} is a {family} file but {version} was requested", path.display())]
    FamilyMismatch {
        /// The file.
        path: PathBuf,
        /// Family implied by the extension.
        family: LanguageFamily,
        /// The requested version.
        version: LanguageVersion,
    },

    /// `hdlio.toml` could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The parser broke one of its own invariants.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl HdlError {
    /// The diagnostic behind a [`HdlError::Syntax`].
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            HdlError::Syntax(diag) => Some(diag),
            _ => None,
        }
    }

    pub(crate) fn from_io(path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            HdlError::FileNotFound(path)
        } else {
            HdlError::Io { path, source: err }
        }
    }
}
