//! Version-aware VHDL front end.
//!
//! Lexes a VHDL text against one language revision and parses its library
//! units (entities, architectures, packages, package bodies and
//! configurations). Entity headers are parsed in full, including port
//! grouping from comments and blank lines; other units keep their name and
//! top-level declarations only.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): bytes to tokens. Reserved words depend on the
//!   revision, and comments and blank lines are kept as trivia tokens so the
//!   grouping engine can see them.
//! - **Parser**: recursive descent over the token stream. Each unit is parsed
//!   under a guard; a syntax error drops that unit, becomes one diagnostic
//!   and parsing resumes at the next unit.
//!
//! Problems in the source never surface as `Err`: they go to the
//! [`DiagnosticSink`]. `Err` is reserved for internal invariant failures.

#![warn(missing_docs)]

mod body;
mod interface;
pub mod lexer;
mod parser;
mod recovery;
pub mod token;
mod units;

#[cfg(test)]
mod test_util;

pub use lexer::{lex, LexError, LexOutput};
pub use token::{Token, VhdlToken};

use hdlio_ast::DesignUnit;
use hdlio_common::{HdlResult, InternalError, LanguageFamily, ParseOptions};
use hdlio_diagnostics::DiagnosticSink;
use hdlio_source::{FileId, SourceDb};
use std::path::Path;

/// Parses a file already loaded into `source_db`.
///
/// Returns the units that parsed, in source order. Diagnostics for the
/// units that did not go to `sink`.
pub fn parse_file(
    file_id: FileId,
    source_db: &SourceDb,
    options: &ParseOptions,
    sink: &DiagnosticSink,
) -> HdlResult<Vec<DesignUnit>> {
    let file = source_db
        .get_file(file_id)
        .ok_or_else(|| InternalError::new(format!("no source file with id {}", file_id.as_raw())))?;
    parse_source(&file.content, file_id, &file.path, options, sink)
}

/// Parses VHDL text that is not registered in a [`SourceDb`].
///
/// `path` is recorded on every unit as its source path.
pub fn parse_source(
    text: &str,
    file: FileId,
    path: &Path,
    options: &ParseOptions,
    sink: &DiagnosticSink,
) -> HdlResult<Vec<DesignUnit>> {
    if options.version.family() != LanguageFamily::Vhdl {
        return Err(InternalError::new(format!(
            "VHDL parser invoked with {}",
            options.version
        )));
    }
    let lexed = lex(text, file, options.version);
    let mut parser = parser::VhdlParser::new(lexed, text, path, *options, sink);
    let units = parser.parse_design_file()?;
    tracing::debug!(
        path = %path.display(),
        version = %options.version,
        units = units.len(),
        "parsed VHDL source"
    );
    Ok(units)
}
