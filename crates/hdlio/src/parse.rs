//! The single parse entry point and its strict conveniences.

use crate::error::HdlError;
use crate::input::{check_family, SourceInput};
use hdlio_ast::{DesignUnit, Entity};
use hdlio_common::{LanguageFamily, LanguageVersion, ParseOptions, RecoveryMode};
use hdlio_diagnostics::{Diagnostic, DiagnosticSink};
use hdlio_source::{FileId, SourceDb};
use std::path::{Path, PathBuf};

/// Everything one parse produced.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Units that parsed, in source order.
    pub units: Vec<DesignUnit>,
    /// Every diagnostic, errors and warnings, in emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Path or name of the input.
    pub source: PathBuf,
}

impl ParseResult {
    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// The entities and modules among the units.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.units.iter().filter_map(DesignUnit::as_entity)
    }
}

/// The result of [`from_file`] or [`from_string`]: a text that parsed
/// without errors. `diagnostics` holds warnings only.
#[derive(Debug, Clone)]
pub struct DesignFile {
    /// Units in source order.
    pub units: Vec<DesignUnit>,
    /// Warnings.
    pub diagnostics: Vec<Diagnostic>,
}

impl DesignFile {
    /// The entities and modules among the units.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.units.iter().filter_map(DesignUnit::as_entity)
    }

    /// Finds an entity or module by name, ignoring ASCII case.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities().find(|e| e.name().eq_ignore_ascii_case(name))
    }
}

impl From<ParseResult> for DesignFile {
    fn from(result: ParseResult) -> Self {
        DesignFile {
            units: result.units,
            diagnostics: result.diagnostics,
        }
    }
}

/// Parses one input.
///
/// With [`RecoveryMode::Lenient`] every unit that parsed is returned along
/// with all diagnostics. With [`RecoveryMode::Strict`] the first error
/// diagnostic becomes [`HdlError::Syntax`].
pub fn parse(source: SourceInput, options: &ParseOptions) -> Result<ParseResult, HdlError> {
    let mut db = SourceDb::new();
    let id = load_input(&mut db, source, options.version)?;
    parse_loaded(&db, id, options)
}

/// Strict parse of a file.
pub fn from_file(path: impl AsRef<Path>, version: LanguageVersion) -> Result<DesignFile, HdlError> {
    let input = SourceInput::file(path.as_ref());
    parse(input, &ParseOptions::strict(version)).map(DesignFile::from)
}

/// Strict parse of an in-memory text.
pub fn from_string(text: &str, version: LanguageVersion) -> Result<DesignFile, HdlError> {
    parse(SourceInput::text(text), &ParseOptions::strict(version)).map(DesignFile::from)
}

/// Reads `input` into `db`.
pub(crate) fn load_input(
    db: &mut SourceDb,
    input: SourceInput,
    version: LanguageVersion,
) -> Result<FileId, HdlError> {
    match input {
        SourceInput::File(path) => {
            check_family(&path, version)?;
            db.load_file(&path).map_err(|err| {
                tracing::warn!(path = %path.display(), error = %err, "cannot read source file");
                HdlError::from_io(path, err)
            })
        }
        SourceInput::Text { name, text } => Ok(db.add_source(name, text)),
    }
}

/// Parses a text already in `db` with the dialect parser `options` selects.
pub(crate) fn parse_loaded(
    db: &SourceDb,
    id: FileId,
    options: &ParseOptions,
) -> Result<ParseResult, HdlError> {
    let sink = DiagnosticSink::new();
    let units = match options.version.family() {
        LanguageFamily::Vhdl => hdlio_vhdl_parser::parse_file(id, db, options, &sink)?,
        LanguageFamily::Verilog | LanguageFamily::SystemVerilog => {
            hdlio_verilog_parser::parse_file(id, db, options, &sink)?
        }
    };
    let diagnostics = sink.take_all();
    if options.recovery == RecoveryMode::Strict {
        if let Some(first) = diagnostics.iter().find(|d| d.is_error()) {
            return Err(HdlError::Syntax(Box::new(first.clone())));
        }
    }
    let source = db
        .get_file(id)
        .map(|f| f.path.clone())
        .unwrap_or_default();
    Ok(ParseResult {
        units,
        diagnostics,
        source,
    })
}
