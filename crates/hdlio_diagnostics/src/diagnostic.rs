//! Structured diagnostic messages.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use hdlio_source::{Location, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The design unit being parsed when a diagnostic was raised.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum UnitContext {
    /// Outside of any design unit.
    #[default]
    FileLevel,
    /// Inside the named unit.
    Unit(String),
}

impl UnitContext {
    /// The unit name, or `"file-level"`.
    pub fn name(&self) -> &str {
        match self {
            UnitContext::FileLevel => "file-level",
            UnitContext::Unit(name) => name,
        }
    }
}

impl fmt::Display for UnitContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One problem found in a source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Stable code identifying the kind of problem.
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub message: String,
    /// Where the problem was detected.
    pub span: Span,
    /// 1-based position of `span.start`.
    pub location: Location,
    /// The unit being parsed at the time.
    pub unit_context: UnitContext,
    /// Extra explanatory lines.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: DiagnosticCode, message: String, span: Span) -> Self {
        Self {
            severity,
            code,
            message,
            span,
            location: Location::START,
            unit_context: UnitContext::FileLevel,
            notes: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, code, message.into(), span)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, code, message.into(), span)
    }

    /// Sets the 1-based location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Sets the enclosing unit.
    pub fn in_unit(mut self, context: UnitContext) -> Self {
        self.unit_context = context;
        self
    }

    /// Adds a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Returns `true` for error severity.
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] at line {}, column {} ({}): {}",
            self.severity,
            self.code,
            self.location.line,
            self.location.column,
            self.unit_context,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error(DiagnosticCode::SYNTAX, "expected ':'", Span::DUMMY);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.unit_context, UnitContext::FileLevel);
        assert_eq!(diag.location, Location::START);
        assert!(diag.is_error());
    }

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::warning(
            DiagnosticCode::END_LABEL_MISMATCH,
            "end label does not match",
            Span::DUMMY,
        )
        .at(Location::new(4, 13))
        .in_unit(UnitContext::Unit("counter".into()))
        .with_note("expected 'counter'");
        assert_eq!(diag.location, Location::new(4, 13));
        assert_eq!(diag.unit_context.name(), "counter");
        assert_eq!(diag.notes.len(), 1);
        assert!(!diag.is_error());
    }

    #[test]
    fn display_mentions_context_and_position() {
        let diag = Diagnostic::error(DiagnosticCode::SYNTAX, "expected ':'", Span::DUMMY)
            .at(Location::new(3, 9))
            .in_unit(UnitContext::Unit("bad_entity".into()));
        assert_eq!(
            diag.to_string(),
            "error[E101] at line 3, column 9 (bad_entity): expected ':'"
        );
        let file_level = Diagnostic::error(DiagnosticCode::UNEXPECTED_TOP_LEVEL, "junk", Span::DUMMY);
        assert!(file_level.to_string().contains("(file-level)"));
    }

    #[test]
    fn serde_roundtrip() {
        let diag = Diagnostic::error(DiagnosticCode::LEXICAL, "unterminated string", Span::DUMMY)
            .in_unit(UnitContext::Unit("e".into()));
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diag);
    }
}
