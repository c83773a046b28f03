//! Human-readable rendering of diagnostics.

use crate::diagnostic::Diagnostic;
use hdlio_source::SourceDb;

/// Formats a diagnostic for some output target.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Renders in a compiler-style terminal layout:
///
/// ```text
/// error[E101]: expected ':' after port name
///   --> src/bad.vhd:3:9 (in bad_entity)
///    |
///  3 |     clk in std_logic;
///    |         ^^
/// ```
pub struct TerminalRenderer {
    /// Wrap the header in ANSI color codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let text = format!("{}[{}]: {}", diag.severity, diag.code, diag.message);
        if !self.color {
            return text;
        }
        let color = if diag.is_error() { "31" } else { "33" };
        format!("\x1b[1;{color}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = self.header(diag);
        out.push('\n');

        match source_db.get_file(diag.span.file) {
            Some(file) => {
                let loc = diag.location;
                out.push_str(&format!(
                    "  --> {}:{} (in {})\n",
                    file.path.display(),
                    loc,
                    diag.unit_context
                ));
                let line_num = loc.line.to_string();
                let padding = " ".repeat(line_num.len());
                out.push_str(&format!("{padding} |\n"));
                out.push_str(&format!("{line_num} | {}\n", file.line_text(diag.span.start)));
                let carets = "^".repeat(diag.span.len().max(1) as usize);
                let col_padding = " ".repeat((loc.column as usize).saturating_sub(1));
                out.push_str(&format!("{padding} | {col_padding}{carets}\n"));
            }
            None => {
                out.push_str(&format!("  --> {} (in {})\n", diag.location, diag.unit_context));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;
    use crate::diagnostic::UnitContext;
    use hdlio_source::{Location, Span};

    #[test]
    fn render_with_source_line() {
        let mut db = SourceDb::new();
        let id = db.add_source("bad.vhd", "entity bad is\n  port (clk in bit);\nend;\n".to_string());
        let span = Span::new(id, 26, 28);
        let diag = Diagnostic::error(DiagnosticCode::SYNTAX, "expected ':'", span)
            .at(db.location(span).unwrap())
            .in_unit(UnitContext::Unit("bad".into()));

        let out = TerminalRenderer::new(false).render(&diag, &db);
        assert!(out.contains("error[E101]: expected ':'"));
        assert!(out.contains("--> bad.vhd:2:13 (in bad)"));
        assert!(out.contains("2 |   port (clk in bit);"));
        assert!(out.contains("         ^^"));
    }

    #[test]
    fn render_without_source() {
        let db = SourceDb::new();
        let diag = Diagnostic::warning(DiagnosticCode::VERSION_MISMATCH, "old", Span::DUMMY)
            .at(Location::new(1, 1))
            .with_note("block comments need VHDL-2008");
        let out = TerminalRenderer::new(false).render(&diag, &db);
        assert!(out.starts_with("warning[W101]: old"));
        assert!(out.contains("--> 1:1 (in file-level)"));
        assert!(out.contains("= note: block comments need VHDL-2008"));
    }

    #[test]
    fn color_wraps_header() {
        let db = SourceDb::new();
        let diag = Diagnostic::error(DiagnosticCode::SYNTAX, "x", Span::DUMMY);
        let out = TerminalRenderer::new(true).render(&diag, &db);
        assert!(out.starts_with("\x1b[1;31m"));
    }
}
