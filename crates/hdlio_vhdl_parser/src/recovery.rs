//! Design-file loop and per-unit error isolation.
//!
//! Each library unit is parsed under a guard. A syntax error becomes one
//! diagnostic tagged with the unit's name, the unit is dropped, and the
//! cursor resynchronizes from the point of failure at the next library-unit
//! keyword that starts a statement (or at end of file). Text outside any
//! unit that is not a context clause is reported at file level.

use crate::body::{BodyMode, Nesting, Step};
use crate::parser::{Failure, VersionFault, VhdlParser};
use crate::token::VhdlToken;
use hdlio_ast::DesignUnit;
use hdlio_common::{Construct, HdlResult, RecoveryMode, VersionMismatchPolicy};
use hdlio_diagnostics::{Diagnostic, DiagnosticCode, UnitContext};

impl<'src> VhdlParser<'src> {
    /// Parses every unit of the file.
    pub(crate) fn parse_design_file(&mut self) -> HdlResult<Vec<DesignUnit>> {
        let mut units = Vec::new();
        loop {
            match self.current() {
                VhdlToken::Eof => break,
                VhdlToken::Library | VhdlToken::Use => self.skip_context_clause(),
                VhdlToken::Context => {
                    self.require(Construct::ContextReference, self.current_token());
                    self.skip_context_item();
                }
                VhdlToken::Identifier if self.at_unreserved_context() => {
                    self.require(Construct::ContextReference, self.current_token());
                    self.skip_context_item();
                }
                kind if kind.starts_library_unit() => {
                    if let Some(unit) = self.parse_guarded_unit()? {
                        units.push(unit);
                    }
                }
                _ => {
                    let start = self.pos;
                    let found = self.current_text().to_string();
                    let err = match self.error_here("") {
                        Failure::Syntax(e) if e.code == DiagnosticCode::LEXICAL => e,
                        Failure::Syntax(mut e) => {
                            e.code = DiagnosticCode::UNEXPECTED_TOP_LEVEL;
                            e.message = format!("expected a design unit, found '{found}'");
                            e
                        }
                        Failure::Internal(e) => return Err(e),
                    };
                    self.report_syntax(err);
                    self.resync(start);
                }
            }
            self.flush_faults();
            if self.options.recovery == RecoveryMode::Strict && self.failed {
                break;
            }
        }
        Ok(units)
    }

    /// Parses one unit, converting a syntax error into a diagnostic.
    fn parse_guarded_unit(&mut self) -> HdlResult<Option<DesignUnit>> {
        let start = self.pos;
        let keyword = self.current_text().to_ascii_lowercase();
        self.context = UnitContext::Unit(
            self.peek_unit_name()
                .unwrap_or_else(|| format!("<unnamed {keyword}>")),
        );

        let parsed = match self.parse_unit() {
            Ok(unit) => {
                // trivia skipped after the closing `;` belongs to the file
                let (inside, after): (Vec<_>, Vec<_>) = self
                    .take_faults()
                    .into_iter()
                    .partition(|f| f.span.start >= unit.span.start && f.span.start < unit.span.end);
                self.defer_faults(after);
                if self.report_faults(inside, false) {
                    None
                } else {
                    tracing::trace!(unit = %unit.name, kind = %unit.unit_kind(), "parsed design unit");
                    Some(unit)
                }
            }
            Err(Failure::Syntax(err)) => {
                let faults = self.take_faults();
                self.report_faults(faults, true);
                self.report_syntax(err);
                if self.options.recovery == RecoveryMode::Lenient {
                    self.resync(start);
                }
                None
            }
            Err(Failure::Internal(err)) => return Err(err),
        };
        self.context = UnitContext::FileLevel;
        Ok(parsed)
    }

    /// Reports pending faults in the current context.
    fn flush_faults(&mut self) {
        let faults = self.take_faults();
        self.report_faults(faults, false);
    }

    /// Reports revision faults according to the mismatch policy. Returns
    /// `true` if they rejected the enclosing unit.
    ///
    /// A unit that already failed gets no extra rejection error.
    fn report_faults(&mut self, faults: Vec<VersionFault>, unit_failed: bool) -> bool {
        let Some(first) = faults.first().copied() else {
            return false;
        };
        match self.options.on_version_mismatch {
            VersionMismatchPolicy::Warn => {
                for fault in faults {
                    let diag = Diagnostic::warning(
                        DiagnosticCode::VERSION_MISMATCH,
                        self.fault_message(&fault),
                        fault.span,
                    )
                    .at(fault.location);
                    self.report(diag);
                }
                false
            }
            VersionMismatchPolicy::Reject if unit_failed => false,
            VersionMismatchPolicy::Reject => {
                let diag = Diagnostic::error(
                    DiagnosticCode::VERSION_REJECTED,
                    self.fault_message(&first),
                    first.span,
                )
                .at(first.location);
                self.report(diag);
                true
            }
        }
    }

    fn fault_message(&self, fault: &VersionFault) -> String {
        let version = self.options.version;
        let since = fault
            .construct
            .introduced_in(version.family())
            .map_or_else(|| "a later revision".to_string(), |v| v.to_string());
        format!(
            "{} requires {since} or later; parsing as {version}",
            fault.construct.describe()
        )
    }

    /// Skips tokens from the cursor until a library-unit keyword that
    /// starts a statement, or end of file. Tokens up to `unit_start` are
    /// never a stopping point.
    ///
    /// Constructs are tracked from the cursor only, so frames left open by
    /// the failed unit do not hide the units after it. `package` also
    /// names nested packages and generic packages, so it stops the scan
    /// only outside parentheses with no construct opened since the cursor.
    pub(crate) fn resync(&mut self, unit_start: usize) {
        let from = self.pos;
        let mut nesting = Nesting::new(BodyMode::Entity);
        let mut depth = 0i32;
        loop {
            let kind = self.current();
            if kind == VhdlToken::Eof {
                break;
            }
            let statement_start = matches!(self.prev_kind(), None | Some(VhdlToken::Semicolon));
            let stops = match kind {
                VhdlToken::Package => depth <= 0 && nesting.is_empty(),
                kind => kind.starts_library_unit(),
            };
            if stops && statement_start && self.pos > unit_start {
                break;
            }
            let before = self.pos;
            match kind {
                VhdlToken::LeftParen => depth += 1,
                VhdlToken::RightParen => depth -= 1,
                _ => {}
            }
            // a closer after a stray `end` opens nothing
            if matches!(kind, VhdlToken::LeftParen | VhdlToken::RightParen)
                || self.prev_kind() == Some(VhdlToken::End)
            {
                self.advance();
            } else if let Ok(Step::UnitEnd) | Err(_) = self.step(&mut nesting) {
                if self.pos == before {
                    self.advance();
                }
            }
        }
        tracing::trace!(from, to = self.pos, "resynchronized after error");
    }

    /// `context` spelled as an identifier before VHDL-2008, followed by a
    /// name.
    fn at_unreserved_context(&self) -> bool {
        self.current_text().eq_ignore_ascii_case("context") && self.peek_kind(1).is_identifier()
    }

    /// `library a, b;` or `use x.y.all;`
    fn skip_context_clause(&mut self) {
        while !matches!(self.current(), VhdlToken::Semicolon | VhdlToken::Eof) {
            if self.current().starts_library_unit() || self.at(VhdlToken::Error) {
                let err = match self.expected("';'") {
                    Failure::Syntax(e) => e,
                    Failure::Internal(_) => return,
                };
                self.report_syntax(err);
                if self.at(VhdlToken::Error) {
                    self.advance();
                }
                return;
            }
            self.advance();
        }
        self.advance();
    }

    /// A context reference (`context lib.ctx;`) or a context declaration
    /// (`context C is ... end [context] [C];`).
    fn skip_context_item(&mut self) {
        let declaration = self.peek_kind(2) == VhdlToken::Is;
        if declaration {
            while !matches!(self.current(), VhdlToken::End | VhdlToken::Eof) {
                self.advance();
            }
        }
        self.skip_context_clause();
    }
}
