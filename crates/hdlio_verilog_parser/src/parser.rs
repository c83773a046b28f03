//! Parser state, token primitives and the design-file loop.
//!
//! The [`VerilogParser`] cursor always rests on a significant token.
//! Modules are parsed under a guard: a syntax error becomes one diagnostic
//! tagged with the module name, the module is dropped, and parsing resumes
//! after its `endmodule`. Other SystemVerilog top-level blocks are skipped
//! up to their closing keyword.

use crate::lexer::{LexError, LexOutput};
use crate::token::{Token, VerilogToken};
use hdlio_ast::{BuildError, DesignUnit, SourceText};
use hdlio_common::{
    is_construct_available, Construct, HdlResult, InternalError, LanguageFamily, ParseOptions,
    RecoveryMode, VersionMismatchPolicy,
};
use hdlio_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, UnitContext};
use hdlio_source::{LineIndex, Location, Span};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyntaxError {
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Span,
    pub location: Location,
}

#[derive(Debug)]
pub(crate) enum Failure {
    Syntax(SyntaxError),
    Internal(InternalError),
}

impl From<InternalError> for Failure {
    fn from(e: InternalError) -> Self {
        Failure::Internal(e)
    }
}

pub(crate) type PResult<T> = Result<T, Failure>;

#[derive(Debug, Clone, Copy)]
struct VersionFault {
    construct: Construct,
    span: Span,
    location: Location,
}

/// Recursive-descent recognizer over one lexed Verilog text.
pub(crate) struct VerilogParser<'src> {
    tokens: Vec<Token>,
    lex_errors: Vec<LexError>,
    pub(crate) pos: usize,
    prev: Option<usize>,
    source: &'src str,
    path: PathBuf,
    lines: LineIndex,
    pub(crate) options: ParseOptions,
    sink: &'src DiagnosticSink,
    faults: Vec<VersionFault>,
    context: UnitContext,
    failed: bool,
}

impl<'src> VerilogParser<'src> {
    pub(crate) fn new(
        lexed: LexOutput,
        source: &'src str,
        path: &Path,
        options: ParseOptions,
        sink: &'src DiagnosticSink,
    ) -> Self {
        let mut parser = Self {
            tokens: lexed.tokens,
            lex_errors: lexed.errors,
            pos: 0,
            prev: None,
            source,
            path: path.to_path_buf(),
            lines: LineIndex::new(source),
            options,
            sink,
            faults: Vec::new(),
            context: UnitContext::FileLevel,
            failed: false,
        };
        parser.pos = parser.next_significant(0);
        parser
    }

    // ========================================================================
    // Token access
    // ========================================================================

    pub(crate) fn token_at(&self, index: usize) -> Token {
        match self.tokens.get(index).or_else(|| self.tokens.last()) {
            Some(token) => *token,
            None => Token {
                kind: VerilogToken::Eof,
                span: Span::DUMMY,
                location: Location::START,
            },
        }
    }

    pub(crate) fn current_token(&self) -> Token {
        self.token_at(self.pos)
    }

    pub(crate) fn current(&self) -> VerilogToken {
        self.current_token().kind
    }

    pub(crate) fn at(&self, kind: VerilogToken) -> bool {
        self.current() == kind
    }

    pub(crate) fn peek_index(&self, n: usize) -> usize {
        let mut idx = self.pos;
        for _ in 0..n {
            if self.token_at(idx).kind == VerilogToken::Eof {
                break;
            }
            idx = self.next_significant(idx + 1);
        }
        idx
    }

    pub(crate) fn peek_kind(&self, n: usize) -> VerilogToken {
        self.token_at(self.peek_index(n)).kind
    }

    pub(crate) fn prev_kind(&self) -> Option<VerilogToken> {
        self.prev.map(|i| self.token_at(i).kind)
    }

    pub(crate) fn prev_index(&self) -> Option<usize> {
        self.prev
    }

    pub(crate) fn text(&self, token: Token) -> &'src str {
        token.span.slice(self.source)
    }

    pub(crate) fn current_text(&self) -> &'src str {
        self.text(self.current_token())
    }

    /// Source text from the start of `first` to the end of `last`, trimmed.
    pub(crate) fn text_between(&self, first: Token, last: Token) -> String {
        Span::new(first.span.file, first.span.start, last.span.end.max(first.span.start))
            .slice(self.source)
            .trim()
            .to_string()
    }

    pub(crate) fn source_text(&self, token: Token) -> SourceText {
        SourceText::new(self.text(token), token.span, token.location)
    }

    fn next_significant(&self, mut idx: usize) -> usize {
        while idx < self.tokens.len() && self.tokens[idx].kind.is_trivia() {
            idx += 1;
        }
        idx.min(self.tokens.len().saturating_sub(1))
    }

    // ========================================================================
    // Consuming tokens
    // ========================================================================

    pub(crate) fn advance(&mut self) {
        if self.at(VerilogToken::Eof) {
            return;
        }
        self.prev = Some(self.pos);
        self.pos = self.next_significant(self.pos + 1);
    }

    pub(crate) fn eat(&mut self, kind: VerilogToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: VerilogToken, what: &str) -> PResult<Token> {
        if self.at(kind) {
            let token = self.current_token();
            self.advance();
            Ok(token)
        } else {
            Err(self.expected(what))
        }
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> PResult<SourceText> {
        if self.current().is_identifier() {
            let token = self.current_token();
            self.advance();
            Ok(self.source_text(token))
        } else {
            Err(self.expected(what))
        }
    }

    // ========================================================================
    // Errors and diagnostics
    // ========================================================================

    pub(crate) fn error_at(&self, token: Token, message: impl Into<String>) -> Failure {
        if token.kind == VerilogToken::Error {
            if let Some(lex) = self.lex_errors.iter().find(|e| e.span.start == token.span.start) {
                return Failure::Syntax(SyntaxError {
                    code: DiagnosticCode::LEXICAL,
                    message: lex.message.clone(),
                    span: lex.span,
                    location: lex.location,
                });
            }
        }
        Failure::Syntax(SyntaxError {
            code: DiagnosticCode::SYNTAX,
            message: message.into(),
            span: token.span,
            location: token.location,
        })
    }

    pub(crate) fn expected(&self, what: &str) -> Failure {
        let found = match self.current() {
            VerilogToken::Eof => "end of file".to_string(),
            _ => format!("'{}'", self.current_text()),
        };
        self.error_at(self.current_token(), format!("expected {what}, found {found}"))
    }

    pub(crate) fn check_lexical(&self) -> PResult<()> {
        if self.at(VerilogToken::Error) {
            Err(self.error_at(self.current_token(), "invalid token"))
        } else {
            Ok(())
        }
    }

    pub(crate) fn construction_error(&self, err: BuildError) -> Failure {
        let span = err.span();
        Failure::Syntax(SyntaxError {
            code: DiagnosticCode::CONSTRUCTION,
            message: err.to_string(),
            span,
            location: err
                .location()
                .unwrap_or_else(|| self.lines.location(span.start)),
        })
    }

    fn report(&mut self, diag: Diagnostic) {
        if diag.is_error() {
            self.failed = true;
        }
        self.sink.emit(diag.in_unit(self.context.clone()));
    }

    fn report_syntax(&mut self, err: SyntaxError) {
        let diag = Diagnostic::error(err.code, err.message, err.span).at(err.location);
        self.report(diag);
    }

    pub(crate) fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, token: Token) {
        let diag = Diagnostic::warning(code, message, token.span).at(token.location);
        self.report(diag);
    }

    /// Records a use of `construct` if the requested revision lacks it.
    pub(crate) fn require(&mut self, construct: Construct, token: Token) {
        if !is_construct_available(self.options.version, construct) {
            self.faults.push(VersionFault {
                construct,
                span: token.span,
                location: token.location,
            });
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    // ========================================================================
    // Design file
    // ========================================================================

    pub(crate) fn parse_source_file(&mut self) -> HdlResult<Vec<DesignUnit>> {
        let mut units = Vec::new();
        loop {
            let kind = self.current();
            match kind {
                VerilogToken::Eof => break,
                k if k.starts_module() => {
                    if let Some(unit) = self.parse_guarded_module()? {
                        units.push(unit);
                    }
                }
                k if k.closing_keyword().is_some() => {
                    if let Err(Failure::Syntax(err)) = self.skip_block(k) {
                        self.report_syntax(err);
                    }
                }
                VerilogToken::Keyword
                    if self.options.version.family() == LanguageFamily::SystemVerilog =>
                {
                    // import, typedef, timeunit, bind and friends end at `;`
                    self.skip_statement();
                }
                _ => {
                    let start = self.pos;
                    let err = match self.error_at(
                        self.current_token(),
                        format!("expected a design unit, found '{}'", self.current_text()),
                    ) {
                        Failure::Syntax(e) if e.code == DiagnosticCode::LEXICAL => e,
                        Failure::Syntax(mut e) => {
                            e.code = DiagnosticCode::UNEXPECTED_TOP_LEVEL;
                            e
                        }
                        Failure::Internal(e) => return Err(e),
                    };
                    self.report_syntax(err);
                    self.resync(start);
                }
            }
            let faults = std::mem::take(&mut self.faults);
            self.report_faults(faults, false);
            if self.options.recovery == RecoveryMode::Strict && self.failed {
                break;
            }
        }
        Ok(units)
    }

    fn parse_guarded_module(&mut self) -> HdlResult<Option<DesignUnit>> {
        let start = self.pos;
        self.context = UnitContext::Unit(
            self.peek_module_name()
                .unwrap_or_else(|| "<unnamed module>".to_string()),
        );
        let parsed = match self.parse_module() {
            Ok(unit) => {
                let faults = std::mem::take(&mut self.faults);
                if self.report_faults(faults, false) {
                    None
                } else {
                    tracing::trace!(unit = %unit.name, "parsed module");
                    Some(unit)
                }
            }
            Err(Failure::Syntax(err)) => {
                let faults = std::mem::take(&mut self.faults);
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

    fn peek_module_name(&self) -> Option<String> {
        let mut n = 1;
        if self.peek_kind(n) == VerilogToken::Keyword {
            // lifetime qualifier
            n += 1;
        }
        let token = self.token_at(self.peek_index(n));
        token.kind.is_identifier().then(|| self.text(token).to_string())
    }

    /// Warns or rejects according to the mismatch policy. Returns `true`
    /// if the enclosing module is rejected.
    fn report_faults(&mut self, faults: Vec<VersionFault>, unit_failed: bool) -> bool {
        let Some(first) = faults.first().copied() else {
            return false;
        };
        let version = self.options.version;
        let message = |fault: &VersionFault| {
            let since = fault
                .construct
                .introduced_in(version.family())
                .map_or_else(|| "a later revision".to_string(), |v| v.to_string());
            format!(
                "{} requires {since} or later; parsing as {version}",
                fault.construct.describe()
            )
        };
        match self.options.on_version_mismatch {
            VersionMismatchPolicy::Warn => {
                for fault in &faults {
                    let diag =
                        Diagnostic::warning(DiagnosticCode::VERSION_MISMATCH, message(fault), fault.span)
                            .at(fault.location);
                    self.report(diag);
                }
                false
            }
            VersionMismatchPolicy::Reject if unit_failed => false,
            VersionMismatchPolicy::Reject => {
                let diag =
                    Diagnostic::error(DiagnosticCode::VERSION_REJECTED, message(&first), first.span)
                        .at(first.location);
                self.report(diag);
                true
            }
        }
    }

    /// Skips past the next `endmodule`, or stops at a `module` keyword that
    /// starts a new item, or at end of file.
    fn resync(&mut self, start: usize) {
        loop {
            match self.current() {
                VerilogToken::Eof => break,
                VerilogToken::Endmodule => {
                    self.advance();
                    self.skip_end_label();
                    break;
                }
                k if k.starts_module()
                    && self.pos > start
                    && matches!(self.prev_kind(), None | Some(VerilogToken::Semicolon)) =>
                {
                    break
                }
                _ => self.advance(),
            }
        }
        tracing::trace!(from = start, to = self.pos, "resynchronized after error");
    }

    /// Skips a block opened by `open` through its closing keyword.
    pub(crate) fn skip_block(&mut self, open: VerilogToken) -> PResult<()> {
        let Some(close) = open.closing_keyword() else {
            return Ok(());
        };
        let mut depth = 0usize;
        loop {
            match self.current() {
                VerilogToken::Eof => return Err(self.expected(&format!("'{}'", keyword_text(close)))),
                k if k == open => depth += 1,
                k if k == close => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        self.skip_end_label();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// `: label` after an `end...` keyword.
    pub(crate) fn skip_end_label(&mut self) {
        if self.at(VerilogToken::Colon) && self.peek_kind(1).is_identifier() {
            self.advance();
            self.advance();
        }
    }

    fn skip_statement(&mut self) {
        while !matches!(self.current(), VerilogToken::Semicolon | VerilogToken::Eof) {
            self.advance();
        }
        self.advance();
    }
}

fn keyword_text(kind: VerilogToken) -> &'static str {
    match kind {
        VerilogToken::Endmodule => "endmodule",
        VerilogToken::Endinterface => "endinterface",
        VerilogToken::Endpackage => "endpackage",
        VerilogToken::Endclass => "endclass",
        VerilogToken::Endprogram => "endprogram",
        VerilogToken::Endprimitive => "endprimitive",
        VerilogToken::Endconfig => "endconfig",
        VerilogToken::Endchecker => "endchecker",
        VerilogToken::Endfunction => "endfunction",
        VerilogToken::Endtask => "endtask",
        _ => "end",
    }
}
