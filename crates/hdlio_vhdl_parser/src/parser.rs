//! Parser state and token-level primitives.
//!
//! The [`VhdlParser`] walks the lexed token stream with a cursor that always
//! rests on a significant (non-trivia) token. Rules return [`PResult`]; a
//! [`Failure::Syntax`] aborts the current design unit and is turned into a
//! diagnostic by the recovery layer, while a [`Failure::Internal`] aborts
//! the whole parse.

use crate::lexer::{LexError, LexOutput};
use crate::token::{Token, VhdlToken};
use hdlio_ast::{BuildError, SourceText};
use hdlio_common::{is_construct_available, Construct, InternalError, ParseOptions};
use hdlio_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, UnitContext};
use hdlio_source::{LineIndex, Location, Span};
use std::path::{Path, PathBuf};

/// An error that ends the current design unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyntaxError {
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Span,
    pub location: Location,
}

/// Why a parsing rule gave up.
#[derive(Debug)]
pub(crate) enum Failure {
    Syntax(SyntaxError),
    Internal(InternalError),
}

impl From<SyntaxError> for Failure {
    fn from(e: SyntaxError) -> Self {
        Failure::Syntax(e)
    }
}

impl From<InternalError> for Failure {
    fn from(e: InternalError) -> Self {
        Failure::Internal(e)
    }
}

pub(crate) type PResult<T> = Result<T, Failure>;

/// A use of a construct the requested revision does not have.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VersionFault {
    pub construct: Construct,
    pub span: Span,
    pub location: Location,
}

/// Recursive-descent parser over one lexed VHDL text.
pub(crate) struct VhdlParser<'src> {
    tokens: Vec<Token>,
    lex_errors: Vec<LexError>,
    /// Index of the current significant token.
    pub(crate) pos: usize,
    /// Index of the last consumed significant token.
    prev: Option<usize>,
    source: &'src str,
    path: PathBuf,
    lines: LineIndex,
    pub(crate) options: ParseOptions,
    sink: &'src DiagnosticSink,
    faults: Vec<VersionFault>,
    pub(crate) context: UnitContext,
    /// An error diagnostic has been emitted.
    pub(crate) failed: bool,
}

impl<'src> VhdlParser<'src> {
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
        parser.pos = parser.skip_trivia(0);
        parser
    }

    // ========================================================================
    // Token access
    // ========================================================================

    pub(crate) fn token_at(&self, index: usize) -> Token {
        match self.tokens.get(index).or_else(|| self.tokens.last()) {
            Some(token) => *token,
            None => Token {
                kind: VhdlToken::Eof,
                span: Span::DUMMY,
                location: Location::START,
            },
        }
    }

    pub(crate) fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn current_token(&self) -> Token {
        self.token_at(self.pos)
    }

    pub(crate) fn current(&self) -> VhdlToken {
        self.current_token().kind
    }

    pub(crate) fn at(&self, kind: VhdlToken) -> bool {
        self.current() == kind
    }

    /// Kind of the `n`-th significant token after the current one.
    pub(crate) fn peek_kind(&self, n: usize) -> VhdlToken {
        self.token_at(self.peek_index(n)).kind
    }

    pub(crate) fn peek_index(&self, n: usize) -> usize {
        let mut idx = self.pos;
        for _ in 0..n {
            if self.token_at(idx).kind == VhdlToken::Eof {
                break;
            }
            idx = self.next_significant(idx + 1);
        }
        idx
    }

    /// Kind of the first significant token after index `idx`.
    pub(crate) fn kind_after(&self, idx: usize) -> VhdlToken {
        self.token_at(self.next_significant(idx + 1)).kind
    }

    /// Kind of the last consumed significant token.
    pub(crate) fn prev_kind(&self) -> Option<VhdlToken> {
        self.prev.map(|i| self.token_at(i).kind)
    }

    pub(crate) fn prev_index(&self) -> Option<usize> {
        self.prev
    }

    pub(crate) fn prev_span(&self) -> Span {
        self.prev
            .map_or(self.current_token().span, |i| self.token_at(i).span)
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

    pub(crate) fn location_of(&self, span: Span) -> Location {
        self.lines.location(span.start)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn next_significant(&self, mut idx: usize) -> usize {
        while idx < self.tokens.len() && self.tokens[idx].kind.is_trivia() {
            idx += 1;
        }
        idx.min(self.tokens.len().saturating_sub(1))
    }

    /// Like [`Self::next_significant`] but records block comments the
    /// revision does not allow.
    fn skip_trivia(&mut self, mut idx: usize) -> usize {
        while let Some(token) = self.tokens.get(idx).copied() {
            if !token.kind.is_trivia() {
                break;
            }
            if token.kind == VhdlToken::BlockComment {
                self.require(Construct::BlockComment, token);
            }
            idx += 1;
        }
        idx.min(self.tokens.len().saturating_sub(1))
    }

    // ========================================================================
    // Consuming tokens
    // ========================================================================

    pub(crate) fn advance(&mut self) {
        if self.at(VhdlToken::Eof) {
            return;
        }
        self.prev = Some(self.pos);
        self.pos = self.skip_trivia(self.pos + 1);
    }

    /// Advances to the significant token at `index`, which must not be
    /// behind the cursor.
    pub(crate) fn advance_to(&mut self, index: usize) {
        while self.pos < index && !self.at(VhdlToken::Eof) {
            self.advance();
        }
    }

    pub(crate) fn eat(&mut self, kind: VhdlToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: VhdlToken, what: &str) -> PResult<Token> {
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

    pub(crate) fn source_text(&self, token: Token) -> SourceText {
        SourceText::new(self.text(token), token.span, token.location)
    }

    // ========================================================================
    // Errors and diagnostics
    // ========================================================================

    /// Describes the current token for "found ..." messages.
    fn found(&self) -> String {
        match self.current() {
            VhdlToken::Eof => "end of file".to_string(),
            _ => format!("'{}'", self.current_text()),
        }
    }

    /// A syntax error at the current token. An error token reports the
    /// lexer's message instead.
    pub(crate) fn error_here(&self, message: impl Into<String>) -> Failure {
        let token = self.current_token();
        if token.kind == VhdlToken::Error {
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
        self.error_here(format!("expected {what}, found {}", self.found()))
    }

    /// Fails if the current token is a lexer error token.
    pub(crate) fn check_lexical(&self) -> PResult<()> {
        if self.at(VhdlToken::Error) {
            Err(self.error_here("invalid token"))
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
            location: err.location().unwrap_or_else(|| self.location_of(span)),
        })
    }

    /// Emits a diagnostic tagged with the current unit context.
    pub(crate) fn report(&mut self, diag: Diagnostic) {
        if diag.is_error() {
            self.failed = true;
        }
        self.sink.emit(diag.in_unit(self.context.clone()));
    }

    pub(crate) fn report_syntax(&mut self, err: SyntaxError) {
        let diag = Diagnostic::error(err.code, err.message, err.span).at(err.location);
        self.report(diag);
    }

    pub(crate) fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, token: Token) {
        let diag = Diagnostic::warning(code, message, token.span).at(token.location);
        self.report(diag);
    }

    // ========================================================================
    // Revision gating
    // ========================================================================

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

    pub(crate) fn take_faults(&mut self) -> Vec<VersionFault> {
        std::mem::take(&mut self.faults)
    }

    /// Puts faults back to be reported by a later flush.
    pub(crate) fn defer_faults(&mut self, faults: Vec<VersionFault>) {
        self.faults.extend(faults);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use hdlio_common::LanguageVersion;
    use hdlio_source::FileId;

    fn with_parser<R>(src: &str, f: impl FnOnce(&mut VhdlParser<'_>) -> R) -> R {
        let sink = DiagnosticSink::new();
        let lexed = lex(src, FileId::from_raw(0), LanguageVersion::Vhdl2008);
        let mut parser = VhdlParser::new(
            lexed,
            src,
            Path::new("test.vhd"),
            ParseOptions::default(),
            &sink,
        );
        f(&mut parser)
    }

    #[test]
    fn cursor_skips_trivia() {
        with_parser("-- lead\n\nentity -- x\n e", |p| {
            assert_eq!(p.current(), VhdlToken::Entity);
            p.advance();
            assert!(p.at(VhdlToken::Identifier));
            assert_eq!(p.prev_kind(), Some(VhdlToken::Entity));
        });
    }

    #[test]
    fn peek_counts_significant_tokens() {
        with_parser("package -- c\n body p is", |p| {
            assert_eq!(p.peek_kind(1), VhdlToken::Body);
            assert_eq!(p.peek_kind(2), VhdlToken::Identifier);
            assert_eq!(p.peek_kind(3), VhdlToken::Is);
            assert_eq!(p.peek_kind(9), VhdlToken::Eof);
        });
    }

    #[test]
    fn expect_reports_found_text() {
        with_parser("entity 42", |p| {
            p.advance();
            match p.expect_ident("entity name") {
                Err(Failure::Syntax(e)) => {
                    assert_eq!(e.message, "expected entity name, found '42'");
                    assert_eq!(e.code, DiagnosticCode::SYNTAX);
                }
                other => panic!("unexpected {other:?}"),
            }
        });
    }

    #[test]
    fn error_token_reports_lexer_message() {
        with_parser("entity \"open", |p| {
            p.advance();
            match p.check_lexical() {
                Err(Failure::Syntax(e)) => {
                    assert_eq!(e.code, DiagnosticCode::LEXICAL);
                    assert_eq!(e.message, "unterminated string literal");
                }
                other => panic!("unexpected {other:?}"),
            }
        });
    }

    #[test]
    fn text_between_covers_inner_spacing() {
        with_parser("std_logic_vector (7 downto 0)", |p| {
            let first = p.current_token();
            let last = p.token_at(p.token_count() - 2);
            assert_eq!(p.text_between(first, last), "std_logic_vector (7 downto 0)");
        });
    }
}
