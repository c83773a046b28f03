//! Lexical analyzer for VHDL source text.
//!
//! Converts source text into a sequence of [`Token`]s. Keywords are
//! case-insensitive and revision-aware: a word is only a keyword if it is
//! reserved in the requested [`LanguageVersion`], so `context` is an
//! ordinary identifier when lexing VHDL-1993. Comments and blank lines are
//! emitted as trivia tokens. Malformed input produces [`VhdlToken::Error`]
//! tokens and a matching [`LexError`]; lexing always continues to the end.

use crate::token::{lookup_keyword, Token, VhdlToken};
use hdlio_common::{is_reserved, LanguageVersion};
use hdlio_source::{FileId, LineIndex, Location, Span};

/// A malformed token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    /// What is wrong.
    pub message: String,
    /// Span of the offending text.
    pub span: Span,
    /// Position of `span.start`.
    pub location: Location,
}

/// Everything the lexer produced for one text.
#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    /// Tokens including trivia, always ending with [`VhdlToken::Eof`].
    pub tokens: Vec<Token>,
    /// One entry per [`VhdlToken::Error`] token, in source order.
    pub errors: Vec<LexError>,
}

impl LexOutput {
    /// The error recorded for the error token starting at `span`.
    pub fn error_at(&self, span: Span) -> Option<&LexError> {
        self.errors.iter().find(|e| e.span.start == span.start)
    }
}

/// Lexes `source` under the reserved-word set of `version`.
pub fn lex(source: &str, file: FileId, version: LanguageVersion) -> LexOutput {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
        version,
        lines: LineIndex::new(source),
        out: LexOutput::default(),
        code_on_line: false,
    };
    lexer.lex_all();
    lexer.out
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
    version: LanguageVersion,
    lines: LineIndex,
    out: LexOutput,
    /// A non-trivia token was produced on the current line.
    code_on_line: bool,
}

impl<'a> Lexer<'a> {
    fn lex_all(&mut self) {
        loop {
            let gap_start = self.pos;
            let newlines = self.skip_whitespace();
            if newlines > 0 {
                self.code_on_line = false;
            }
            if self.pos >= self.source.len() {
                let eof = self.token(VhdlToken::Eof, self.pos);
                self.out.tokens.push(eof);
                break;
            }
            if newlines >= 2 && !self.out.tokens.is_empty() {
                let blank = Token {
                    kind: VhdlToken::BlankLine,
                    span: Span::new(self.file, gap_start as u32, self.pos as u32),
                    location: self.lines.location(gap_start as u32),
                };
                self.out.tokens.push(blank);
            }
            let token = self.next_token();
            if !token.kind.is_trivia() {
                self.code_on_line = true;
            }
            self.out.tokens.push(token);
        }
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn token(&self, kind: VhdlToken, start: usize) -> Token {
        Token {
            kind,
            span: self.span_from(start),
            location: self.lines.location(start as u32),
        }
    }

    fn error(&mut self, msg: impl Into<String>, start: usize) -> Token {
        let token = self.token(VhdlToken::Error, start);
        self.out.errors.push(LexError {
            message: msg.into(),
            span: token.span,
            location: token.location,
        });
        token
    }

    /// Skips whitespace and returns how many line feeds were crossed.
    fn skip_whitespace(&mut self) -> usize {
        let mut newlines = 0;
        while let Some(&b) = self.source.get(self.pos) {
            if !b.is_ascii_whitespace() {
                break;
            }
            if b == b'\n' {
                newlines += 1;
            }
            self.pos += 1;
        }
        newlines
    }

    fn prev_kind(&self) -> Option<VhdlToken> {
        self.out
            .tokens
            .iter()
            .rev()
            .map(|t| t.kind)
            .find(|k| !k.is_trivia())
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if b == b'-' && self.peek_at(1) == b'-' {
            return self.lex_line_comment(start);
        }
        if b == b'/' && self.peek_at(1) == b'*' {
            return self.lex_block_comment(start);
        }

        // A quote right after a name or ')' is an attribute tick, never the
        // start of a character literal.
        if b == b'\'' {
            let after_name = matches!(
                self.prev_kind(),
                Some(VhdlToken::Identifier | VhdlToken::ExtendedIdentifier | VhdlToken::RightParen)
            );
            if !after_name && self.peek_at(2) == b'\'' && self.pos + 2 < self.source.len() {
                self.pos += 3;
                return self.token(VhdlToken::CharLiteral, start);
            }
        }

        if is_ident_start(b) {
            return self.lex_identifier_or_keyword(start);
        }
        if b == b'\\' {
            return self.lex_extended_identifier(start);
        }
        if b.is_ascii_digit() {
            return self.lex_number(start);
        }
        if b == b'"' {
            return self.lex_string(start);
        }
        self.lex_operator(start)
    }

    fn lex_line_comment(&mut self, start: usize) -> Token {
        self.pos += 2;
        while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
            self.pos += 1;
        }
        let body = &self.source[start + 2..self.pos];
        let lead = body.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let trail = body
            .iter()
            .rev()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
        let text_start = start + 2 + lead;
        let text_end = (self.pos - trail).max(text_start);
        let kind = if self.code_on_line {
            VhdlToken::TrailingComment
        } else {
            VhdlToken::Comment
        };
        Token {
            kind,
            span: Span::new(self.file, text_start as u32, text_end as u32),
            location: self.lines.location(start as u32),
        }
    }

    fn lex_block_comment(&mut self, start: usize) -> Token {
        self.pos += 2;
        while self.pos < self.source.len() {
            if self.peek() == b'*' && self.peek_at(1) == b'/' {
                self.pos += 2;
                if self.source[start..self.pos].contains(&b'\n') {
                    self.code_on_line = false;
                }
                return self.token(VhdlToken::BlockComment, start);
            }
            self.pos += 1;
        }
        self.error("unterminated block comment", start)
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];

        // Bit-string literal: B"...", X"...", UX"..." etc.
        if self.peek() == b'"' && text.len() <= 2 {
            let lower = text.to_ascii_lowercase();
            let is_bit_prefix = matches!(
                lower.as_slice(),
                b"b" | b"o" | b"x" | b"ub" | b"uo" | b"ux" | b"sb" | b"so" | b"sx" | b"d"
            );
            if is_bit_prefix {
                return self.lex_bit_string(start);
            }
        }

        let lower = String::from_utf8_lossy(text).to_ascii_lowercase();
        let kind = if is_reserved(self.version, &lower) {
            lookup_keyword(&lower).unwrap_or(VhdlToken::Keyword)
        } else {
            VhdlToken::Identifier
        };
        self.token(kind, start)
    }

    fn lex_bit_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        while self.pos < self.source.len() && self.source[self.pos] != b'"' {
            if self.source[self.pos] == b'\n' {
                return self.error("unterminated bit string literal", start);
            }
            self.pos += 1;
        }
        if self.pos >= self.source.len() {
            return self.error("unterminated bit string literal", start);
        }
        self.pos += 1;
        self.token(VhdlToken::BitStringLiteral, start)
    }

    fn lex_extended_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'\\' if self.peek_at(1) == b'\\' => self.pos += 2,
                b'\\' => {
                    self.pos += 1;
                    return self.token(VhdlToken::ExtendedIdentifier, start);
                }
                b'\n' => break,
                _ => self.pos += 1,
            }
        }
        self.error("unterminated extended identifier", start)
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.eat_digits();

        if self.peek() == b'#' {
            self.pos += 1;
            while self.pos < self.source.len() {
                let ch = self.source[self.pos];
                if ch.is_ascii_hexdigit() || ch == b'_' || ch == b'.' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            if self.peek() != b'#' {
                return self.error("expected closing '#' in based literal", start);
            }
            self.pos += 1;
            self.eat_exponent();
            let kind = if self.source[start..self.pos].contains(&b'.') {
                VhdlToken::RealLiteral
            } else {
                VhdlToken::IntLiteral
            };
            return self.token(kind, start);
        }

        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_digits();
            self.eat_exponent();
            return self.token(VhdlToken::RealLiteral, start);
        }

        self.eat_exponent();
        self.token(VhdlToken::IntLiteral, start)
    }

    fn eat_digits(&mut self) {
        while self.pos < self.source.len() {
            let ch = self.source[self.pos];
            if ch.is_ascii_digit() || ch == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn eat_exponent(&mut self) {
        if matches!(self.peek(), b'e' | b'E') {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            self.eat_digits();
        }
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            match self.source.get(self.pos) {
                None | Some(b'\n') => return self.error("unterminated string literal", start),
                Some(b'"') if self.peek_at(1) == b'"' => self.pos += 2,
                Some(b'"') => {
                    self.pos += 1;
                    return self.token(VhdlToken::StringLiteral, start);
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn lex_operator(&mut self, start: usize) -> Token {
        let b = self.peek();
        self.pos += 1;
        let kind = match b {
            b'(' => VhdlToken::LeftParen,
            b')' => VhdlToken::RightParen,
            b',' => VhdlToken::Comma,
            b';' => VhdlToken::Semicolon,
            b'.' => VhdlToken::Dot,
            b'\'' => VhdlToken::Tick,
            b':' if self.peek() == b'=' => {
                self.pos += 1;
                VhdlToken::ColonEquals
            }
            b':' => VhdlToken::Colon,
            b'=' if self.peek() == b'>' => {
                self.pos += 1;
                VhdlToken::Arrow
            }
            b'<' if self.peek() == b'=' => {
                self.pos += 1;
                VhdlToken::LessEquals
            }
            b'<' if self.peek() == b'>' => {
                self.pos += 1;
                VhdlToken::Box
            }
            b'<' | b'>' | b'=' | b'/' => {
                if matches!(self.peek(), b'=' | b'<' | b'>') {
                    self.pos += 1;
                }
                VhdlToken::Operator
            }
            b'*' => {
                if self.peek() == b'*' {
                    self.pos += 1;
                }
                VhdlToken::Operator
            }
            b'?' => {
                // ?? ?= ?/= ?< ?<= ?> ?>=
                match self.peek() {
                    b'?' | b'=' => self.pos += 1,
                    b'/' | b'<' | b'>' => {
                        self.pos += 1;
                        if self.peek() == b'=' {
                            self.pos += 1;
                        }
                    }
                    _ => {}
                }
                VhdlToken::Operator
            }
            b'+' | b'-' | b'&' | b'|' | b'^' | b'@' | b'[' | b']' => VhdlToken::Operator,
            _ => {
                // Swallow the rest of a multi-byte character.
                while self.pos < self.source.len() && (self.source[self.pos] & 0xC0) == 0x80 {
                    self.pos += 1;
                }
                let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
                return self.error(format!("unrecognized character '{text}'"), start);
            }
        };
        self.token(kind, start)
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
