//! Lexical analyzer for Verilog and SystemVerilog source text.
//!
//! Keywords are case-sensitive and depend on the requested revision: a
//! word lexes as a keyword only if that revision reserves it, so `logic`
//! is an identifier under Verilog-2005. `//` comments and blank lines are
//! kept as trivia tokens the same way `--` comments are in VHDL. Compiler
//! directives are not expanded; each directive line becomes a single
//! trivia token. Malformed input produces [`VerilogToken::Error`] tokens
//! and a matching [`LexError`].

use crate::token::{lookup_keyword, Token, VerilogToken};
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

/// Tokens and errors for one text.
#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    /// Tokens including trivia, always ending with [`VerilogToken::Eof`].
    pub tokens: Vec<Token>,
    /// One entry per [`VerilogToken::Error`] token.
    pub errors: Vec<LexError>,
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
    code_on_line: bool,
}

impl Lexer<'_> {
    fn lex_all(&mut self) {
        loop {
            let gap_start = self.pos;
            let newlines = self.skip_whitespace();
            if newlines > 0 {
                self.code_on_line = false;
            }
            if self.pos >= self.source.len() {
                let eof = self.token(VerilogToken::Eof, self.pos);
                self.out.tokens.push(eof);
                break;
            }
            if newlines >= 2 && !self.out.tokens.is_empty() {
                self.out.tokens.push(Token {
                    kind: VerilogToken::BlankLine,
                    span: Span::new(self.file, gap_start as u32, self.pos as u32),
                    location: self.lines.location(gap_start as u32),
                });
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

    fn token(&self, kind: VerilogToken, start: usize) -> Token {
        Token {
            kind,
            span: self.span_from(start),
            location: self.lines.location(start as u32),
        }
    }

    fn error(&mut self, msg: impl Into<String>, start: usize) -> Token {
        let token = self.token(VerilogToken::Error, start);
        self.out.errors.push(LexError {
            message: msg.into(),
            span: token.span,
            location: token.location,
        });
        token
    }

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

    fn skip_to_line_end(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();
        match b {
            b'/' if self.peek_at(1) == b'/' => self.lex_line_comment(start),
            b'/' if self.peek_at(1) == b'*' => self.lex_block_comment(start),
            b'`' => {
                self.skip_to_line_end();
                self.token(VerilogToken::Directive, start)
            }
            b'\\' => self.lex_escaped_identifier(start),
            b'$' => {
                self.pos += 1;
                self.eat_ident_chars();
                self.token(VerilogToken::SystemIdentifier, start)
            }
            b'"' => self.lex_string(start),
            b'\'' => self.lex_based_number(start),
            _ if b.is_ascii_digit() => self.lex_number(start),
            _ if b.is_ascii_alphabetic() || b == b'_' => self.lex_word(start),
            _ => self.lex_operator(start),
        }
    }

    fn lex_line_comment(&mut self, start: usize) -> Token {
        self.pos += 2;
        self.skip_to_line_end();
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
            VerilogToken::TrailingComment
        } else {
            VerilogToken::Comment
        };
        Token {
            kind,
            span: Span::new(self.file, text_start as u32, text_end as u32),
            location: self.lines.location(start as u32),
        }
    }

    // Block comments do not nest in Verilog.
    fn lex_block_comment(&mut self, start: usize) -> Token {
        self.pos += 2;
        while self.pos < self.source.len() {
            if self.peek() == b'*' && self.peek_at(1) == b'/' {
                self.pos += 2;
                if self.source[start..self.pos].contains(&b'\n') {
                    self.code_on_line = false;
                }
                return self.token(VerilogToken::BlockComment, start);
            }
            self.pos += 1;
        }
        self.error("unterminated block comment", start)
    }

    fn eat_ident_chars(&mut self) {
        while self.pos < self.source.len() {
            let ch = self.source[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn lex_word(&mut self, start: usize) -> Token {
        self.eat_ident_chars();
        let word = String::from_utf8_lossy(&self.source[start..self.pos]);
        let kind = if is_reserved(self.version, &word) {
            lookup_keyword(&word).unwrap_or(VerilogToken::Keyword)
        } else {
            VerilogToken::Identifier
        };
        self.token(kind, start)
    }

    /// `\` followed by any printable characters up to whitespace.
    fn lex_escaped_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        while self.pos < self.source.len() && !self.source[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos == start + 1 {
            return self.error("empty escaped identifier", start);
        }
        self.token(VerilogToken::EscapedIdentifier, start)
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return self.token(VerilogToken::StringLiteral, start);
                }
                b'\n' => break,
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.source.len());
        self.error("unterminated string literal", start)
    }

    /// Decimal, real, or the size prefix of a based literal (`8'hFF`).
    fn lex_number(&mut self, start: usize) -> Token {
        self.eat_digits();
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek(), b'e' | b'E')
            && (self.peek_at(1).is_ascii_digit()
                || (matches!(self.peek_at(1), b'+' | b'-') && self.peek_at(2).is_ascii_digit()))
        {
            self.pos += 2;
            self.eat_digits();
        }
        let mut ahead = self.pos;
        while self.source.get(ahead).is_some_and(|b| *b == b' ' || *b == b'\t') {
            ahead += 1;
        }
        let mut base = ahead + 1;
        if matches!(self.source.get(base), Some(b's' | b'S')) {
            base += 1;
        }
        let sized = self.source.get(ahead) == Some(&b'\'')
            && matches!(
                self.source.get(base),
                Some(b'b' | b'B' | b'o' | b'O' | b'd' | b'D' | b'h' | b'H')
            );
        if sized {
            self.pos = ahead;
            let based = self.lex_based_number(self.pos);
            if based.kind == VerilogToken::Error {
                return based;
            }
        }
        self.token(VerilogToken::Number, start)
    }

    /// `'b1010`, `'sh0F`, or the SystemVerilog fill literals `'0 '1 'x 'z`.
    /// A bare `'` is an operator (`'{...}`, casts).
    fn lex_based_number(&mut self, start: usize) -> Token {
        self.pos += 1;
        if matches!(self.peek(), b's' | b'S') {
            self.pos += 1;
        }
        match self.peek() {
            b'b' | b'B' | b'o' | b'O' | b'd' | b'D' | b'h' | b'H' => {
                self.pos += 1;
                while matches!(self.peek(), b' ' | b'\t') {
                    self.pos += 1;
                }
                let digits = self.pos;
                while self.pos < self.source.len() {
                    let ch = self.source[self.pos];
                    if ch.is_ascii_hexdigit() || matches!(ch, b'_' | b'x' | b'X' | b'z' | b'Z' | b'?') {
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                if self.pos == digits {
                    return self.error("based literal has no digits", start);
                }
                self.token(VerilogToken::Number, start)
            }
            b'0' | b'1' | b'x' | b'X' | b'z' | b'Z' if self.pos == start + 1 => {
                self.pos += 1;
                self.token(VerilogToken::Number, start)
            }
            _ => {
                self.pos = start + 1;
                self.token(VerilogToken::Operator, start)
            }
        }
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

    fn lex_operator(&mut self, start: usize) -> Token {
        let b = self.peek();
        let single = match b {
            b'(' => Some(VerilogToken::LeftParen),
            b')' => Some(VerilogToken::RightParen),
            b'[' => Some(VerilogToken::LeftBracket),
            b']' => Some(VerilogToken::RightBracket),
            b'{' => Some(VerilogToken::LeftBrace),
            b'}' => Some(VerilogToken::RightBrace),
            b',' => Some(VerilogToken::Comma),
            b';' => Some(VerilogToken::Semicolon),
            b'#' => Some(VerilogToken::Hash),
            b'.' => Some(VerilogToken::Dot),
            b':' if self.peek_at(1) != b':' => Some(VerilogToken::Colon),
            b'=' if self.peek_at(1) != b'=' => Some(VerilogToken::Equals),
            _ => None,
        };
        if let Some(kind) = single {
            self.pos += 1;
            return self.token(kind, start);
        }

        // comparison and shift operators keep their `=` out of `Equals`
        if matches!(b, b'=' | b'!' | b'<' | b'>') && self.peek_at(1) == b'=' {
            self.pos += 2;
            if self.peek() == b'=' {
                self.pos += 1;
            }
            return self.token(VerilogToken::Operator, start);
        }
        if b == b':' {
            self.pos += 2;
            return self.token(VerilogToken::Operator, start);
        }
        if b"+-*/%&|^~!<>?@".contains(&b) {
            self.pos += 1;
            return self.token(VerilogToken::Operator, start);
        }

        let len = utf8_len(b);
        self.pos = (self.pos + len).min(self.source.len());
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        self.error(format!("unexpected character '{text}'"), start)
    }
}

fn utf8_len(first: u8) -> usize {
    match first {
        0xF0..=0xF7 => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str, version: LanguageVersion) -> Vec<VerilogToken> {
        lex(src, FileId::from_raw(0), version)
            .tokens
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn module_header() {
        assert_eq!(
            kinds("module m (input a);", LanguageVersion::Verilog2005),
            vec![
                VerilogToken::Module,
                VerilogToken::Identifier,
                VerilogToken::LeftParen,
                VerilogToken::Input,
                VerilogToken::Identifier,
                VerilogToken::RightParen,
                VerilogToken::Semicolon,
                VerilogToken::Eof,
            ]
        );
    }

    #[test]
    fn keywords_follow_revision() {
        let v = kinds("logic wire Module", LanguageVersion::Verilog2005);
        assert_eq!(
            v,
            vec![
                VerilogToken::Identifier,
                VerilogToken::Keyword,
                VerilogToken::Identifier,
                VerilogToken::Eof
            ]
        );
        let sv = kinds("logic interface", LanguageVersion::SystemVerilog2012);
        assert_eq!(sv[0], VerilogToken::Keyword);
        assert_eq!(sv[1], VerilogToken::Interface);
    }

    #[test]
    fn numbers() {
        let src = "8'hFF 4'b10_x1 'd7 32 '0 1.5e3 8 'h1";
        let out = lex(src, FileId::from_raw(0), LanguageVersion::SystemVerilog2017);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        let texts: Vec<_> = out
            .tokens
            .iter()
            .filter(|t| t.kind == VerilogToken::Number)
            .map(|t| t.span.slice(src))
            .collect();
        assert_eq!(texts, vec!["8'hFF", "4'b10_x1", "'d7", "32", "'0", "1.5e3", "8 'h1"]);
    }

    #[test]
    fn comments_and_blank_lines() {
        let src = "// own line\na, // after code\n\n/* block */ b";
        let out = lex(src, FileId::from_raw(0), LanguageVersion::Verilog2001);
        let v: Vec<_> = out.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            v,
            vec![
                VerilogToken::Comment,
                VerilogToken::Identifier,
                VerilogToken::Comma,
                VerilogToken::TrailingComment,
                VerilogToken::BlankLine,
                VerilogToken::BlockComment,
                VerilogToken::Identifier,
                VerilogToken::Eof,
            ]
        );
        assert_eq!(out.tokens[0].span.slice(src), "own line");
        assert_eq!(out.tokens[3].span.slice(src), "after code");
    }

    #[test]
    fn equals_and_comparisons() {
        let v = kinds("a = b == c <= d", LanguageVersion::Verilog2005);
        assert_eq!(
            v,
            vec![
                VerilogToken::Identifier,
                VerilogToken::Equals,
                VerilogToken::Identifier,
                VerilogToken::Operator,
                VerilogToken::Identifier,
                VerilogToken::Operator,
                VerilogToken::Identifier,
                VerilogToken::Eof,
            ]
        );
    }

    #[test]
    fn directives_and_special_names() {
        let src = "`timescale 1ns/1ps\n\\bus[0] $clog2";
        let v = kinds(src, LanguageVersion::Verilog2005);
        assert_eq!(
            v,
            vec![
                VerilogToken::Directive,
                VerilogToken::EscapedIdentifier,
                VerilogToken::SystemIdentifier,
                VerilogToken::Eof,
            ]
        );
    }

    #[test]
    fn errors_are_recorded() {
        let out = lex("\"open\nmodule", FileId::from_raw(0), LanguageVersion::Verilog2005);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].message, "unterminated string literal");
        assert_eq!(out.tokens[1].kind, VerilogToken::Module);
    }
}
