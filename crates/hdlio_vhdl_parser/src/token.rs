//! Token kinds produced by the VHDL lexer.
//!
//! Only the reserved words the design-unit grammar and the body scanner
//! react to get their own kind; every other reserved word of the active
//! revision lexes as [`VhdlToken::Keyword`]. Comments and blank lines are
//! kept in the stream as trivia because port grouping depends on them.

use hdlio_source::{Location, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A VHDL token kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VhdlToken {
    // === Keywords with grammar meaning ===
    /// `alias`
    Alias,
    /// `architecture`
    Architecture,
    /// `attribute`
    Attribute,
    /// `begin`
    Begin,
    /// `block`
    Block,
    /// `body`
    Body,
    /// `buffer`
    Buffer,
    /// `case`
    Case,
    /// `component`
    Component,
    /// `configuration`
    Configuration,
    /// `constant`
    Constant,
    /// `context` (VHDL-2008)
    Context,
    /// `else`
    Else,
    /// `elsif`
    Elsif,
    /// `end`
    End,
    /// `entity`
    Entity,
    /// `file`
    File,
    /// `for`
    For,
    /// `function`
    Function,
    /// `generate`
    Generate,
    /// `generic`
    Generic,
    /// `if`
    If,
    /// `impure`
    Impure,
    /// `in`
    In,
    /// `inout`
    Inout,
    /// `is`
    Is,
    /// `library`
    Library,
    /// `linkage`
    Linkage,
    /// `loop`
    Loop,
    /// `new`
    New,
    /// `of`
    Of,
    /// `out`
    Out,
    /// `package`
    Package,
    /// `port`
    Port,
    /// `procedure`
    Procedure,
    /// `process`
    Process,
    /// `protected` (VHDL-2000)
    Protected,
    /// `pure`
    Pure,
    /// `range`
    Range,
    /// `record`
    Record,
    /// `shared`
    Shared,
    /// `signal`
    Signal,
    /// `subtype`
    Subtype,
    /// `then`
    Then,
    /// `type`
    Type,
    /// `units`
    Units,
    /// `use`
    Use,
    /// `variable`
    Variable,
    /// `view` (VHDL-2019)
    View,
    /// Any other reserved word of the active revision.
    Keyword,

    // === Literals ===
    /// Integer or based integer literal.
    IntLiteral,
    /// Real literal.
    RealLiteral,
    /// Character literal, e.g. `'1'`.
    CharLiteral,
    /// String literal.
    StringLiteral,
    /// Bit-string literal, e.g. `X"FF"`.
    BitStringLiteral,

    // === Punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `:=`
    ColonEquals,
    /// `.`
    Dot,
    /// `'` used for attributes and qualified expressions.
    Tick,
    /// `=>`
    Arrow,
    /// `<=`
    LessEquals,
    /// `<>`
    Box,
    /// Any other operator or delimiter.
    Operator,

    // === Names ===
    /// A basic identifier.
    Identifier,
    /// An extended identifier, e.g. `\my signal\`.
    ExtendedIdentifier,

    // === Trivia ===
    /// A `--` comment alone on its line.
    Comment,
    /// A `--` comment after code on the same line.
    TrailingComment,
    /// A `/* ... */` comment.
    BlockComment,
    /// One or more fully blank lines between two tokens.
    BlankLine,

    // === Special ===
    /// End of input.
    Eof,
    /// A malformed token; the lexer recorded a [`LexError`](crate::lexer::LexError).
    Error,
}

impl VhdlToken {
    /// Returns `true` for comments and blank-line markers.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            VhdlToken::Comment
                | VhdlToken::TrailingComment
                | VhdlToken::BlockComment
                | VhdlToken::BlankLine
        )
    }

    /// Returns `true` for identifiers of either form.
    pub fn is_identifier(self) -> bool {
        matches!(self, VhdlToken::Identifier | VhdlToken::ExtendedIdentifier)
    }

    /// Returns `true` for the four keywords that start a library unit.
    pub fn starts_library_unit(self) -> bool {
        matches!(
            self,
            VhdlToken::Entity
                | VhdlToken::Architecture
                | VhdlToken::Package
                | VhdlToken::Configuration
        )
    }

    /// Returns `true` for port mode keywords.
    pub fn is_mode(self) -> bool {
        matches!(
            self,
            VhdlToken::In
                | VhdlToken::Out
                | VhdlToken::Inout
                | VhdlToken::Buffer
                | VhdlToken::Linkage
        )
    }

    /// A short description for "expected X, found Y" messages.
    pub fn describe(self) -> &'static str {
        match self {
            VhdlToken::Keyword => "keyword",
            VhdlToken::IntLiteral | VhdlToken::RealLiteral => "numeric literal",
            VhdlToken::CharLiteral => "character literal",
            VhdlToken::StringLiteral => "string literal",
            VhdlToken::BitStringLiteral => "bit-string literal",
            VhdlToken::LeftParen => "'('",
            VhdlToken::RightParen => "')'",
            VhdlToken::Comma => "','",
            VhdlToken::Semicolon => "';'",
            VhdlToken::Colon => "':'",
            VhdlToken::ColonEquals => "':='",
            VhdlToken::Dot => "'.'",
            VhdlToken::Tick => "'''",
            VhdlToken::Arrow => "'=>'",
            VhdlToken::LessEquals => "'<='",
            VhdlToken::Box => "'<>'",
            VhdlToken::Operator => "operator",
            VhdlToken::Identifier | VhdlToken::ExtendedIdentifier => "identifier",
            VhdlToken::Comment | VhdlToken::TrailingComment | VhdlToken::BlockComment => {
                "comment"
            }
            VhdlToken::BlankLine => "blank line",
            VhdlToken::Eof => "end of file",
            VhdlToken::Error => "invalid token",
            _ => "keyword",
        }
    }
}

impl fmt::Display for VhdlToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexed token.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// Token kind.
    pub kind: VhdlToken,
    /// Source range. For comments this covers the trimmed comment text.
    pub span: Span,
    /// 1-based position of `span.start`.
    pub location: Location,
}

/// Maps a lowercase reserved word to its dedicated kind.
///
/// Returns `None` for reserved words without grammar meaning here; the
/// lexer turns those into [`VhdlToken::Keyword`]. Whether a word is
/// reserved at all depends on the revision and is decided before this call.
pub fn lookup_keyword(s: &str) -> Option<VhdlToken> {
    let kind = match s {
        "alias" => VhdlToken::Alias,
        "architecture" => VhdlToken::Architecture,
        "attribute" => VhdlToken::Attribute,
        "begin" => VhdlToken::Begin,
        "block" => VhdlToken::Block,
        "body" => VhdlToken::Body,
        "buffer" => VhdlToken::Buffer,
        "case" => VhdlToken::Case,
        "component" => VhdlToken::Component,
        "configuration" => VhdlToken::Configuration,
        "constant" => VhdlToken::Constant,
        "context" => VhdlToken::Context,
        "else" => VhdlToken::Else,
        "elsif" => VhdlToken::Elsif,
        "end" => VhdlToken::End,
        "entity" => VhdlToken::Entity,
        "file" => VhdlToken::File,
        "for" => VhdlToken::For,
        "function" => VhdlToken::Function,
        "generate" => VhdlToken::Generate,
        "generic" => VhdlToken::Generic,
        "if" => VhdlToken::If,
        "impure" => VhdlToken::Impure,
        "in" => VhdlToken::In,
        "inout" => VhdlToken::Inout,
        "is" => VhdlToken::Is,
        "library" => VhdlToken::Library,
        "linkage" => VhdlToken::Linkage,
        "loop" => VhdlToken::Loop,
        "new" => VhdlToken::New,
        "of" => VhdlToken::Of,
        "out" => VhdlToken::Out,
        "package" => VhdlToken::Package,
        "port" => VhdlToken::Port,
        "procedure" => VhdlToken::Procedure,
        "process" => VhdlToken::Process,
        "protected" => VhdlToken::Protected,
        "pure" => VhdlToken::Pure,
        "range" => VhdlToken::Range,
        "record" => VhdlToken::Record,
        "shared" => VhdlToken::Shared,
        "signal" => VhdlToken::Signal,
        "subtype" => VhdlToken::Subtype,
        "then" => VhdlToken::Then,
        "type" => VhdlToken::Type,
        "units" => VhdlToken::Units,
        "use" => VhdlToken::Use,
        "variable" => VhdlToken::Variable,
        "view" => VhdlToken::View,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_kinds() {
        assert!(VhdlToken::Comment.is_trivia());
        assert!(VhdlToken::BlankLine.is_trivia());
        assert!(!VhdlToken::Semicolon.is_trivia());
    }

    #[test]
    fn library_unit_starters() {
        for kind in [
            VhdlToken::Entity,
            VhdlToken::Architecture,
            VhdlToken::Package,
            VhdlToken::Configuration,
        ] {
            assert!(kind.starts_library_unit());
        }
        assert!(!VhdlToken::Library.starts_library_unit());
    }

    #[test]
    fn lookup() {
        assert_eq!(lookup_keyword("entity"), Some(VhdlToken::Entity));
        assert_eq!(lookup_keyword("downto"), None);
        assert_eq!(lookup_keyword("my_signal"), None);
    }

    #[test]
    fn modes() {
        assert!(VhdlToken::Linkage.is_mode());
        assert!(!VhdlToken::Identifier.is_mode());
    }
}
