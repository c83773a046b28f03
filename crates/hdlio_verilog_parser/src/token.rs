//! Token kinds produced by the Verilog lexer.
//!
//! The module recognizer only needs a handful of reserved words; every
//! other reserved word of the active revision lexes as
//! [`VerilogToken::Keyword`]. Keywords are case-sensitive. Comments and
//! blank lines stay in the stream as trivia for port grouping.

use hdlio_source::{Location, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Verilog or SystemVerilog token kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VerilogToken {
    // === Keywords ===
    /// `module`
    Module,
    /// `macromodule`
    Macromodule,
    /// `endmodule`
    Endmodule,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
    /// `parameter`
    Parameter,
    /// `localparam` (Verilog-2001)
    Localparam,
    /// `function`
    Function,
    /// `endfunction`
    Endfunction,
    /// `task`
    Task,
    /// `endtask`
    Endtask,
    /// `interface` (SystemVerilog)
    Interface,
    /// `endinterface` (SystemVerilog)
    Endinterface,
    /// `package` (SystemVerilog)
    Package,
    /// `endpackage` (SystemVerilog)
    Endpackage,
    /// `class` (SystemVerilog)
    Class,
    /// `endclass` (SystemVerilog)
    Endclass,
    /// `program` (SystemVerilog)
    Program,
    /// `endprogram` (SystemVerilog)
    Endprogram,
    /// `primitive`
    Primitive,
    /// `endprimitive`
    Endprimitive,
    /// `config` (Verilog-2001)
    Config,
    /// `endconfig` (Verilog-2001)
    Endconfig,
    /// `checker` (SystemVerilog-2009)
    Checker,
    /// `endchecker` (SystemVerilog-2009)
    Endchecker,
    /// `type` (SystemVerilog)
    Type,
    /// Any other reserved word.
    Keyword,

    // === Literals ===
    /// Plain, sized or based number (`42`, `8'hFF`, `'0`, `1.5e3`).
    Number,
    /// `"..."`
    StringLiteral,

    // === Punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `#`
    Hash,
    /// `=` (assignment, not comparison)
    Equals,
    /// `.`
    Dot,
    /// Any other operator.
    Operator,

    // === Names ===
    /// `my_signal`
    Identifier,
    /// `\bus+index `
    EscapedIdentifier,
    /// `$clog2`
    SystemIdentifier,

    // === Trivia ===
    /// A `//` comment alone on its line; the span covers the trimmed text.
    Comment,
    /// A `//` comment after code on the same line.
    TrailingComment,
    /// `/* ... */`
    BlockComment,
    /// Two or more consecutive line breaks.
    BlankLine,
    /// A compiler directive line such as `` `timescale 1ns/1ps ``.
    Directive,

    // === Special ===
    /// End of input.
    Eof,
    /// Malformed input.
    Error,
}

impl VerilogToken {
    /// Tokens the parser skips.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            VerilogToken::Comment
                | VerilogToken::TrailingComment
                | VerilogToken::BlockComment
                | VerilogToken::BlankLine
                | VerilogToken::Directive
        )
    }

    /// Plain or escaped identifier.
    pub fn is_identifier(self) -> bool {
        matches!(self, VerilogToken::Identifier | VerilogToken::EscapedIdentifier)
    }

    /// `input`, `output` or `inout`.
    pub fn is_direction(self) -> bool {
        matches!(
            self,
            VerilogToken::Input | VerilogToken::Output | VerilogToken::Inout
        )
    }

    /// `module` or `macromodule`.
    pub fn starts_module(self) -> bool {
        matches!(self, VerilogToken::Module | VerilogToken::Macromodule)
    }

    /// The `end...` keyword closing a top-level block this token opens.
    pub fn closing_keyword(self) -> Option<VerilogToken> {
        let end = match self {
            VerilogToken::Module | VerilogToken::Macromodule => VerilogToken::Endmodule,
            VerilogToken::Interface => VerilogToken::Endinterface,
            VerilogToken::Package => VerilogToken::Endpackage,
            VerilogToken::Class => VerilogToken::Endclass,
            VerilogToken::Program => VerilogToken::Endprogram,
            VerilogToken::Primitive => VerilogToken::Endprimitive,
            VerilogToken::Config => VerilogToken::Endconfig,
            VerilogToken::Checker => VerilogToken::Endchecker,
            VerilogToken::Function => VerilogToken::Endfunction,
            VerilogToken::Task => VerilogToken::Endtask,
            _ => return None,
        };
        Some(end)
    }

    /// A short description for "expected ..., found ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            VerilogToken::Number => "number",
            VerilogToken::StringLiteral => "string literal",
            VerilogToken::LeftParen => "'('",
            VerilogToken::RightParen => "')'",
            VerilogToken::LeftBracket => "'['",
            VerilogToken::RightBracket => "']'",
            VerilogToken::LeftBrace => "'{'",
            VerilogToken::RightBrace => "'}'",
            VerilogToken::Comma => "','",
            VerilogToken::Semicolon => "';'",
            VerilogToken::Colon => "':'",
            VerilogToken::Hash => "'#'",
            VerilogToken::Equals => "'='",
            VerilogToken::Dot => "'.'",
            VerilogToken::Operator => "operator",
            VerilogToken::Identifier | VerilogToken::EscapedIdentifier => "identifier",
            VerilogToken::SystemIdentifier => "system identifier",
            VerilogToken::Comment | VerilogToken::TrailingComment | VerilogToken::BlockComment => {
                "comment"
            }
            VerilogToken::BlankLine => "blank line",
            VerilogToken::Directive => "compiler directive",
            VerilogToken::Eof => "end of file",
            VerilogToken::Error => "invalid token",
            _ => "keyword",
        }
    }
}

impl fmt::Display for VerilogToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexed token.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// Token kind.
    pub kind: VerilogToken,
    /// Source span; the lexeme is the slice it covers.
    pub span: Span,
    /// Position of the first byte.
    pub location: Location,
}

/// Maps a reserved word to its token kind. Returns `None` for words the
/// recognizer does not distinguish.
pub fn lookup_keyword(word: &str) -> Option<VerilogToken> {
    let kind = match word {
        "module" => VerilogToken::Module,
        "macromodule" => VerilogToken::Macromodule,
        "endmodule" => VerilogToken::Endmodule,
        "input" => VerilogToken::Input,
        "output" => VerilogToken::Output,
        "inout" => VerilogToken::Inout,
        "parameter" => VerilogToken::Parameter,
        "localparam" => VerilogToken::Localparam,
        "function" => VerilogToken::Function,
        "endfunction" => VerilogToken::Endfunction,
        "task" => VerilogToken::Task,
        "endtask" => VerilogToken::Endtask,
        "interface" => VerilogToken::Interface,
        "endinterface" => VerilogToken::Endinterface,
        "package" => VerilogToken::Package,
        "endpackage" => VerilogToken::Endpackage,
        "class" => VerilogToken::Class,
        "endclass" => VerilogToken::Endclass,
        "program" => VerilogToken::Program,
        "endprogram" => VerilogToken::Endprogram,
        "primitive" => VerilogToken::Primitive,
        "endprimitive" => VerilogToken::Endprimitive,
        "config" => VerilogToken::Config,
        "endconfig" => VerilogToken::Endconfig,
        "checker" => VerilogToken::Checker,
        "endchecker" => VerilogToken::Endchecker,
        "type" => VerilogToken::Type,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        assert_eq!(lookup_keyword("module"), Some(VerilogToken::Module));
        assert_eq!(lookup_keyword("Module"), None);
        assert_eq!(lookup_keyword("wire"), None);
    }

    #[test]
    fn closing_keywords() {
        assert_eq!(
            VerilogToken::Macromodule.closing_keyword(),
            Some(VerilogToken::Endmodule)
        );
        assert_eq!(
            VerilogToken::Class.closing_keyword(),
            Some(VerilogToken::Endclass)
        );
        assert_eq!(VerilogToken::Input.closing_keyword(), None);
    }

    #[test]
    fn trivia_kinds() {
        assert!(VerilogToken::Directive.is_trivia());
        assert!(VerilogToken::TrailingComment.is_trivia());
        assert!(!VerilogToken::Identifier.is_trivia());
    }
}
