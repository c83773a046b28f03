//! Per-revision reserved words and construct availability.
//!
//! Everything here is a pure lookup over static tables. Each family has a
//! base word list plus the words each later revision adds; a revision's
//! reserved set is the union of its own delta and every older one.

use crate::version::{LanguageFamily, LanguageVersion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const VHDL_1993: &[&str] = &[
    "abs", "access", "after", "alias", "all", "and", "architecture", "array", "assert",
    "attribute", "begin", "block", "body", "buffer", "bus", "case", "component",
    "configuration", "constant", "disconnect", "downto", "else", "elsif", "end", "entity",
    "exit", "file", "for", "function", "generate", "generic", "group", "guarded", "if",
    "impure", "in", "inertial", "inout", "is", "label", "library", "linkage", "literal",
    "loop", "map", "mod", "nand", "new", "next", "nor", "not", "null", "of", "on", "open",
    "or", "others", "out", "package", "port", "postponed", "procedure", "process", "pure",
    "range", "record", "register", "reject", "rem", "report", "return", "rol", "ror",
    "select", "severity", "shared", "signal", "sla", "sll", "sra", "srl", "subtype", "then",
    "to", "transport", "type", "unaffected", "units", "until", "use", "variable", "wait",
    "when", "while", "with", "xnor", "xor",
];

const VHDL_2000: &[&str] = &["protected"];

const VHDL_2008: &[&str] = &[
    "assume", "assume_guarantee", "context", "cover", "default", "fairness", "force",
    "parameter", "property", "release", "restrict", "restrict_guarantee", "sequence",
    "strong", "vmode", "vprop", "vunit",
];

const VHDL_2019: &[&str] = &["private", "view"];

const VERILOG_1995: &[&str] = &[
    "always", "and", "assign", "begin", "buf", "bufif0", "bufif1", "case", "casex", "casez",
    "cmos", "deassign", "default", "defparam", "disable", "edge", "else", "end", "endcase",
    "endfunction", "endmodule", "endprimitive", "endspecify", "endtable", "endtask", "event",
    "for", "force", "forever", "fork", "function", "highz0", "highz1", "if", "ifnone",
    "initial", "inout", "input", "integer", "join", "large", "macromodule", "medium",
    "module", "nand", "negedge", "nmos", "nor", "not", "notif0", "notif1", "or", "output",
    "parameter", "pmos", "posedge", "primitive", "pull0", "pull1", "pulldown", "pullup",
    "rcmos", "real", "realtime", "reg", "release", "repeat", "rnmos", "rpmos", "rtran",
    "rtranif0", "rtranif1", "scalared", "small", "specify", "specparam", "strong0",
    "strong1", "supply0", "supply1", "table", "task", "time", "tran", "tranif0", "tranif1",
    "tri", "tri0", "tri1", "triand", "trior", "trireg", "vectored", "wait", "wand", "weak0",
    "weak1", "while", "wire", "wor", "xnor", "xor",
];

const VERILOG_2001: &[&str] = &[
    "automatic", "cell", "config", "design", "endconfig", "endgenerate", "generate",
    "genvar", "incdir", "include", "instance", "liblist", "library", "localparam",
    "noshowcancelled", "pulsestyle_ondetect", "pulsestyle_onevent", "showcancelled",
    "signed", "unsigned", "use",
];

const VERILOG_2005: &[&str] = &["uwire"];

const SYSTEMVERILOG_2005: &[&str] = &[
    "alias", "always_comb", "always_ff", "always_latch", "assert", "assume", "before",
    "bind", "bins", "binsof", "bit", "break", "byte", "chandle", "class", "clocking",
    "const", "constraint", "context", "continue", "cover", "covergroup", "coverpoint",
    "cross", "dist", "do", "endclass", "endclocking", "endgroup", "endinterface",
    "endpackage", "endprogram", "endproperty", "endsequence", "enum", "expect", "export",
    "extends", "extern", "final", "first_match", "foreach", "forkjoin", "iff",
    "ignore_bins", "illegal_bins", "import", "inside", "int", "interface", "intersect",
    "join_any", "join_none", "local", "logic", "longint", "matches", "modport", "new",
    "null", "package", "packed", "priority", "program", "property", "protected", "pure",
    "rand", "randc", "randcase", "randsequence", "ref", "return", "sequence", "shortint",
    "shortreal", "solve", "static", "string", "struct", "super", "tagged", "this",
    "throughout", "timeprecision", "timeunit", "type", "typedef", "union", "unique", "var",
    "virtual", "void", "wait_order", "wildcard", "with", "within",
];

const SYSTEMVERILOG_2009: &[&str] = &[
    "accept_on", "checker", "endchecker", "eventually", "global", "implies", "let",
    "nexttime", "reject_on", "restrict", "s_always", "s_eventually", "s_nexttime",
    "s_until", "s_until_with", "strong", "sync_accept_on", "sync_reject_on", "unique0",
    "until", "until_with", "untyped", "weak",
];

const SYSTEMVERILOG_2012: &[&str] = &["implements", "interconnect", "nettype", "soft"];

/// Returns the word-list deltas that make up the reserved set of `version`.
fn word_tables(version: LanguageVersion) -> Vec<&'static [&'static str]> {
    use LanguageVersion::*;
    let mut tables = Vec::new();
    match version.family() {
        LanguageFamily::Vhdl => {
            tables.push(VHDL_1993);
            if version >= Vhdl2000 {
                tables.push(VHDL_2000);
            }
            if version >= Vhdl2008 {
                tables.push(VHDL_2008);
            }
            if version >= Vhdl2019 {
                tables.push(VHDL_2019);
            }
        }
        LanguageFamily::Verilog => {
            tables.push(VERILOG_1995);
            if version >= Verilog2001 {
                tables.push(VERILOG_2001);
            }
            if version >= Verilog2005 {
                tables.push(VERILOG_2005);
            }
        }
        LanguageFamily::SystemVerilog => {
            tables.extend([VERILOG_1995, VERILOG_2001, VERILOG_2005, SYSTEMVERILOG_2005]);
            if version >= SystemVerilog2009 {
                tables.push(SYSTEMVERILOG_2009);
            }
            if version >= SystemVerilog2012 {
                tables.push(SYSTEMVERILOG_2012);
            }
        }
    }
    tables
}

/// Returns the full reserved-word set of a revision.
///
/// VHDL words are lowercase; callers must lowercase before comparing.
/// Verilog and SystemVerilog words are case-sensitive.
pub fn reserved_words(version: LanguageVersion) -> BTreeSet<&'static str> {
    word_tables(version)
        .into_iter()
        .flat_map(|t| t.iter().copied())
        .collect()
}

/// Returns `true` if `word` is reserved under `version`.
///
/// Matching is case-insensitive for VHDL and exact for the Verilog family.
pub fn is_reserved(version: LanguageVersion, word: &str) -> bool {
    let lowered;
    let word = if version.family() == LanguageFamily::Vhdl {
        lowered = word.to_ascii_lowercase();
        lowered.as_str()
    } else {
        word
    };
    word_tables(version).iter().any(|t| t.contains(&word))
}

/// A grammar construct whose availability may depend on the revision.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Construct {
    /// `entity <name> is ... end`.
    EntityHeader,
    /// `architecture <name> of <entity> is ... end`.
    ArchitectureHeader,
    /// `package <name> is ... end`.
    PackageHeader,
    /// `package body <name> is ... end`.
    PackageBodyHeader,
    /// `configuration <name> of <entity> is ... end`.
    ConfigurationHeader,
    /// `generic ( ... );`
    GenericClause,
    /// `port ( ... );`
    PortClause,
    /// Integer, real, string, character and bit-string literals.
    BasicLiterals,
    /// `module <name> ... endmodule`.
    ModuleHeader,
    /// `type ... is protected`.
    ProtectedType,
    /// `/* ... */` comments in VHDL.
    BlockComment,
    /// `context lib.ctx;` references and context declarations.
    ContextReference,
    /// `generic (type T)` and subprogram generics.
    GenericTypes,
    /// A generic clause in a package header.
    PackageGenerics,
    /// A `;` after the last interface-list item.
    InterfaceTrailingSemicolon,
    /// `module m (input wire a, ...)` port declarations in the header.
    AnsiPortList,
    /// `module m #(parameter ...)`.
    ParameterPortList,
}

impl Construct {
    /// A short human name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Construct::EntityHeader => "entity declaration",
            Construct::ArchitectureHeader => "architecture body",
            Construct::PackageHeader => "package declaration",
            Construct::PackageBodyHeader => "package body",
            Construct::ConfigurationHeader => "configuration declaration",
            Construct::GenericClause => "generic clause",
            Construct::PortClause => "port clause",
            Construct::BasicLiterals => "literal",
            Construct::ModuleHeader => "module declaration",
            Construct::ProtectedType => "protected type",
            Construct::BlockComment => "block comment",
            Construct::ContextReference => "context reference",
            Construct::GenericTypes => "generic type or subprogram",
            Construct::PackageGenerics => "package generic clause",
            Construct::InterfaceTrailingSemicolon => "trailing ';' in interface list",
            Construct::AnsiPortList => "ANSI-style port list",
            Construct::ParameterPortList => "parameter port list",
        }
    }

    /// The earliest revision of `family` that supports this construct, or
    /// `None` if the family never supports it.
    pub fn introduced_in(self, family: LanguageFamily) -> Option<LanguageVersion> {
        use Construct::*;
        use LanguageVersion::*;
        match family {
            LanguageFamily::Vhdl => match self {
                EntityHeader | ArchitectureHeader | PackageHeader | PackageBodyHeader
                | ConfigurationHeader | GenericClause | PortClause | BasicLiterals => {
                    Some(Vhdl1993)
                }
                ProtectedType => Some(Vhdl2000),
                BlockComment | ContextReference | GenericTypes | PackageGenerics => {
                    Some(Vhdl2008)
                }
                InterfaceTrailingSemicolon => Some(Vhdl2019),
                ModuleHeader | AnsiPortList | ParameterPortList => None,
            },
            LanguageFamily::Verilog => match self {
                ModuleHeader | BasicLiterals => Some(Verilog1995),
                AnsiPortList | ParameterPortList => Some(Verilog2001),
                _ => None,
            },
            LanguageFamily::SystemVerilog => match self {
                ModuleHeader | BasicLiterals | AnsiPortList | ParameterPortList => {
                    Some(SystemVerilog2005)
                }
                PackageHeader => Some(SystemVerilog2005),
                _ => None,
            },
        }
    }
}

/// Returns `true` if `construct` may be used under `version`.
pub fn is_construct_available(version: LanguageVersion, construct: Construct) -> bool {
    construct
        .introduced_in(version.family())
        .is_some_and(|since| version >= since)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMON_VHDL: [Construct; 8] = [
        Construct::EntityHeader,
        Construct::ArchitectureHeader,
        Construct::PackageHeader,
        Construct::PackageBodyHeader,
        Construct::ConfigurationHeader,
        Construct::GenericClause,
        Construct::PortClause,
        Construct::BasicLiterals,
    ];

    #[test]
    fn common_subset_available_in_every_vhdl_revision() {
        for v in LanguageVersion::VHDL {
            for c in COMMON_VHDL {
                assert!(is_construct_available(v, c), "{c:?} missing in {v}");
            }
        }
    }

    #[test]
    fn module_header_available_in_every_verilog_family_revision() {
        for v in LanguageVersion::ALL {
            if v.family() != LanguageFamily::Vhdl {
                assert!(is_construct_available(v, Construct::ModuleHeader));
            }
        }
    }

    #[test]
    fn vhdl_2008_words_are_identifiers_before_2008() {
        for word in ["context", "force", "release", "default", "parameter"] {
            assert!(!is_reserved(LanguageVersion::Vhdl1993, word));
            assert!(!is_reserved(LanguageVersion::Vhdl2000, word));
            assert!(is_reserved(LanguageVersion::Vhdl2008, word));
            assert!(is_reserved(LanguageVersion::Vhdl2019, word));
        }
    }

    #[test]
    fn protected_reserved_from_2000() {
        assert!(!is_reserved(LanguageVersion::Vhdl1993, "protected"));
        assert!(is_reserved(LanguageVersion::Vhdl2000, "protected"));
    }

    #[test]
    fn vhdl_2019_adds_view_and_private() {
        assert!(!is_reserved(LanguageVersion::Vhdl2008, "view"));
        assert!(is_reserved(LanguageVersion::Vhdl2019, "view"));
        assert!(is_reserved(LanguageVersion::Vhdl2019, "private"));
    }

    #[test]
    fn vhdl_matching_is_case_insensitive() {
        assert!(is_reserved(LanguageVersion::Vhdl1993, "ENTITY"));
        assert!(is_reserved(LanguageVersion::Vhdl1993, "Port"));
    }

    #[test]
    fn verilog_matching_is_case_sensitive() {
        assert!(is_reserved(LanguageVersion::Verilog2005, "module"));
        assert!(!is_reserved(LanguageVersion::Verilog2005, "MODULE"));
    }

    #[test]
    fn systemverilog_extends_verilog() {
        assert!(!is_reserved(LanguageVersion::Verilog2005, "logic"));
        assert!(is_reserved(LanguageVersion::SystemVerilog2005, "logic"));
        assert!(is_reserved(LanguageVersion::SystemVerilog2005, "uwire"));
        assert!(!is_reserved(LanguageVersion::SystemVerilog2005, "checker"));
        assert!(is_reserved(LanguageVersion::SystemVerilog2009, "checker"));
        assert!(is_reserved(LanguageVersion::SystemVerilog2017, "nettype"));
    }

    #[test]
    fn reserved_sets_grow_monotonically() {
        let families = [
            &LanguageVersion::ALL[0..4],
            &LanguageVersion::ALL[4..7],
            &LanguageVersion::ALL[7..11],
        ];
        for versions in families {
            for pair in versions.windows(2) {
                let older = reserved_words(pair[0]);
                let newer = reserved_words(pair[1]);
                assert!(older.is_subset(&newer), "{} ⊄ {}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn gated_constructs() {
        assert!(!is_construct_available(
            LanguageVersion::Vhdl1993,
            Construct::BlockComment
        ));
        assert!(is_construct_available(
            LanguageVersion::Vhdl2008,
            Construct::BlockComment
        ));
        assert!(!is_construct_available(
            LanguageVersion::Vhdl2008,
            Construct::InterfaceTrailingSemicolon
        ));
        assert!(is_construct_available(
            LanguageVersion::Vhdl2019,
            Construct::InterfaceTrailingSemicolon
        ));
        assert!(!is_construct_available(
            LanguageVersion::Verilog1995,
            Construct::AnsiPortList
        ));
        assert!(is_construct_available(
            LanguageVersion::Verilog2001,
            Construct::AnsiPortList
        ));
        assert!(!is_construct_available(
            LanguageVersion::Verilog2005,
            Construct::EntityHeader
        ));
    }
}
