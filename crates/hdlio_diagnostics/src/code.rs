//! Stable diagnostic codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a code, which determines its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Prefixed with `E`.
    Error,
    /// Prefixed with `W`.
    Warning,
}

impl Category {
    /// The prefix letter.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A category plus a number, displayed as e.g. `E101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Prefix category.
    pub category: Category,
    /// Number within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Malformed token (unterminated literal, stray character).
    pub const LEXICAL: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);
    /// Grammar error inside a design unit.
    pub const SYNTAX: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
    /// Interface item could not be turned into a port or generic.
    pub const CONSTRUCTION: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
    /// Construct unavailable in the selected revision, rejected by policy.
    pub const VERSION_REJECTED: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);
    /// Token at file scope that cannot start a design unit.
    pub const UNEXPECTED_TOP_LEVEL: DiagnosticCode = DiagnosticCode::new(Category::Error, 104);
    /// Construct unavailable in the selected revision, accepted with a warning.
    pub const VERSION_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);
    /// Closing label does not repeat the unit name.
    pub const END_LABEL_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Warning, 102);

    /// Creates a code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        assert_eq!(DiagnosticCode::SYNTAX.to_string(), "E101");
        assert_eq!(DiagnosticCode::LEXICAL.to_string(), "E100");
        assert_eq!(DiagnosticCode::END_LABEL_MISMATCH.to_string(), "W102");
        assert_eq!(DiagnosticCode::new(Category::Warning, 3).to_string(), "W003");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&DiagnosticCode::VERSION_REJECTED).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DiagnosticCode::VERSION_REJECTED);
    }
}
