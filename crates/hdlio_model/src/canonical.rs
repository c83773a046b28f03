//! The canonical entity model.
//!
//! Unlike the parser's [`Entity`](hdlio_ast::Entity), which keeps generic
//! defaults as raw text, the canonical model classifies every default into
//! an [`Expression`] and gives port groups their members by value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified default value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    /// A decimal integer, optionally negative.
    IntegerLiteral(i64),
    /// A double-quoted string; the value excludes the quotes.
    StringLiteral(String),
    /// Anything else, kept as written.
    EnumerationLiteral(String),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::IntegerLiteral(value) => write!(f, "{value}"),
            Expression::StringLiteral(value) => write!(f, "\"{value}\""),
            Expression::EnumerationLiteral(value) => f.write_str(value),
        }
    }
}

/// Port mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// `in`
    In,
    /// `out`
    Out,
    /// `inout`
    InOut,
    /// `buffer`
    Buffer,
    /// `linkage`
    Linkage,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::In => "in",
            Mode::Out => "out",
            Mode::InOut => "inout",
            Mode::Buffer => "buffer",
            Mode::Linkage => "linkage",
        })
    }
}

/// One generic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericItem {
    /// Name as written.
    pub identifier: String,
    /// Full subtype indication.
    pub subtype: String,
    /// The classified default, if the generic has one.
    pub default_expression: Option<Expression>,
}

/// One port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortItem {
    /// Name as written.
    pub identifier: String,
    /// Direction.
    pub mode: Mode,
    /// Full subtype indication, type mark plus constraint.
    pub subtype: String,
}

/// A labelled or unlabelled run of ports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPortGroup {
    /// Label, if the source gave one.
    pub name: Option<String>,
    /// Members in declaration order.
    pub port_items: Vec<PortItem>,
}

/// A converted entity or module interface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    /// Entity name as written.
    pub identifier: String,
    /// Generics in declaration order.
    pub generic_items: Vec<GenericItem>,
    /// Ports in declaration order.
    pub port_items: Vec<PortItem>,
    /// Port groups in declaration order.
    pub port_groups: Vec<CanonicalPortGroup>,
}

impl CanonicalEntity {
    /// Finds a generic by name, ignoring ASCII case.
    pub fn generic(&self, name: &str) -> Option<&GenericItem> {
        self.generic_items
            .iter()
            .find(|g| g.identifier.eq_ignore_ascii_case(name))
    }

    /// Finds a port by name, ignoring ASCII case.
    pub fn port(&self, name: &str) -> Option<&PortItem> {
        self.port_items
            .iter()
            .find(|p| p.identifier.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_display_keeps_quotes_on_strings() {
        assert_eq!(Expression::IntegerLiteral(-42).to_string(), "-42");
        assert_eq!(Expression::StringLiteral("hello".into()).to_string(), "\"hello\"");
        assert_eq!(Expression::EnumerationLiteral("IDLE".into()).to_string(), "IDLE");
    }

    #[test]
    fn serde_round_trip() {
        let entity = CanonicalEntity {
            identifier: "top".into(),
            generic_items: vec![GenericItem {
                identifier: "WIDTH".into(),
                subtype: "integer".into(),
                default_expression: Some(Expression::IntegerLiteral(8)),
            }],
            port_items: vec![],
            port_groups: vec![],
        };
        let json = serde_json::to_string(&entity).unwrap();
        let back: CanonicalEntity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entity);
        assert!(back.generic("width").is_some());
        assert!(back.port("clk").is_none());
    }
}
