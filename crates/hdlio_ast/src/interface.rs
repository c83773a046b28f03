//! Raw interface-list records handed from a dialect parser to the builder.

use crate::entity::GenericClass;
use hdlio_source::{Location, Span};

/// A piece of source text together with where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
    /// The text exactly as written.
    pub text: String,
    /// Where it came from.
    pub span: Span,
    /// Position of `span.start`.
    pub location: Location,
}

impl SourceText {
    /// Creates a located text.
    pub fn new(text: impl Into<String>, span: Span, location: Location) -> Self {
        Self {
            text: text.into(),
            span,
            location,
        }
    }
}

/// One `names : [mode] subtype [constraint] [:= default]` item of a generic
/// or port clause, before any interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceItem {
    /// The identifier list, in order.
    pub names: Vec<SourceText>,
    /// The word in mode position, if any. Not yet validated.
    pub mode: Option<SourceText>,
    /// Object class of a generic item.
    pub class: GenericClass,
    /// Raw type mark.
    pub subtype: String,
    /// Raw constraint text, trimmed.
    pub constraint: Option<String>,
    /// Raw default expression text, trimmed.
    pub default: Option<String>,
    /// Span of the whole item.
    pub span: Span,
}

/// Where an interface list appears, which decides how modes are checked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum InterfaceContext {
    /// `generic (...)` of an entity, package or module.
    EntityGenerics,
    /// `port (...)` of an entity or module. Every item needs a mode.
    EntityPorts,
    /// `generic (...)` of a component declaration.
    ComponentGenerics,
    /// `port (...)` of a component declaration. A missing mode means `in`.
    ComponentPorts,
}

impl InterfaceContext {
    /// Returns `true` for port lists.
    pub fn is_port_list(self) -> bool {
        matches!(
            self,
            InterfaceContext::EntityPorts | InterfaceContext::ComponentPorts
        )
    }

    /// Returns `true` if a port item must spell out its mode.
    pub fn requires_mode(self) -> bool {
        self == InterfaceContext::EntityPorts
    }
}
