//! Expansion of raw interface items into generics and ports.
//!
//! An item with `n` names yields `n` records carrying identical type,
//! constraint and default text. Texts are stored verbatim; nothing is
//! evaluated here.

use crate::entity::{Generic, Port, PortDirection};
use crate::interface::{InterfaceContext, InterfaceItem, SourceText};
use hdlio_source::{Location, Span};

/// An interface item that cannot become a generic or port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The word in mode position is not a mode.
    #[error("unrecognized mode '{mode}' for '{name}'")]
    UnknownMode {
        /// The offending word.
        mode: String,
        /// First name of the item.
        name: String,
        /// Span of the word.
        span: Span,
        /// Position of the word.
        location: Location,
    },
    /// A primary port item without a mode.
    #[error("port '{name}' must declare a mode (in, out, inout, buffer or linkage)")]
    MissingMode {
        /// First name of the item.
        name: String,
        /// Span of the name.
        span: Span,
        /// Position of the name.
        location: Location,
    },
    /// A generic item with a mode other than `in`.
    #[error("generic '{name}' cannot have mode '{mode}'")]
    ModeNotAllowed {
        /// The offending mode.
        mode: String,
        /// First name of the item.
        name: String,
        /// Span of the mode.
        span: Span,
        /// Position of the mode.
        location: Location,
    },
    /// An item whose identifier list is empty.
    #[error("interface item has no names")]
    NoNames {
        /// Span of the item.
        span: Span,
    },
}

impl BuildError {
    /// Where the problem is.
    pub fn span(&self) -> Span {
        match self {
            BuildError::UnknownMode { span, .. }
            | BuildError::MissingMode { span, .. }
            | BuildError::ModeNotAllowed { span, .. }
            | BuildError::NoNames { span } => *span,
        }
    }

    /// Position of the problem, if known.
    pub fn location(&self) -> Option<Location> {
        match self {
            BuildError::UnknownMode { location, .. }
            | BuildError::MissingMode { location, .. }
            | BuildError::ModeNotAllowed { location, .. } => Some(*location),
            BuildError::NoNames { .. } => None,
        }
    }
}

fn first_name(item: &InterfaceItem) -> Result<&SourceText, BuildError> {
    item.names
        .first()
        .ok_or(BuildError::NoNames { span: item.span })
}

fn resolve_direction(
    item: &InterfaceItem,
    context: InterfaceContext,
) -> Result<PortDirection, BuildError> {
    let name = first_name(item)?;
    match &item.mode {
        Some(mode) => {
            PortDirection::from_keyword(&mode.text).ok_or_else(|| BuildError::UnknownMode {
                mode: mode.text.clone(),
                name: name.text.clone(),
                span: mode.span,
                location: mode.location,
            })
        }
        None if context.requires_mode() => Err(BuildError::MissingMode {
            name: name.text.clone(),
            span: name.span,
            location: name.location,
        }),
        None => Ok(PortDirection::In),
    }
}

/// Builds the ports of a port clause, in declaration order.
pub fn build_ports(
    items: &[InterfaceItem],
    context: InterfaceContext,
) -> Result<Vec<Port>, BuildError> {
    let mut ports = Vec::new();
    for item in items {
        let direction = resolve_direction(item, context)?;
        ports.extend(item.names.iter().map(|name| Port {
            name: name.text.clone(),
            direction,
            subtype: item.subtype.clone(),
            constraint: item.constraint.clone(),
            default_value: item.default.clone(),
            span: name.span,
            location: name.location,
        }));
    }
    Ok(ports)
}

/// Builds the generics of a generic clause, in declaration order.
///
/// Generic constants may say `in`; any other mode is an error.
pub fn build_generics(items: &[InterfaceItem]) -> Result<Vec<Generic>, BuildError> {
    let mut generics = Vec::new();
    for item in items {
        let name = first_name(item)?;
        if let Some(mode) = &item.mode {
            match PortDirection::from_keyword(&mode.text) {
                Some(PortDirection::In) => {}
                Some(_) => {
                    return Err(BuildError::ModeNotAllowed {
                        mode: mode.text.clone(),
                        name: name.text.clone(),
                        span: mode.span,
                        location: mode.location,
                    })
                }
                None => {
                    return Err(BuildError::UnknownMode {
                        mode: mode.text.clone(),
                        name: name.text.clone(),
                        span: mode.span,
                        location: mode.location,
                    })
                }
            }
        }
        let subtype = match &item.constraint {
            Some(c) if c.starts_with('(') => format!("{}{c}", item.subtype),
            Some(c) => format!("{} {c}", item.subtype),
            None => item.subtype.clone(),
        };
        generics.extend(item.names.iter().map(|name| Generic {
            name: name.text.clone(),
            subtype: subtype.clone(),
            default_value: item.default.clone(),
            class: item.class,
            span: name.span,
            location: name.location,
        }));
    }
    Ok(generics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::GenericClass;

    fn text(s: &str) -> SourceText {
        SourceText::new(s, Span::DUMMY, Location::START)
    }

    fn item(names: &[&str], mode: Option<&str>, subtype: &str) -> InterfaceItem {
        InterfaceItem {
            names: names.iter().map(|n| text(n)).collect(),
            mode: mode.map(text),
            class: GenericClass::Constant,
            subtype: subtype.to_string(),
            constraint: None,
            default: None,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn identifier_list_expands_in_order() {
        let mut it = item(&["a", "b"], Some("in"), "std_logic_vector");
        it.constraint = Some("(WIDTH-1 downto 0)".into());
        let ports = build_ports(&[it], InterfaceContext::EntityPorts).unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].name, "a");
        assert_eq!(ports[1].name, "b");
        assert_eq!(ports[0].direction, ports[1].direction);
        assert_eq!(ports[0].subtype, ports[1].subtype);
        assert_eq!(ports[1].constraint.as_deref(), Some("(WIDTH-1 downto 0)"));
    }

    #[test]
    fn mode_is_case_insensitive() {
        let ports = build_ports(
            &[item(&["x"], Some("OUT"), "bit"), item(&["y"], Some("Buffer"), "bit")],
            InterfaceContext::EntityPorts,
        )
        .unwrap();
        assert_eq!(ports[0].direction, PortDirection::Out);
        assert_eq!(ports[1].direction, PortDirection::Buffer);
    }

    #[test]
    fn unknown_mode_is_error() {
        let err = build_ports(
            &[item(&["clk"], Some("sideways"), "bit")],
            InterfaceContext::EntityPorts,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::UnknownMode { ref mode, .. } if mode == "sideways"));
        assert_eq!(err.to_string(), "unrecognized mode 'sideways' for 'clk'");
    }

    #[test]
    fn entity_port_needs_mode() {
        let err = build_ports(&[item(&["clk"], None, "bit")], InterfaceContext::EntityPorts)
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingMode { .. }));
    }

    #[test]
    fn component_port_defaults_to_in() {
        let ports =
            build_ports(&[item(&["clk"], None, "bit")], InterfaceContext::ComponentPorts).unwrap();
        assert_eq!(ports[0].direction, PortDirection::In);
    }

    #[test]
    fn generics_keep_raw_default() {
        let mut it = item(&["WIDTH", "DEPTH"], None, "integer");
        it.default = Some("8".into());
        let generics = build_generics(&[it]).unwrap();
        assert_eq!(generics.len(), 2);
        assert_eq!(generics[1].name, "DEPTH");
        assert_eq!(generics[1].default_value.as_deref(), Some("8"));
        assert_eq!(generics[0].subtype, "integer");
    }

    #[test]
    fn generic_subtype_includes_constraint() {
        let mut it = item(&["N"], None, "natural");
        it.constraint = Some("range 1 to 16".into());
        let generics = build_generics(&[it]).unwrap();
        assert_eq!(generics[0].subtype, "natural range 1 to 16");
    }

    #[test]
    fn generic_mode_rules() {
        assert!(build_generics(&[item(&["G"], Some("in"), "integer")]).is_ok());
        assert!(matches!(
            build_generics(&[item(&["G"], Some("out"), "integer")]),
            Err(BuildError::ModeNotAllowed { .. })
        ));
        assert!(matches!(
            build_generics(&[item(&["G"], Some("up"), "integer")]),
            Err(BuildError::UnknownMode { .. })
        ));
    }

    #[test]
    fn empty_names_rejected() {
        assert!(matches!(
            build_ports(&[item(&[], Some("in"), "bit")], InterfaceContext::EntityPorts),
            Err(BuildError::NoNames { .. })
        ));
    }
}
