//! Indented text reports of entity interfaces.
//!
//! Reports work on either a parsed [`Entity`] or a converted
//! [`CanonicalEntity`] through [`ReportableEntity`]. Both render the same
//! layout:
//!
//! ```text
//! Entity: counter
//!   Generics:
//!       - WIDTH: integer = 8
//!   Ports (flat):
//!       - clk: in std_logic
//!   Ports (grouped):
//!     Group 1: Clock
//!       - clk: in std_logic
//! ```

use crate::canonical::{CanonicalEntity, PortItem};
use hdlio_ast::{Entity, Port};
use std::fmt::Write;

/// Text for a missing type or name.
const UNKNOWN: &str = "unknown";

/// An entity in either representation.
#[derive(Clone, Copy, Debug)]
pub enum ReportableEntity<'a> {
    /// A parsed entity or module.
    Ast(&'a Entity),
    /// A converted entity.
    Canonical(&'a CanonicalEntity),
}

impl<'a> From<&'a Entity> for ReportableEntity<'a> {
    fn from(entity: &'a Entity) -> Self {
        ReportableEntity::Ast(entity)
    }
}

impl<'a> From<&'a CanonicalEntity> for ReportableEntity<'a> {
    fn from(entity: &'a CanonicalEntity) -> Self {
        ReportableEntity::Canonical(entity)
    }
}

struct GroupRows {
    label: Option<String>,
    ports: Vec<String>,
}

impl ReportableEntity<'_> {
    /// The entity name.
    pub fn name(&self) -> &str {
        match self {
            ReportableEntity::Ast(e) => e.name(),
            ReportableEntity::Canonical(e) => &e.identifier,
        }
    }

    fn generic_rows(&self) -> Vec<String> {
        match self {
            ReportableEntity::Ast(e) => e
                .generics()
                .iter()
                .map(|g| {
                    let default = g.default_value.as_deref().filter(|d| !d.is_empty());
                    generic_row(&g.name, &g.subtype, default)
                })
                .collect(),
            ReportableEntity::Canonical(e) => e
                .generic_items
                .iter()
                .map(|g| {
                    let default = g.default_expression.as_ref().map(ToString::to_string);
                    generic_row(&g.identifier, &g.subtype, default.as_deref())
                })
                .collect(),
        }
    }

    fn port_rows(&self) -> Vec<String> {
        match self {
            ReportableEntity::Ast(e) => e.ports().iter().map(ast_port_row).collect(),
            ReportableEntity::Canonical(e) => e.port_items.iter().map(canonical_port_row).collect(),
        }
    }

    fn group_rows(&self) -> Vec<GroupRows> {
        match self {
            ReportableEntity::Ast(e) => e
                .grouped_ports()
                .map(|g| GroupRows {
                    label: g.name.map(str::to_string),
                    ports: g.ports.iter().map(ast_port_row).collect(),
                })
                .collect(),
            ReportableEntity::Canonical(e) => e
                .port_groups
                .iter()
                .map(|g| GroupRows {
                    label: g.name.clone(),
                    ports: g.port_items.iter().map(canonical_port_row).collect(),
                })
                .collect(),
        }
    }
}

fn or_unknown(text: &str) -> &str {
    if text.is_empty() {
        UNKNOWN
    } else {
        text
    }
}

fn generic_row(name: &str, subtype: &str, default: Option<&str>) -> String {
    let mut row = format!("- {}: {}", or_unknown(name), or_unknown(subtype));
    if let Some(default) = default {
        let _ = write!(row, " = {default}");
    }
    row
}

fn ast_port_row(port: &Port) -> String {
    format!(
        "- {}: {} {}",
        or_unknown(&port.name),
        port.direction,
        or_unknown(&port.type_text())
    )
}

fn canonical_port_row(port: &PortItem) -> String {
    format!(
        "- {}: {} {}",
        or_unknown(&port.identifier),
        port.mode,
        or_unknown(&port.subtype)
    )
}

fn section(title: &str, rows: Vec<String>, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = format!("{pad}{title}:");
    if rows.is_empty() {
        let _ = write!(out, "\n{pad}    None");
    }
    for row in rows {
        let _ = write!(out, "\n{pad}    {row}");
    }
    out
}

/// The `Generics:` section.
pub fn report_generics(entity: ReportableEntity<'_>, indent: usize) -> String {
    section("Generics", entity.generic_rows(), indent)
}

/// The `Ports (flat):` section.
pub fn report_ports_flat(entity: ReportableEntity<'_>, indent: usize) -> String {
    section("Ports (flat)", entity.port_rows(), indent)
}

/// The `Ports (grouped):` section. Groups are numbered from 1; a labelled
/// group shows its label after the number.
pub fn report_ports_grouped(entity: ReportableEntity<'_>, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let groups = entity.group_rows();
    let mut out = format!("{pad}Ports (grouped):");
    if groups.is_empty() {
        let _ = write!(out, "\n{pad}    None");
    }
    for (i, group) in groups.into_iter().enumerate() {
        let _ = write!(out, "\n{pad}  Group {}:", i + 1);
        if let Some(label) = group.label {
            let _ = write!(out, " {label}");
        }
        for row in group.ports {
            let _ = write!(out, "\n{pad}    {row}");
        }
    }
    out
}

/// The full report of one entity: name line, then every section indented
/// two further spaces.
pub fn report_entity(entity: ReportableEntity<'_>, indent: usize) -> String {
    let pad = " ".repeat(indent);
    [
        format!("{pad}Entity: {}", entity.name()),
        report_generics(entity, indent + 2),
        report_ports_flat(entity, indent + 2),
        report_ports_grouped(entity, indent + 2),
    ]
    .join("\n")
}

/// Reports every entity, or `No entities found.` for an empty slice.
pub fn report_entities(entities: &[ReportableEntity<'_>]) -> String {
    if entities.is_empty() {
        return "No entities found.".to_string();
    }
    entities
        .iter()
        .map(|e| report_entity(*e, 0))
        .collect::<Vec<_>>()
        .join("\n")
}
