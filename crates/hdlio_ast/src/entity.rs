//! Entities and their interface: generics, ports and port groups.

use hdlio_common::{HdlResult, InternalError};
use hdlio_source::{Location, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
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

impl PortDirection {
    /// Parses a mode keyword, ignoring ASCII case.
    pub fn from_keyword(word: &str) -> Option<PortDirection> {
        let dir = match word.to_ascii_lowercase().as_str() {
            "in" => PortDirection::In,
            "out" => PortDirection::Out,
            "inout" => PortDirection::InOut,
            "buffer" => PortDirection::Buffer,
            "linkage" => PortDirection::Linkage,
            _ => return None,
        };
        Some(dir)
    }

    /// The lowercase keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            PortDirection::In => "in",
            PortDirection::Out => "out",
            PortDirection::InOut => "inout",
            PortDirection::Buffer => "buffer",
            PortDirection::Linkage => "linkage",
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of object a generic declares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericClass {
    /// A generic constant, the only class before VHDL-2008.
    #[default]
    Constant,
    /// `type T`
    Type,
    /// `package P is new ...`
    Package,
    /// `function f ...` or `procedure p ...`
    Subprogram,
}

/// One generic of an entity, component or package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generic {
    /// Generic name as written.
    pub name: String,
    /// Raw subtype indication (empty for type generics).
    pub subtype: String,
    /// Raw text after `:=`, trimmed.
    pub default_value: Option<String>,
    /// Constant, type, package or subprogram.
    pub class: GenericClass,
    /// Span of the name.
    pub span: Span,
    /// Position of the name.
    pub location: Location,
}

/// One port of an entity, component or module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port name as written.
    pub name: String,
    /// Normalized direction.
    pub direction: PortDirection,
    /// Raw type mark, without any constraint.
    pub subtype: String,
    /// Raw index or range constraint, e.g. `(7 downto 0)`.
    pub constraint: Option<String>,
    /// Raw text after `:=`, trimmed.
    pub default_value: Option<String>,
    /// Span of the name.
    pub span: Span,
    /// Position of the name.
    pub location: Location,
}

impl Port {
    /// The complete subtype indication, type mark plus constraint.
    pub fn type_text(&self) -> String {
        match &self.constraint {
            Some(c) if c.starts_with('(') => format!("{}{}", self.subtype, c),
            Some(c) if self.subtype.is_empty() => c.clone(),
            Some(c) => format!("{} {}", self.subtype, c),
            None => self.subtype.clone(),
        }
    }
}

/// A contiguous run of an entity's ports, optionally labelled.
///
/// Groups do not own ports; they hold an index range into
/// [`Entity::ports`]. Use [`Entity::group_ports`] or
/// [`Entity::grouped_ports`] to see the members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortGroup {
    /// Label taken from a preceding comment; `None` for unlabelled groups.
    pub name: Option<String>,
    /// Index of the first member in the entity's port list.
    pub start: usize,
    /// Number of members.
    pub len: usize,
}

impl PortGroup {
    /// One past the last member index.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A port group together with the ports it covers.
#[derive(Clone, Copy, Debug)]
pub struct PortGroupView<'a> {
    /// The group label, if any.
    pub name: Option<&'a str>,
    /// Member ports in declaration order.
    pub ports: &'a [Port],
}

/// An entity (or Verilog module) interface.
///
/// Fields are private: an entity is checked once at construction and then
/// only read. `port_groups` is always an ordered partition of `ports`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntity")]
pub struct Entity {
    name: String,
    generics: Vec<Generic>,
    ports: Vec<Port>,
    port_groups: Vec<PortGroup>,
}

/// Serialized form of [`Entity`], checked on the way in.
#[derive(Deserialize)]
struct RawEntity {
    name: String,
    generics: Vec<Generic>,
    ports: Vec<Port>,
    port_groups: Vec<PortGroup>,
}

impl TryFrom<RawEntity> for Entity {
    type Error = InternalError;

    fn try_from(raw: RawEntity) -> HdlResult<Self> {
        Entity::new(raw.name, raw.generics, raw.ports, raw.port_groups)
    }
}

impl Entity {
    /// Creates an entity, checking that `port_groups` partitions `ports`.
    pub fn new(
        name: impl Into<String>,
        generics: Vec<Generic>,
        ports: Vec<Port>,
        port_groups: Vec<PortGroup>,
    ) -> HdlResult<Self> {
        check_partition(&port_groups, ports.len())?;
        Ok(Self {
            name: name.into(),
            generics,
            ports,
            port_groups,
        })
    }

    /// Entity name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generics in declaration order.
    pub fn generics(&self) -> &[Generic] {
        &self.generics
    }

    /// Ports in declaration order.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Port groups in declaration order.
    pub fn port_groups(&self) -> &[PortGroup] {
        &self.port_groups
    }

    /// The ports covered by `group`. Empty if the group belongs to
    /// another entity and does not fit this one.
    pub fn group_ports(&self, group: &PortGroup) -> &[Port] {
        self.ports.get(group.start..group.end()).unwrap_or(&[])
    }

    /// Iterates over every group with its member ports.
    pub fn grouped_ports(&self) -> impl Iterator<Item = PortGroupView<'_>> + '_ {
        self.port_groups.iter().map(|g| PortGroupView {
            name: g.name.as_deref(),
            ports: self.group_ports(g),
        })
    }

    /// Finds a port by name, ignoring ASCII case.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Finds a generic by name, ignoring ASCII case.
    pub fn generic(&self, name: &str) -> Option<&Generic> {
        self.generics
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }
}

/// Verifies that `groups` is an ordered, gap-free, non-empty-member
/// partition of `port_count` ports.
pub(crate) fn check_partition(groups: &[PortGroup], port_count: usize) -> HdlResult<()> {
    let mut next = 0;
    for (i, group) in groups.iter().enumerate() {
        if group.start != next {
            return Err(InternalError::new(format!(
                "port group {i} starts at {} but previous group ended at {next}",
                group.start
            )));
        }
        if group.len == 0 {
            return Err(InternalError::new(format!("port group {i} is empty")));
        }
        next = group.end();
    }
    if next != port_count {
        return Err(InternalError::new(format!(
            "port groups cover {next} ports but the entity has {port_count}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str) -> Port {
        Port {
            name: name.to_string(),
            direction: PortDirection::In,
            subtype: "std_logic".to_string(),
            constraint: None,
            default_value: None,
            span: Span::DUMMY,
            location: Location::START,
        }
    }

    fn group(name: Option<&str>, start: usize, len: usize) -> PortGroup {
        PortGroup {
            name: name.map(str::to_string),
            start,
            len,
        }
    }

    #[test]
    fn direction_keywords() {
        assert_eq!(PortDirection::from_keyword("IN"), Some(PortDirection::In));
        assert_eq!(PortDirection::from_keyword("InOut"), Some(PortDirection::InOut));
        assert_eq!(PortDirection::from_keyword("linkage"), Some(PortDirection::Linkage));
        assert_eq!(PortDirection::from_keyword("input"), None);
        assert_eq!(PortDirection::Buffer.to_string(), "buffer");
    }

    #[test]
    fn type_text_joins_constraint() {
        let mut p = port("d");
        p.subtype = "std_logic_vector".into();
        p.constraint = Some("(7 downto 0)".into());
        assert_eq!(p.type_text(), "std_logic_vector(7 downto 0)");
        p.subtype = "integer".into();
        p.constraint = Some("range 0 to 15".into());
        assert_eq!(p.type_text(), "integer range 0 to 15");
        p.subtype = "wire".into();
        p.constraint = Some("[7:0]".into());
        assert_eq!(p.type_text(), "wire [7:0]");
    }

    #[test]
    fn entity_accepts_valid_partition() {
        let e = Entity::new(
            "top",
            vec![],
            vec![port("a"), port("b"), port("c")],
            vec![group(Some("first"), 0, 1), group(None, 1, 2)],
        )
        .unwrap();
        let views: Vec<_> = e.grouped_ports().collect();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, Some("first"));
        assert_eq!(views[1].ports.len(), 2);
        assert_eq!(views[1].ports[0].name, "b");
    }

    #[test]
    fn entity_without_ports_has_no_groups() {
        let e = Entity::new("empty", vec![], vec![], vec![]).unwrap();
        assert!(e.port_groups().is_empty());
    }

    #[test]
    fn entity_rejects_gap() {
        let err = Entity::new(
            "top",
            vec![],
            vec![port("a"), port("b")],
            vec![group(None, 1, 1)],
        )
        .unwrap_err();
        assert!(err.message.contains("starts at 1"));
    }

    #[test]
    fn entity_rejects_short_cover() {
        assert!(Entity::new("top", vec![], vec![port("a"), port("b")], vec![group(None, 0, 1)])
            .is_err());
    }

    #[test]
    fn entity_rejects_empty_group() {
        assert!(Entity::new("top", vec![], vec![port("a")], vec![group(None, 0, 0), group(None, 0, 1)])
            .is_err());
    }

    #[test]
    fn deserializing_checks_the_partition() {
        let e = Entity::new("top", vec![], vec![port("a"), port("b")], vec![group(None, 0, 2)])
            .unwrap();
        let mut value = serde_json::to_value(&e).unwrap();
        let back: Entity = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back, e);

        value["port_groups"][0]["start"] = serde_json::json!(1);
        value["port_groups"][0]["len"] = serde_json::json!(1);
        let err = serde_json::from_value::<Entity>(value).unwrap_err();
        assert!(err.to_string().contains("starts at 1"), "{err}");
    }

    #[test]
    fn lookup_ignores_case() {
        let e = Entity::new("top", vec![], vec![port("Clk")], vec![group(None, 0, 1)]).unwrap();
        assert!(e.port("CLK").is_some());
        assert!(e.generic("WIDTH").is_none());
    }
}
