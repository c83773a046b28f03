//! Top-level design units.

use crate::entity::{Entity, Generic};
use hdlio_source::{Location, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which kind of design unit a [`DesignUnit`] is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// VHDL entity declaration.
    Entity,
    /// VHDL architecture body.
    Architecture,
    /// VHDL package declaration.
    Package,
    /// VHDL package body.
    PackageBody,
    /// VHDL configuration declaration.
    Configuration,
    /// Verilog or SystemVerilog module.
    Module,
}

impl UnitKind {
    /// The lowercase keyword spelling, e.g. `"package body"`.
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Entity => "entity",
            UnitKind::Architecture => "architecture",
            UnitKind::Package => "package",
            UnitKind::PackageBody => "package body",
            UnitKind::Configuration => "configuration",
            UnitKind::Module => "module",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind tag of a declared item.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// `constant`
    Constant,
    /// `signal`
    Signal,
    /// `variable` or `shared variable`
    Variable,
    /// `file`
    File,
    /// `type`
    Type,
    /// `subtype`
    Subtype,
    /// `component`
    Component,
    /// `function`
    Function,
    /// `procedure`
    Procedure,
    /// `attribute`
    Attribute,
    /// `alias`
    Alias,
    /// `package ... is new`
    PackageInstance,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeclKind::Constant => "constant",
            DeclKind::Signal => "signal",
            DeclKind::Variable => "variable",
            DeclKind::File => "file",
            DeclKind::Type => "type",
            DeclKind::Subtype => "subtype",
            DeclKind::Component => "component",
            DeclKind::Function => "function",
            DeclKind::Procedure => "procedure",
            DeclKind::Attribute => "attribute",
            DeclKind::Alias => "alias",
            DeclKind::PackageInstance => "package instance",
        };
        f.write_str(s)
    }
}

/// An item of a declarative part, recorded by kind and name only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredItem {
    /// What was declared.
    pub kind: DeclKind,
    /// Declared name as written.
    pub name: String,
    /// Parsed interface of a component declaration.
    pub component: Option<Entity>,
    /// Span of the name.
    pub span: Span,
}

/// An architecture body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// The entity this architecture belongs to.
    pub entity_name: String,
    /// Items of the declarative part.
    pub declared_items: Vec<DeclaredItem>,
}

/// A package declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Generics of a VHDL-2008 generic package.
    pub generics: Vec<Generic>,
    /// Items of the package declarative part.
    pub declared_items: Vec<DeclaredItem>,
}

/// A package body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageBody {
    /// Items of the body's declarative part.
    pub declared_items: Vec<DeclaredItem>,
}

/// A configuration declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// The entity being configured.
    pub entity_name: String,
}

/// Variant payload of a [`DesignUnit`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignUnitKind {
    /// VHDL entity.
    Entity(Entity),
    /// VHDL architecture.
    Architecture(Architecture),
    /// VHDL package.
    Package(Package),
    /// VHDL package body.
    PackageBody(PackageBody),
    /// VHDL configuration.
    Configuration(Configuration),
    /// Verilog/SystemVerilog module, modelled as an entity interface.
    Module(Entity),
}

/// One top-level unit found in a source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignUnit {
    /// Unit name as written.
    pub name: String,
    /// Path (or in-memory name) of the text the unit came from.
    pub source_path: PathBuf,
    /// Span from the unit keyword to its closing `;`.
    pub span: Span,
    /// Position of the unit keyword.
    pub location: Location,
    /// Variant payload.
    pub kind: DesignUnitKind,
}

impl DesignUnit {
    /// The fieldless kind tag.
    pub fn unit_kind(&self) -> UnitKind {
        match &self.kind {
            DesignUnitKind::Entity(_) => UnitKind::Entity,
            DesignUnitKind::Architecture(_) => UnitKind::Architecture,
            DesignUnitKind::Package(_) => UnitKind::Package,
            DesignUnitKind::PackageBody(_) => UnitKind::PackageBody,
            DesignUnitKind::Configuration(_) => UnitKind::Configuration,
            DesignUnitKind::Module(_) => UnitKind::Module,
        }
    }

    /// The interface of an entity or module.
    pub fn as_entity(&self) -> Option<&Entity> {
        match &self.kind {
            DesignUnitKind::Entity(e) | DesignUnitKind::Module(e) => Some(e),
            _ => None,
        }
    }

    /// Declared items of an architecture, package or package body.
    pub fn declared_items(&self) -> &[DeclaredItem] {
        match &self.kind {
            DesignUnitKind::Architecture(a) => &a.declared_items,
            DesignUnitKind::Package(p) => &p.declared_items,
            DesignUnitKind::PackageBody(b) => &b.declared_items,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PortGroup;

    fn unit(kind: DesignUnitKind) -> DesignUnit {
        DesignUnit {
            name: "u".into(),
            source_path: PathBuf::from("u.vhd"),
            span: Span::DUMMY,
            location: Location::START,
            kind,
        }
    }

    #[test]
    fn unit_kind_names() {
        let e = Entity::new("u", vec![], vec![], Vec::<PortGroup>::new()).unwrap();
        assert_eq!(unit(DesignUnitKind::Entity(e.clone())).unit_kind().to_string(), "entity");
        assert_eq!(unit(DesignUnitKind::Module(e)).unit_kind(), UnitKind::Module);
        let body = unit(DesignUnitKind::PackageBody(PackageBody {
            declared_items: vec![],
        }));
        assert_eq!(body.unit_kind().to_string(), "package body");
        assert!(body.as_entity().is_none());
    }

    #[test]
    fn declared_items_accessor() {
        let item = DeclaredItem {
            kind: DeclKind::Constant,
            name: "MAX".into(),
            component: None,
            span: Span::DUMMY,
        };
        let pkg = unit(DesignUnitKind::Package(Package {
            generics: vec![],
            declared_items: vec![item],
        }));
        assert_eq!(pkg.declared_items().len(), 1);
        assert_eq!(pkg.declared_items()[0].kind.to_string(), "constant");
        let cfg = unit(DesignUnitKind::Configuration(Configuration {
            entity_name: "top".into(),
        }));
        assert!(cfg.declared_items().is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let e = Entity::new("top", vec![], vec![], vec![]).unwrap();
        let u = unit(DesignUnitKind::Entity(e));
        let json = serde_json::to_string(&u).unwrap();
        let back: DesignUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }
}
