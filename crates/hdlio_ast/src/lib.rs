//! Language-neutral model of parsed HDL design units.
//!
//! Dialect parsers produce raw [`InterfaceItem`] records and a stream of
//! [`GroupingEvent`]s for every generic or port clause. The [`builder`]
//! expands those records into [`Generic`] and [`Port`] values, and
//! [`grouping`] partitions the ports into [`PortGroup`]s. The results are
//! wrapped in immutable [`DesignUnit`]s.

#![warn(missing_docs)]

pub mod builder;
pub mod entity;
pub mod grouping;
pub mod interface;
pub mod unit;

pub use builder::{build_generics, build_ports, BuildError};
pub use entity::{Entity, Generic, GenericClass, Port, PortDirection, PortGroup, PortGroupView};
pub use grouping::{group_ports, GroupingEvent};
pub use interface::{InterfaceContext, InterfaceItem, SourceText};
pub use unit::{
    Architecture, Configuration, DeclKind, DeclaredItem, DesignUnit, DesignUnitKind, Package,
    PackageBody, UnitKind,
};
