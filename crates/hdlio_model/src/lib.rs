//! A canonical entity model and plain-text interface reports.
//!
//! [`Converter`] turns parsed [`Entity`](hdlio_ast::Entity) values into
//! [`CanonicalEntity`] values with classified default expressions. The
//! [`report`] functions render either form through [`ReportableEntity`].

#![warn(missing_docs)]

pub mod canonical;
pub mod convert;
pub mod report;

#[cfg(test)]
mod test_util;

pub use canonical::{CanonicalEntity, CanonicalPortGroup, Expression, GenericItem, Mode, PortItem};
pub use convert::{
    classify_default, convert_entities, convert_mode, Conversion, Converter, ItemKind, OmittedItem,
};
pub use report::{
    report_entities, report_entity, report_generics, report_ports_flat, report_ports_grouped,
    ReportableEntity,
};
