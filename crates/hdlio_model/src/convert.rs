//! Conversion from parsed entities into the canonical model.
//!
//! Conversion never fails as a whole. An item that cannot be represented
//! is left out and recorded as an [`OmittedItem`] on the [`Conversion`].

use crate::canonical::{CanonicalEntity, CanonicalPortGroup, Expression, GenericItem, Mode, PortItem};
use hdlio_ast::{DesignUnit, Entity, Generic, Port, PortDirection};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which list an omitted item came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// A generic.
    Generic,
    /// A port.
    Port,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Generic => "generic",
            ItemKind::Port => "port",
        })
    }
}

/// An item left out of a [`Conversion`], and why.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum OmittedItem {
    /// The item has no name.
    #[error("{kind} #{index} has no identifier")]
    MissingIdentifier {
        /// Generic or port.
        kind: ItemKind,
        /// Position in the entity's list.
        index: usize,
    },
    /// An integer default outside the 64-bit range.
    #[error("default of generic '{name}' does not fit in 64 bits: {text}")]
    IntegerOverflow {
        /// Generic name.
        name: String,
        /// The default as written.
        text: String,
    },
}

/// The result of converting one entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// The converted entity.
    pub entity: CanonicalEntity,
    /// Items that were dropped, in encounter order.
    pub omitted: Vec<OmittedItem>,
}

impl Conversion {
    /// Returns `true` if nothing was dropped.
    pub fn is_complete(&self) -> bool {
        self.omitted.is_empty()
    }
}

/// Converts parsed entities into [`CanonicalEntity`] values.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter;

impl Converter {
    /// Creates a converter.
    pub fn new() -> Self {
        Converter
    }

    /// Converts one entity. Generics and ports keep their order; each port
    /// group keeps its label and members.
    pub fn convert_entity(&self, entity: &Entity) -> Conversion {
        let mut omitted = Vec::new();

        let generic_items = entity
            .generics()
            .iter()
            .enumerate()
            .filter_map(|(index, generic)| match convert_generic(index, generic) {
                Ok(item) => Some(item),
                Err(reason) => {
                    omitted.push(reason);
                    None
                }
            })
            .collect();

        let mut port_items = Vec::with_capacity(entity.ports().len());
        let mut converted: Vec<Option<PortItem>> = Vec::with_capacity(entity.ports().len());
        for (index, port) in entity.ports().iter().enumerate() {
            if port.name.is_empty() {
                omitted.push(OmittedItem::MissingIdentifier {
                    kind: ItemKind::Port,
                    index,
                });
                converted.push(None);
                continue;
            }
            let item = convert_port(port);
            port_items.push(item.clone());
            converted.push(Some(item));
        }

        let port_groups = entity
            .port_groups()
            .iter()
            .map(|group| CanonicalPortGroup {
                name: group.name.clone(),
                port_items: converted
                    .get(group.start..group.end())
                    .unwrap_or(&[])
                    .iter()
                    .flatten()
                    .cloned()
                    .collect(),
            })
            .collect();

        if !omitted.is_empty() {
            tracing::debug!(
                entity = entity.name(),
                omitted = omitted.len(),
                "conversion dropped items"
            );
        }

        Conversion {
            entity: CanonicalEntity {
                identifier: entity.name().to_string(),
                generic_items,
                port_items,
                port_groups,
            },
            omitted,
        }
    }

    /// Converts every entity and module among `units`, in order.
    pub fn convert_units(&self, units: &[DesignUnit]) -> Vec<Conversion> {
        units
            .iter()
            .filter_map(DesignUnit::as_entity)
            .map(|entity| self.convert_entity(entity))
            .collect()
    }
}

/// Converts every entity among `units`, logging and discarding omissions.
pub fn convert_entities(units: &[DesignUnit]) -> Vec<CanonicalEntity> {
    Converter::new()
        .convert_units(units)
        .into_iter()
        .map(|conversion| {
            for item in &conversion.omitted {
                tracing::warn!(entity = %conversion.entity.identifier, "{item}");
            }
            conversion.entity
        })
        .collect()
}

/// Maps a port direction to a canonical mode.
pub fn convert_mode(direction: PortDirection) -> Mode {
    match direction {
        PortDirection::In => Mode::In,
        PortDirection::Out => Mode::Out,
        PortDirection::InOut => Mode::InOut,
        PortDirection::Buffer => Mode::Buffer,
        PortDirection::Linkage => Mode::Linkage,
    }
}

/// Classifies the raw text of a default value.
///
/// Empty text has no default. `-?[0-9]+` is an integer, text wrapped in
/// double quotes is a string, and anything else (whitespace included) is
/// kept as an enumeration literal. Returns `Err` with the text if it is an
/// integer too large for `i64`.
pub fn classify_default(text: &str) -> Result<Option<Expression>, String> {
    if text.is_empty() {
        return Ok(None);
    }
    if is_integer(text) {
        return text
            .parse::<i64>()
            .map(|value| Some(Expression::IntegerLiteral(value)))
            .map_err(|_| text.to_string());
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Ok(Some(Expression::StringLiteral(text[1..text.len() - 1].to_string())));
    }
    Ok(Some(Expression::EnumerationLiteral(text.to_string())))
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn convert_generic(index: usize, generic: &Generic) -> Result<GenericItem, OmittedItem> {
    if generic.name.is_empty() {
        return Err(OmittedItem::MissingIdentifier {
            kind: ItemKind::Generic,
            index,
        });
    }
    let default_expression = classify_default(generic.default_value.as_deref().unwrap_or(""))
        .map_err(|text| OmittedItem::IntegerOverflow {
            name: generic.name.clone(),
            text,
        })?;
    Ok(GenericItem {
        identifier: generic.name.clone(),
        subtype: generic.subtype.clone(),
        default_expression,
    })
}

fn convert_port(port: &Port) -> PortItem {
    PortItem {
        identifier: port.name.clone(),
        mode: convert_mode(port.direction),
        subtype: port.type_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{generic, parse_entities, port};
    use hdlio_ast::PortGroup;

    #[test]
    fn classify_integers() {
        assert_eq!(classify_default("42"), Ok(Some(Expression::IntegerLiteral(42))));
        assert_eq!(classify_default("-42"), Ok(Some(Expression::IntegerLiteral(-42))));
        assert_eq!(classify_default("99999999999999999999"), Err("99999999999999999999".into()));
    }

    #[test]
    fn classify_strings_and_identifiers() {
        assert_eq!(
            classify_default("\"hello\""),
            Ok(Some(Expression::StringLiteral("hello".into())))
        );
        assert_eq!(
            classify_default("IDLE"),
            Ok(Some(Expression::EnumerationLiteral("IDLE".into())))
        );
        assert_eq!(
            classify_default("   "),
            Ok(Some(Expression::EnumerationLiteral("   ".into())))
        );
        assert_eq!(
            classify_default("-"),
            Ok(Some(Expression::EnumerationLiteral("-".into())))
        );
        assert_eq!(classify_default(""), Ok(None));
    }

    #[test]
    fn every_direction_maps() {
        assert_eq!(convert_mode(PortDirection::In), Mode::In);
        assert_eq!(convert_mode(PortDirection::Out), Mode::Out);
        assert_eq!(convert_mode(PortDirection::InOut), Mode::InOut);
        assert_eq!(convert_mode(PortDirection::Buffer), Mode::Buffer);
        assert_eq!(convert_mode(PortDirection::Linkage), Mode::Linkage);
    }

    #[test]
    fn converts_parsed_counter() {
        let entities = parse_entities(
            "entity counter is
               generic (WIDTH : integer := 8; NAME : string := \"cnt\"; MODE : mode_t := FAST);
               port (
                 -- Clock
                 clk : in std_logic;
                 rst : in std_logic;

                 -- Output
                 count : out std_logic_vector(WIDTH-1 downto 0)
               );
             end entity;",
        );
        let conversion = Converter::new().convert_entity(&entities[0]);
        assert!(conversion.is_complete());
        let entity = conversion.entity;
        assert_eq!(entity.identifier, "counter");
        assert_eq!(
            entity.generic("width").unwrap().default_expression,
            Some(Expression::IntegerLiteral(8))
        );
        assert_eq!(
            entity.generic("NAME").unwrap().default_expression,
            Some(Expression::StringLiteral("cnt".into()))
        );
        assert_eq!(
            entity.generic("MODE").unwrap().default_expression,
            Some(Expression::EnumerationLiteral("FAST".into()))
        );
        assert_eq!(entity.port("count").unwrap().mode, Mode::Out);
        assert_eq!(
            entity.port("count").unwrap().subtype,
            "std_logic_vector(WIDTH-1 downto 0)"
        );

        let groups: Vec<_> = entity
            .port_groups
            .iter()
            .map(|g| (g.name.as_deref(), g.port_items.len()))
            .collect();
        assert_eq!(groups, vec![(Some("Clock"), 2), (Some("Output"), 1)]);
    }

    #[test]
    fn bad_items_are_omitted_not_fatal() {
        let entity = Entity::new(
            "odd",
            vec![
                generic("", None),
                generic("BIG", Some("123456789012345678901234567890")),
                generic("OK", Some("1")),
            ],
            vec![port("a"), port(""), port("b")],
            vec![
                PortGroup {
                    name: Some("first".into()),
                    start: 0,
                    len: 2,
                },
                PortGroup {
                    name: None,
                    start: 2,
                    len: 1,
                },
            ],
        )
        .unwrap();

        let conversion = Converter::new().convert_entity(&entity);
        assert_eq!(conversion.omitted.len(), 3);
        assert_eq!(
            conversion.omitted[0],
            OmittedItem::MissingIdentifier {
                kind: ItemKind::Generic,
                index: 0
            }
        );
        assert!(matches!(conversion.omitted[1], OmittedItem::IntegerOverflow { .. }));
        assert_eq!(conversion.omitted[2].to_string(), "port #1 has no identifier");

        let entity = conversion.entity;
        assert_eq!(entity.generic_items.len(), 1);
        assert_eq!(entity.port_items.len(), 2);
        assert_eq!(entity.port_groups[0].port_items.len(), 1);
        assert_eq!(entity.port_groups[0].port_items[0].identifier, "a");
        assert_eq!(entity.port_groups[1].port_items[0].identifier, "b");
    }

    #[test]
    fn units_without_interfaces_are_skipped() {
        let units = crate::test_util::parse_units(
            "entity a is end;
             architecture rtl of a is begin end;
             package p is end;
             entity b is port (x : in bit); end;",
        );
        let names: Vec<_> = convert_entities(&units)
            .into_iter()
            .map(|e| e.identifier)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
