//! Fixtures shared by the converter and reporter tests.

use hdlio_ast::{DesignUnit, Entity, Generic, GenericClass, Port, PortDirection};
use hdlio_common::ParseOptions;
use hdlio_diagnostics::DiagnosticSink;
use hdlio_source::{FileId, Location, Span};
use std::path::Path;

pub(crate) fn parse_units(src: &str) -> Vec<DesignUnit> {
    let sink = DiagnosticSink::new();
    let units = hdlio_vhdl_parser::parse_source(
        src,
        FileId::from_raw(0),
        Path::new("test.vhd"),
        &ParseOptions::default(),
        &sink,
    )
    .expect("internal parser error");
    assert!(!sink.has_errors(), "unexpected errors in fixture");
    units
}

pub(crate) fn parse_entities(src: &str) -> Vec<Entity> {
    parse_units(src)
        .iter()
        .filter_map(DesignUnit::as_entity)
        .cloned()
        .collect()
}

pub(crate) fn generic(name: &str, default: Option<&str>) -> Generic {
    Generic {
        name: name.to_string(),
        subtype: "integer".to_string(),
        default_value: default.map(str::to_string),
        class: GenericClass::Constant,
        span: Span::DUMMY,
        location: Location::START,
    }
}

pub(crate) fn port(name: &str) -> Port {
    Port {
        name: name.to_string(),
        direction: PortDirection::In,
        subtype: "bit".to_string(),
        constraint: None,
        default_value: None,
        span: Span::DUMMY,
        location: Location::START,
    }
}
