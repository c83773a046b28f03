//! Shared helpers for the recognizer's unit tests.

use crate::parse_source;
use hdlio_ast::DesignUnit;
use hdlio_common::{LanguageVersion, ParseOptions};
use hdlio_diagnostics::{Diagnostic, DiagnosticSink};
use hdlio_source::FileId;
use std::path::Path;

pub(crate) fn parse_with(src: &str, options: ParseOptions) -> (Vec<DesignUnit>, Vec<Diagnostic>) {
    let sink = DiagnosticSink::new();
    let units = parse_source(src, FileId::from_raw(0), Path::new("test.sv"), &options, &sink)
        .expect("internal parser error");
    (units, sink.take_all())
}

pub(crate) fn parse_units(src: &str, version: LanguageVersion) -> (Vec<DesignUnit>, Vec<Diagnostic>) {
    parse_with(src, ParseOptions::new(version))
}

/// Parses as SystemVerilog-2017 and asserts there are no diagnostics.
pub(crate) fn parse_ok(src: &str) -> Vec<DesignUnit> {
    let (units, diags) = parse_units(src, LanguageVersion::SystemVerilog2017);
    assert!(
        diags.is_empty(),
        "unexpected diagnostics: {:?}",
        diags.iter().map(|d| &d.message).collect::<Vec<_>>()
    );
    units
}

/// Parses as SystemVerilog-2017 and returns the errors, asserting there is
/// at least one.
pub(crate) fn parse_err(src: &str) -> Vec<Diagnostic> {
    let (_, diags) = parse_units(src, LanguageVersion::SystemVerilog2017);
    let errors: Vec<_> = diags.into_iter().filter(Diagnostic::is_error).collect();
    assert!(!errors.is_empty(), "expected an error for {src:?}");
    errors
}
