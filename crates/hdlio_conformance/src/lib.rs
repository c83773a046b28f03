//! Conformance test helpers for hdlio.
//!
//! Provides shared functions that run source text through the unified parse
//! entry point and return structured results for assertion in integration
//! tests.

#![warn(missing_docs)]

use hdlio::{
    parse, Diagnostic, Entity, LanguageVersion, ParseOptions, ParseResult, Severity, SourceInput,
};
use hdlio_config::{load_config_from_str, ProjectConfig};

/// Result of one lenient parse.
pub struct PipelineResult {
    /// Everything the parse returned.
    pub result: ParseResult,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// Entities and modules, in source order.
    pub fn entities(&self) -> Vec<&Entity> {
        self.result.entities().collect()
    }

    /// Names of every unit, in source order.
    pub fn unit_names(&self) -> Vec<&str> {
        self.result.units.iter().map(|u| u.name.as_str()).collect()
    }

    /// The entity called `name`, ignoring case. Panics if it is missing.
    pub fn entity(&self, name: &str) -> &Entity {
        self.result
            .entities()
            .find(|e| e.name().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| panic!("no entity '{name}' in {:?}", self.unit_names()))
    }

    /// Every diagnostic.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.result.diagnostics
    }
}

/// Parses `source` with `options`. Panics on an I/O or internal failure.
pub fn pipeline_with(source: &str, options: ParseOptions) -> PipelineResult {
    let result = parse(SourceInput::text(source), &options)
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    let count = |severity| {
        result
            .diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    };
    let error_count = count(Severity::Error);
    let warning_count = count(Severity::Warning);
    PipelineResult {
        has_errors: error_count > 0,
        error_count,
        warning_count,
        result,
    }
}

/// Lenient VHDL-2008 parse.
pub fn pipeline_vhdl(source: &str) -> PipelineResult {
    pipeline_with(source, ParseOptions::new(LanguageVersion::Vhdl2008))
}

/// Lenient Verilog-2005 parse.
pub fn pipeline_verilog(source: &str) -> PipelineResult {
    pipeline_with(source, ParseOptions::new(LanguageVersion::Verilog2005))
}

/// Lenient SystemVerilog-2017 parse.
pub fn pipeline_sv(source: &str) -> PipelineResult {
    pipeline_with(source, ParseOptions::new(LanguageVersion::SystemVerilog2017))
}

/// Port names in declaration order.
pub fn port_names(entity: &Entity) -> Vec<&str> {
    entity.ports().iter().map(|p| p.name.as_str()).collect()
}

/// `(label, member count)` for every port group.
pub fn group_summary(entity: &Entity) -> Vec<(Option<&str>, usize)> {
    entity
        .grouped_ports()
        .map(|g| (g.name, g.ports.len()))
        .collect()
}

/// Asserts that the port groups of `entity` cover every port exactly once,
/// in order.
pub fn assert_partition(entity: &Entity) {
    let flattened: Vec<&str> = entity
        .grouped_ports()
        .flat_map(|g| g.ports.iter().map(|p| p.name.as_str()))
        .collect();
    assert_eq!(
        flattened,
        port_names(entity),
        "groups of '{}' do not partition its ports",
        entity.name()
    );
    assert!(
        entity.grouped_ports().all(|g| !g.ports.is_empty()),
        "'{}' has an empty port group",
        entity.name()
    );
}

/// Builds a `ProjectConfig` with one library per `(name, files)` pair.
pub fn make_config(libraries: &[(&str, &[&str])]) -> ProjectConfig {
    let mut toml_str = String::from("[project]\nname = \"conformance_test\"\n");
    for (name, files) in libraries {
        let files: Vec<String> = files.iter().map(|f| format!("\"{f}\"")).collect();
        toml_str.push_str(&format!(
            "\n[libraries.{name}]\nfiles = [{}]\n",
            files.join(", ")
        ));
    }
    load_config_from_str(&toml_str).unwrap_or_else(|e| panic!("bad test config: {e}"))
}
