//! Named accumulations of design units.

use hdlio_ast::{DesignUnit, Entity};
use hdlio_common::SourceFingerprint;
use hdlio_diagnostics::Diagnostic;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One successful load into a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedSource {
    /// Path or name of the input.
    pub path: PathBuf,
    /// Fingerprint of the text as loaded.
    pub fingerprint: SourceFingerprint,
    /// How many units the load appended.
    pub units: usize,
    /// Diagnostics the parse reported.
    pub diagnostics: Vec<Diagnostic>,
}

/// A caller-defined namespace of design units.
///
/// Units appear in discovery order across every load. Loading the same
/// file twice appends it twice.
#[derive(Debug, Clone, Serialize)]
pub struct Library {
    name: String,
    design_units: Vec<DesignUnit>,
    sources: Vec<LoadedSource>,
}

impl Library {
    /// Creates an empty library.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            design_units: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// The library name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every unit, in discovery order.
    pub fn design_units(&self) -> &[DesignUnit] {
        &self.design_units
    }

    /// Distinct paths of the loaded inputs.
    pub fn source_files(&self) -> BTreeSet<&Path> {
        self.sources.iter().map(|s| s.path.as_path()).collect()
    }

    /// Every load, in order.
    pub fn sources(&self) -> &[LoadedSource] {
        &self.sources
    }

    /// Diagnostics of every load, in order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.sources.iter().flat_map(|s| s.diagnostics.iter())
    }

    /// Entities and modules, in discovery order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.design_units.iter().filter_map(DesignUnit::as_entity)
    }

    /// The first unit named `name`, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&DesignUnit> {
        self.design_units
            .iter()
            .find(|u| u.name.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if a text with this fingerprint was loaded before.
    pub fn contains_source(&self, fingerprint: SourceFingerprint) -> bool {
        self.sources.iter().any(|s| s.fingerprint == fingerprint)
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.design_units.len()
    }

    /// Returns `true` if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.design_units.is_empty()
    }

    pub(crate) fn append(&mut self, source: LoadedSource, units: Vec<DesignUnit>) {
        self.design_units.extend(units);
        self.sources.push(source);
    }
}
