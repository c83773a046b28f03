//! The library/document manager.
//!
//! A [`Workspace`] owns every loaded text and any number of independent
//! [`Library`] values. A load parses its input completely before touching
//! the library, so a failed load leaves the library as it was and drops the
//! text it read.

use crate::error::HdlError;
use crate::input::SourceInput;
use crate::library::{Library, LoadedSource};
use crate::parse::{load_input, parse_loaded, ParseResult};
use hdlio_ast::DesignUnit;
use hdlio_common::{InternalError, ParseOptions};
use hdlio_config::{load_config, resolve_library, ProjectConfig};
use hdlio_diagnostics::Diagnostic;
use hdlio_source::{FileId, SourceDb};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// What one successful load added.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// The library that received the units.
    pub library: String,
    /// Id of the text in the workspace's [`SourceDb`].
    pub file: FileId,
    /// Path or name of the input.
    pub path: PathBuf,
    /// Number of units appended.
    pub units: usize,
    /// The library already held a text with the same contents.
    pub reloaded: bool,
    /// Everything the parser reported.
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Loaded texts plus named libraries.
///
/// `load` takes `&mut self`; share a workspace between threads behind a
/// lock.
#[derive(Default)]
pub struct Workspace {
    sources: SourceDb,
    libraries: Vec<Library>,
}

impl Workspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `<root>/hdlio.toml` and loads every library it lists.
    pub fn open(root: &Path) -> Result<Self, HdlError> {
        let config = load_config(root)?;
        Self::from_config(&config, root)
    }

    /// Loads every library of `config`, resolving files against `root`.
    ///
    /// Unreadable files and family mismatches fail the whole call. A file
    /// without design units is logged and skipped. Syntax errors follow
    /// each library's recovery mode.
    pub fn from_config(config: &ProjectConfig, root: &Path) -> Result<Self, HdlError> {
        let mut workspace = Self::new();
        for name in config.libraries.keys() {
            let resolved = resolve_library(config, name, root)?;
            workspace.create(&resolved.name);
            for result in workspace.load_all(&resolved.name, &resolved.files, &resolved.options) {
                match result {
                    Ok(_) => {}
                    Err(HdlError::NoDesignUnits { path, diagnostics }) => {
                        tracing::warn!(
                            library = %resolved.name,
                            path = %path.display(),
                            diagnostics = diagnostics.len(),
                            "no design units found"
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(workspace)
    }

    /// Returns the library called `name`, creating it if needed.
    pub fn create(&mut self, name: &str) -> &mut Library {
        let index = match self.libraries.iter().position(|l| l.name() == name) {
            Some(index) => index,
            None => {
                self.libraries.push(Library::new(name));
                self.libraries.len() - 1
            }
        };
        &mut self.libraries[index]
    }

    /// The library called `name`.
    pub fn library(&self, name: &str) -> Option<&Library> {
        self.libraries.iter().find(|l| l.name() == name)
    }

    /// Every library, in creation order.
    pub fn libraries(&self) -> impl Iterator<Item = &Library> + '_ {
        self.libraries.iter()
    }

    /// The units of library `name`; empty if there is no such library.
    pub fn get_design_units(&self, name: &str) -> &[DesignUnit] {
        self.library(name)
            .map(Library::design_units)
            .unwrap_or(&[])
    }

    /// Every text loaded so far.
    pub fn source_db(&self) -> &SourceDb {
        &self.sources
    }

    /// Parses `input` and appends its units to `library`.
    ///
    /// Fails without changing the library if the input cannot be read, a
    /// strict parse hits an error, or no unit parsed.
    pub fn load(
        &mut self,
        library: &str,
        input: impl Into<SourceInput>,
        options: &ParseOptions,
    ) -> Result<LoadReport, HdlError> {
        let file = load_input(&mut self.sources, input.into(), options.version)?;
        let parsed = parse_loaded(&self.sources, file, options);
        self.commit_or_discard(library, file, parsed)
    }

    /// Loads `paths` into `library`, parsing in parallel.
    ///
    /// Units are appended in the order of `paths`. One result per path.
    pub fn load_all(
        &mut self,
        library: &str,
        paths: &[PathBuf],
        options: &ParseOptions,
    ) -> Vec<Result<LoadReport, HdlError>> {
        let loaded: Vec<Result<FileId, HdlError>> = paths
            .iter()
            .map(|path| load_input(&mut self.sources, SourceInput::File(path.clone()), options.version))
            .collect();

        let sources = &self.sources;
        let parsed: Vec<Result<(FileId, Result<ParseResult, HdlError>), HdlError>> = loaded
            .into_par_iter()
            .map(|file| {
                let file = file?;
                Ok((file, parse_loaded(sources, file, options)))
            })
            .collect();

        parsed
            .into_iter()
            .map(|r| {
                let (file, parsed) = r?;
                self.commit_or_discard(library, file, parsed)
            })
            .collect()
    }

    /// Commits the parse of `file`, removing the text from the database if
    /// the parse or the commit fails.
    fn commit_or_discard(
        &mut self,
        library: &str,
        file: FileId,
        parsed: Result<ParseResult, HdlError>,
    ) -> Result<LoadReport, HdlError> {
        let committed = parsed.and_then(|result| self.commit(library, file, result));
        if committed.is_err() {
            self.sources.remove(file);
        }
        committed
    }

    fn commit(
        &mut self,
        library: &str,
        file: FileId,
        result: ParseResult,
    ) -> Result<LoadReport, HdlError> {
        let ParseResult {
            units,
            diagnostics,
            source,
        } = result;
        if units.is_empty() {
            return Err(HdlError::NoDesignUnits {
                path: source,
                diagnostics,
            });
        }
        let fingerprint = self
            .sources
            .get_file(file)
            .map(|f| f.fingerprint)
            .ok_or_else(|| InternalError::new(format!("source {} vanished", file.as_raw())))?;

        let reloaded = self
            .library(library)
            .is_some_and(|l| l.contains_source(fingerprint));
        let count = units.len();
        tracing::debug!(
            library,
            path = %source.display(),
            units = count,
            diagnostics = diagnostics.len(),
            reloaded,
            "loaded source"
        );
        self.create(library).append(
            LoadedSource {
                path: source.clone(),
                fingerprint,
                units: count,
                diagnostics: diagnostics.clone(),
            },
            units,
        );
        Ok(LoadReport {
            library: library.to_string(),
            file,
            path: source,
            units: count,
            reloaded,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdlio_common::LanguageVersion;
    use std::fs;

    const GOOD: &str = "entity good is port (a : in bit; b : out bit); end;";

    #[test]
    fn create_is_idempotent() {
        let mut ws = Workspace::new();
        ws.create("work");
        ws.load("work", SourceInput::text(GOOD), &ParseOptions::default())
            .unwrap();
        ws.create("work");
        assert_eq!(ws.libraries().count(), 1);
        assert_eq!(ws.get_design_units("work").len(), 1);
    }

    #[test]
    fn libraries_do_not_share_units() {
        let mut ws = Workspace::new();
        ws.load("a", SourceInput::text(GOOD), &ParseOptions::default())
            .unwrap();
        ws.create("b");
        assert_eq!(ws.get_design_units("a").len(), 1);
        assert!(ws.get_design_units("b").is_empty());
        assert!(ws.get_design_units("missing").is_empty());
    }

    #[test]
    fn loading_twice_appends_twice() {
        let mut ws = Workspace::new();
        let options = ParseOptions::default();
        let first = ws.load("work", SourceInput::named("g.vhd", GOOD), &options).unwrap();
        let second = ws.load("work", SourceInput::named("g.vhd", GOOD), &options).unwrap();
        assert!(!first.reloaded);
        assert!(second.reloaded);
        let other = ws.load("other", SourceInput::named("g.vhd", GOOD), &options).unwrap();
        assert!(!other.reloaded);
        let lib = ws.library("work").unwrap();
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.source_files().len(), 1);
        assert_eq!(ws.source_db().len(), 3);
    }

    #[test]
    fn failed_load_leaves_library_untouched() {
        let mut ws = Workspace::new();
        let options = ParseOptions::default();
        ws.load("work", SourceInput::text(GOOD), &options).unwrap();

        let err = ws
            .load("work", PathBuf::from("nonexistent.vhd"), &options)
            .unwrap_err();
        assert!(matches!(err, HdlError::FileNotFound(_)));

        let err = ws
            .load("work", SourceInput::text("-- only a comment\n"), &options)
            .unwrap_err();
        assert!(matches!(err, HdlError::NoDesignUnits { .. }));

        let strict = ParseOptions::strict(LanguageVersion::Vhdl2008);
        let err = ws
            .load("work", SourceInput::text(format!("{GOOD}\nentity bad is port (x bit); end;")), &strict)
            .unwrap_err();
        assert!(matches!(err, HdlError::Syntax(_)));

        assert_eq!(ws.get_design_units("work").len(), 1);
        assert_eq!(ws.source_db().len(), 1);
    }

    #[test]
    fn lenient_load_reports_diagnostics() {
        let mut ws = Workspace::new();
        let src = format!("{GOOD}\nentity bad is port (x bit); end;\nentity also is end;");
        let report = ws
            .load("work", SourceInput::text(src), &ParseOptions::default())
            .unwrap();
        assert_eq!(report.units, 2);
        assert!(report.has_errors());
        assert_eq!(ws.library("work").unwrap().diagnostics().count(), 1);
    }

    #[test]
    fn load_all_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..8 {
            let path = dir.path().join(format!("e{i}.vhd"));
            fs::write(&path, format!("entity e{i} is end;")).unwrap();
            paths.push(path);
        }
        paths.insert(3, dir.path().join("missing.vhd"));

        let mut ws = Workspace::new();
        let results = ws.load_all("work", &paths, &ParseOptions::default());
        assert_eq!(results.len(), 9);
        assert!(matches!(results[3], Err(HdlError::FileNotFound(_))));

        let names: Vec<_> = ws
            .get_design_units("work")
            .iter()
            .map(|u| u.name.clone())
            .collect();
        let expected: Vec<_> = (0..8).map(|i| format!("e{i}")).collect();
        assert_eq!(names, expected);
        assert_eq!(ws.source_db().len(), 8);
    }

    #[test]
    fn load_all_drops_texts_that_fail() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.vhd");
        let empty = dir.path().join("empty.vhd");
        let bad = dir.path().join("bad.vhd");
        fs::write(&good, GOOD).unwrap();
        fs::write(&empty, "-- nothing here\n").unwrap();
        fs::write(&bad, "entity bad is port (x bit); end;").unwrap();

        let mut ws = Workspace::new();
        let strict = ParseOptions::strict(LanguageVersion::Vhdl2008);
        let results = ws.load_all("work", &[empty, good, bad], &strict);
        assert!(matches!(results[0], Err(HdlError::NoDesignUnits { .. })));
        assert!(matches!(results[2], Err(HdlError::Syntax(_))));
        let report = results[1].as_ref().unwrap();
        assert_eq!(ws.source_db().len(), 1);
        assert!(ws.source_db().get_file(report.file).is_some());
    }

    #[test]
    fn open_project_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("rtl")).unwrap();
        fs::write(dir.path().join("rtl/top.vhd"), GOOD).unwrap();
        fs::write(
            dir.path().join("rtl/core.v"),
            "module core (input clk); endmodule",
        )
        .unwrap();
        fs::write(
            dir.path().join("hdlio.toml"),
            r#"
[libraries.work]
files = ["rtl/top.vhd"]

[libraries.ip]
files = ["rtl/core.v"]
version = "verilog-2005"
recovery = "strict"
"#,
        )
        .unwrap();

        let ws = Workspace::open(dir.path()).unwrap();
        assert_eq!(ws.get_design_units("work")[0].name, "good");
        assert_eq!(ws.get_design_units("ip")[0].name, "core");
        let names: Vec<_> = ws.libraries().map(|l| l.name().to_string()).collect();
        assert_eq!(names, vec!["ip", "work"]);
        assert_eq!(
            ws.library("ip").unwrap().sources()[0].path,
            dir.path().join("rtl/core.v")
        );
    }

    #[test]
    fn config_with_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hdlio.toml"),
            "[libraries.work]\nfiles = [\"nope.vhd\"]\n",
        )
        .unwrap();
        assert!(matches!(
            Workspace::open(dir.path()),
            Err(HdlError::FileNotFound(_))
        ));
    }
}
