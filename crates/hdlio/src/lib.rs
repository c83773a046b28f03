//! HDL front end: design units, their generics and ports, from VHDL,
//! Verilog and SystemVerilog text.
//!
//! # Entry points
//!
//! - [`parse`]: one input, with [`ParseOptions`] choosing the revision, the
//!   recovery mode and the version-mismatch policy.
//! - [`from_file`] / [`from_string`]: strict conveniences.
//! - [`Workspace`]: named [`Library`] values filled by repeated loads, or
//!   from an `hdlio.toml` project file.
//!
//! ```no_run
//! use hdlio::{LanguageVersion, ParseOptions, SourceInput, Workspace};
//!
//! let mut ws = Workspace::new();
//! let report = ws.load("work", SourceInput::file("rtl/top.vhd"), &ParseOptions::default())?;
//! for entity in ws.library("work").unwrap().entities() {
//!     println!("{} has {} ports", entity.name(), entity.ports().len());
//! }
//! # let _ = (report, LanguageVersion::Vhdl2008);
//! # Ok::<(), hdlio::HdlError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod input;
pub mod library;
pub mod parse;
pub mod workspace;

pub use error::HdlError;
pub use input::{check_family, detect_family, SourceInput};
pub use library::{Library, LoadedSource};
pub use parse::{from_file, from_string, parse, DesignFile, ParseResult};
pub use workspace::{LoadReport, Workspace};

pub use hdlio_ast::{
    DesignUnit, DesignUnitKind, Entity, Generic, GenericClass, Port, PortDirection, PortGroup,
    PortGroupView, UnitKind,
};
pub use hdlio_common::{
    LanguageFamily, LanguageVersion, ParseOptions, RecoveryMode, VersionMismatchPolicy,
};
pub use hdlio_diagnostics::{Diagnostic, Severity, UnitContext};
