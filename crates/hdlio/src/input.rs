//! Parse inputs and file classification.

use crate::error::HdlError;
use hdlio_common::{LanguageFamily, LanguageVersion};
use std::path::{Path, PathBuf};

/// Name recorded for texts passed without one.
pub const MEMORY_SOURCE_NAME: &str = "<memory>";

/// Where the text to parse comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceInput {
    /// A file read once from disk.
    File(PathBuf),
    /// An in-memory text. `name` is recorded as the units' source path.
    Text {
        /// Display name, often a file name.
        name: String,
        /// The source text.
        text: String,
    },
}

impl SourceInput {
    /// A file input.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SourceInput::File(path.into())
    }

    /// An unnamed in-memory text.
    pub fn text(text: impl Into<String>) -> Self {
        SourceInput::Text {
            name: MEMORY_SOURCE_NAME.to_string(),
            text: text.into(),
        }
    }

    /// An in-memory text with a display name.
    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        SourceInput::Text {
            name: name.into(),
            text: text.into(),
        }
    }

    /// The path or name units will carry.
    pub fn path(&self) -> &Path {
        match self {
            SourceInput::File(path) => path,
            SourceInput::Text { name, .. } => Path::new(name),
        }
    }
}

impl From<&Path> for SourceInput {
    fn from(path: &Path) -> Self {
        SourceInput::File(path.to_path_buf())
    }
}

impl From<PathBuf> for SourceInput {
    fn from(path: PathBuf) -> Self {
        SourceInput::File(path)
    }
}

/// Detects the dialect family from a file's extension.
///
/// Returns `None` for unrecognized extensions.
pub fn detect_family(path: &Path) -> Option<LanguageFamily> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "vhd" | "vhdl" => Some(LanguageFamily::Vhdl),
        "v" | "vh" => Some(LanguageFamily::Verilog),
        "sv" | "svh" => Some(LanguageFamily::SystemVerilog),
        _ => None,
    }
}

/// Fails if `path`'s extension names a family that `version` cannot parse.
///
/// SystemVerilog revisions accept `.v` files; unknown extensions follow the
/// version.
pub fn check_family(path: &Path, version: LanguageVersion) -> Result<(), HdlError> {
    let Some(family) = detect_family(path) else {
        return Ok(());
    };
    let compatible = match (family, version.family()) {
        (a, b) if a == b => true,
        (LanguageFamily::Verilog, LanguageFamily::SystemVerilog) => true,
        _ => false,
    };
    if compatible {
        Ok(())
    } else {
        Err(HdlError::FamilyMismatch {
            path: path.to_path_buf(),
            family,
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_by_extension() {
        assert_eq!(detect_family(Path::new("a/top.vhd")), Some(LanguageFamily::Vhdl));
        assert_eq!(detect_family(Path::new("top.VHDL")), Some(LanguageFamily::Vhdl));
        assert_eq!(detect_family(Path::new("top.v")), Some(LanguageFamily::Verilog));
        assert_eq!(
            detect_family(Path::new("pkg.sv")),
            Some(LanguageFamily::SystemVerilog)
        );
        assert_eq!(detect_family(Path::new("notes.txt")), None);
        assert_eq!(detect_family(Path::new("Makefile")), None);
    }

    #[test]
    fn family_compatibility() {
        assert!(check_family(Path::new("top.vhd"), LanguageVersion::Vhdl1993).is_ok());
        assert!(check_family(Path::new("top.v"), LanguageVersion::SystemVerilog2012).is_ok());
        assert!(check_family(Path::new("top.txt"), LanguageVersion::Verilog2005).is_ok());
        assert!(matches!(
            check_family(Path::new("top.sv"), LanguageVersion::Verilog2005),
            Err(HdlError::FamilyMismatch { .. })
        ));
        assert!(matches!(
            check_family(Path::new("top.v"), LanguageVersion::Vhdl2008),
            Err(HdlError::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn text_inputs_carry_a_name() {
        assert_eq!(SourceInput::text("x").path(), Path::new(MEMORY_SOURCE_NAME));
        assert_eq!(SourceInput::named("a.vhd", "x").path(), Path::new("a.vhd"));
    }
}
