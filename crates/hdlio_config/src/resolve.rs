//! Library resolution: file paths anchored at the project root and the
//! effective parse options.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use hdlio_common::ParseOptions;
use std::path::{Path, PathBuf};

/// A library entry ready to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLibrary {
    /// The library name.
    pub name: String,
    /// Source files in configuration order. Relative entries are joined to
    /// the project root; absolute ones are kept.
    pub files: Vec<PathBuf>,
    /// `[parse]` with the library's overrides applied.
    pub options: ParseOptions,
}

/// Resolves the library called `name` against `root`.
pub fn resolve_library(
    config: &ProjectConfig,
    name: &str,
    root: &Path,
) -> Result<ResolvedLibrary, ConfigError> {
    let library = config
        .libraries
        .get(name)
        .ok_or_else(|| ConfigError::UnknownLibrary(name.to_string()))?;
    let files = library
        .files
        .iter()
        .map(|f| {
            let path = Path::new(f);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            }
        })
        .collect();
    Ok(ResolvedLibrary {
        name: name.to_string(),
        files,
        options: config.options_for(name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use hdlio_common::LanguageVersion;

    const CONFIG: &str = r#"
[parse]
version = "2008"

[libraries.work]
files = ["rtl/top.vhd", "/opt/ip/fifo.vhd"]
version = "93"
"#;

    #[test]
    fn relative_paths_join_root() {
        let config = load_config_from_str(CONFIG).unwrap();
        let lib = resolve_library(&config, "work", Path::new("/proj")).unwrap();
        assert_eq!(lib.name, "work");
        assert_eq!(
            lib.files,
            vec![
                PathBuf::from("/proj/rtl/top.vhd"),
                PathBuf::from("/opt/ip/fifo.vhd")
            ]
        );
        assert_eq!(lib.options.version, LanguageVersion::Vhdl1993);
    }

    #[test]
    fn unknown_library() {
        let config = load_config_from_str(CONFIG).unwrap();
        let err = resolve_library(&config, "ip", Path::new("/proj")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLibrary(ref n) if n == "ip"));
    }
}
