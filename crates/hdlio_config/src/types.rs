//! Configuration types deserialized from `hdlio.toml`.

use hdlio_common::{LanguageVersion, ParseOptions, RecoveryMode, VersionMismatchPolicy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// The top-level project configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Optional project metadata.
    #[serde(default)]
    pub project: Option<ProjectMeta>,
    /// Default parse options for every library.
    #[serde(default)]
    pub parse: ParseOptions,
    /// Libraries keyed by name, in name order.
    #[serde(default)]
    pub libraries: BTreeMap<String, LibraryConfig>,
}

impl ProjectConfig {
    /// The effective options for `library`: the `[parse]` table with the
    /// library's overrides applied. Unknown names get the defaults.
    pub fn options_for(&self, library: &str) -> ParseOptions {
        let mut options = self.parse;
        if let Some(lib) = self.libraries.get(library) {
            if let Some(version) = lib.version {
                options.version = version;
            }
            if let Some(recovery) = lib.recovery {
                options.recovery = recovery;
            }
            if let Some(policy) = lib.on_version_mismatch {
                options.on_version_mismatch = policy;
            }
        }
        options
    }
}

/// `[project]` metadata. Informational only.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// A brief description.
    #[serde(default)]
    pub description: String,
}

/// One `[libraries.<name>]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Source files, relative to the directory holding `hdlio.toml`.
    ///
    /// Accepts a single string or a list, loaded in the order given.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub files: Vec<String>,
    /// Overrides `parse.version`.
    #[serde(default)]
    pub version: Option<LanguageVersion>,
    /// Overrides `parse.recovery`.
    #[serde(default)]
    pub recovery: Option<RecoveryMode>,
    /// Overrides `parse.on_version_mismatch`.
    #[serde(default)]
    pub on_version_mismatch: Option<VersionMismatchPolicy>,
}

/// Accepts both `files = "top.vhd"` and `files = ["a.vhd", "b.vhd"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn files_accept_string_or_list() {
        let config = load_config_from_str(
            r#"
[libraries.single]
files = "top.vhd"

[libraries.many]
files = ["a.vhd", "b.vhd"]
"#,
        )
        .unwrap();
        assert_eq!(config.libraries["single"].files, vec!["top.vhd"]);
        assert_eq!(config.libraries["many"].files, vec!["a.vhd", "b.vhd"]);
    }

    #[test]
    fn library_overrides_parse_defaults() {
        let config = load_config_from_str(
            r#"
[parse]
version = "vhdl-1993"
on_version_mismatch = "reject"

[libraries.work]
files = ["top.vhd"]

[libraries.ip]
files = ["core.sv"]
version = "sv2012"
recovery = "strict"
"#,
        )
        .unwrap();

        let work = config.options_for("work");
        assert_eq!(work.version, LanguageVersion::Vhdl1993);
        assert_eq!(work.recovery, RecoveryMode::Lenient);
        assert_eq!(work.on_version_mismatch, VersionMismatchPolicy::Reject);

        let ip = config.options_for("ip");
        assert_eq!(ip.version, LanguageVersion::SystemVerilog2012);
        assert_eq!(ip.recovery, RecoveryMode::Strict);
        assert_eq!(ip.on_version_mismatch, VersionMismatchPolicy::Reject);
    }

    #[test]
    fn unknown_library_gets_defaults() {
        let config = ProjectConfig::default();
        assert_eq!(config.options_for("nowhere"), ParseOptions::default());
    }

    #[test]
    fn project_meta_is_optional() {
        let config = load_config_from_str(
            r#"
[project]
name = "uart"

[libraries.work]
files = ["uart.vhd"]
"#,
        )
        .unwrap();
        assert_eq!(config.project.unwrap().name, "uart");
    }
}
