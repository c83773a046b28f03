//! Options shared by every dialect parser.

use crate::version::LanguageVersion;
use serde::{Deserialize, Serialize};

/// How the document level reacts to a unit-level syntax error.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryMode {
    /// Fail on the first error diagnostic.
    Strict,
    /// Collect every diagnostic and keep every unit that parsed.
    #[default]
    Lenient,
}

/// What happens when source uses a construct its revision does not have.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionMismatchPolicy {
    /// Accept the construct and emit a warning diagnostic.
    #[default]
    Warn,
    /// Treat the construct as a syntax error of the enclosing unit.
    Reject,
}

/// Parameters for a single parse.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// The language revision to parse against.
    #[serde(default)]
    pub version: LanguageVersion,
    /// Strict or lenient error handling.
    #[serde(default)]
    pub recovery: RecoveryMode,
    /// Reaction to revision-gated constructs.
    #[serde(default)]
    pub on_version_mismatch: VersionMismatchPolicy,
}

impl ParseOptions {
    /// Lenient options for `version` with the default mismatch policy.
    pub fn new(version: LanguageVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// Strict options for `version` with the default mismatch policy.
    pub fn strict(version: LanguageVersion) -> Self {
        Self {
            version,
            recovery: RecoveryMode::Strict,
            ..Self::default()
        }
    }

    /// Returns a copy with the given recovery mode.
    pub fn with_recovery(mut self, recovery: RecoveryMode) -> Self {
        self.recovery = recovery;
        self
    }

    /// Returns a copy with the given version-mismatch policy.
    pub fn with_mismatch_policy(mut self, policy: VersionMismatchPolicy) -> Self {
        self.on_version_mismatch = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ParseOptions::default();
        assert_eq!(opts.version, LanguageVersion::Vhdl2008);
        assert_eq!(opts.recovery, RecoveryMode::Lenient);
        assert_eq!(opts.on_version_mismatch, VersionMismatchPolicy::Warn);
    }

    #[test]
    fn builders() {
        let opts = ParseOptions::strict(LanguageVersion::Vhdl1993)
            .with_mismatch_policy(VersionMismatchPolicy::Reject);
        assert_eq!(opts.recovery, RecoveryMode::Strict);
        assert_eq!(opts.on_version_mismatch, VersionMismatchPolicy::Reject);
        assert_eq!(
            opts.with_recovery(RecoveryMode::Lenient).recovery,
            RecoveryMode::Lenient
        );
    }

    #[test]
    fn serde_lowercase_names() {
        let json = serde_json::to_string(&ParseOptions::new(LanguageVersion::Vhdl2019)).unwrap();
        assert!(json.contains("\"lenient\""));
        assert!(json.contains("\"warn\""));
        assert!(json.contains("\"vhdl-2019\""));
        let back: ParseOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, LanguageVersion::Vhdl2019);
    }
}
