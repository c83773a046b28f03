//! Language revision tags and dialect families.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dialect family a language revision belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum LanguageFamily {
    /// VHDL (IEEE 1076).
    Vhdl,
    /// Verilog (IEEE 1364).
    Verilog,
    /// SystemVerilog (IEEE 1800).
    SystemVerilog,
}

impl fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageFamily::Vhdl => write!(f, "VHDL"),
            LanguageFamily::Verilog => write!(f, "Verilog"),
            LanguageFamily::SystemVerilog => write!(f, "SystemVerilog"),
        }
    }
}

/// A language revision selected at parse time.
///
/// Variants are declared oldest first within each family, so the derived
/// ordering compares revisions of the same family chronologically.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageVersion {
    /// IEEE 1076-1993.
    Vhdl1993,
    /// IEEE 1076-2000.
    Vhdl2000,
    /// IEEE 1076-2008.
    #[default]
    Vhdl2008,
    /// IEEE 1076-2019.
    Vhdl2019,
    /// IEEE 1364-1995.
    Verilog1995,
    /// IEEE 1364-2001.
    Verilog2001,
    /// IEEE 1364-2005.
    Verilog2005,
    /// IEEE 1800-2005.
    SystemVerilog2005,
    /// IEEE 1800-2009.
    SystemVerilog2009,
    /// IEEE 1800-2012.
    SystemVerilog2012,
    /// IEEE 1800-2017.
    SystemVerilog2017,
}

impl LanguageVersion {
    /// Every supported revision, oldest first within each family.
    pub const ALL: [LanguageVersion; 11] = [
        LanguageVersion::Vhdl1993,
        LanguageVersion::Vhdl2000,
        LanguageVersion::Vhdl2008,
        LanguageVersion::Vhdl2019,
        LanguageVersion::Verilog1995,
        LanguageVersion::Verilog2001,
        LanguageVersion::Verilog2005,
        LanguageVersion::SystemVerilog2005,
        LanguageVersion::SystemVerilog2009,
        LanguageVersion::SystemVerilog2012,
        LanguageVersion::SystemVerilog2017,
    ];

    /// The VHDL revisions only.
    pub const VHDL: [LanguageVersion; 4] = [
        LanguageVersion::Vhdl1993,
        LanguageVersion::Vhdl2000,
        LanguageVersion::Vhdl2008,
        LanguageVersion::Vhdl2019,
    ];

    /// Returns the dialect family of this revision.
    pub fn family(self) -> LanguageFamily {
        use LanguageVersion::*;
        match self {
            Vhdl1993 | Vhdl2000 | Vhdl2008 | Vhdl2019 => LanguageFamily::Vhdl,
            Verilog1995 | Verilog2001 | Verilog2005 => LanguageFamily::Verilog,
            SystemVerilog2005 | SystemVerilog2009 | SystemVerilog2012 | SystemVerilog2017 => {
                LanguageFamily::SystemVerilog
            }
        }
    }

    /// Returns the four-digit year of the standard revision.
    pub fn year(self) -> u16 {
        use LanguageVersion::*;
        match self {
            Vhdl1993 => 1993,
            Vhdl2000 => 2000,
            Vhdl2008 => 2008,
            Vhdl2019 => 2019,
            Verilog1995 => 1995,
            Verilog2001 => 2001,
            Verilog2005 | SystemVerilog2005 => 2005,
            SystemVerilog2009 => 2009,
            SystemVerilog2012 => 2012,
            SystemVerilog2017 => 2017,
        }
    }

    /// Returns `true` if `self` is the same family as `other` and not older.
    pub fn at_least(self, other: LanguageVersion) -> bool {
        self.family() == other.family() && self >= other
    }

    /// Looks up the revision of `family` published in `year`.
    pub fn from_family_year(family: LanguageFamily, year: u16) -> Option<LanguageVersion> {
        LanguageVersion::ALL
            .into_iter()
            .find(|v| v.family() == family && v.year() == year)
    }

    /// The canonical textual form, e.g. `vhdl-2008`.
    pub fn as_str(self) -> &'static str {
        use LanguageVersion::*;
        match self {
            Vhdl1993 => "vhdl-1993",
            Vhdl2000 => "vhdl-2000",
            Vhdl2008 => "vhdl-2008",
            Vhdl2019 => "vhdl-2019",
            Verilog1995 => "verilog-1995",
            Verilog2001 => "verilog-2001",
            Verilog2005 => "verilog-2005",
            SystemVerilog2005 => "systemverilog-2005",
            SystemVerilog2009 => "systemverilog-2009",
            SystemVerilog2012 => "systemverilog-2012",
            SystemVerilog2017 => "systemverilog-2017",
        }
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a revision name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language version '{input}'")]
pub struct ParseVersionError {
    /// The text that failed to parse.
    pub input: String,
}

impl FromStr for LanguageVersion {
    type Err = ParseVersionError;

    /// Accepts `vhdl-2008`, `VHDL_2008`, `2008`, `08`, `verilog-2005`,
    /// `sv2017` and similar spellings. A bare year selects VHDL.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError {
            input: s.to_string(),
        };
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let (family, digits) = if let Some(rest) = normalized.strip_prefix("systemverilog") {
            (LanguageFamily::SystemVerilog, rest)
        } else if let Some(rest) = normalized.strip_prefix("sv") {
            (LanguageFamily::SystemVerilog, rest)
        } else if let Some(rest) = normalized.strip_prefix("verilog") {
            (LanguageFamily::Verilog, rest)
        } else if let Some(rest) = normalized.strip_prefix("vhdl") {
            (LanguageFamily::Vhdl, rest)
        } else if let Some(rest) = normalized.strip_prefix('v') {
            (LanguageFamily::Verilog, rest)
        } else {
            (LanguageFamily::Vhdl, normalized.as_str())
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let year: u16 = digits.parse().map_err(|_| err())?;
        let year = match (digits.len(), year) {
            (2, y) if y >= 90 => 1900 + y,
            (2, y) => 2000 + y,
            (4, y) => y,
            _ => return Err(err()),
        };
        LanguageVersion::from_family_year(family, year).ok_or_else(err)
    }
}

impl TryFrom<String> for LanguageVersion {
    type Error = ParseVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageVersion> for String {
    fn from(value: LanguageVersion) -> Self {
        value.as_str().to_string()
    }
}
