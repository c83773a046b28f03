//! The same text under every revision, and the version-mismatch policy.

use hdlio::{LanguageVersion, ParseOptions, Severity, VersionMismatchPolicy};
use hdlio_conformance::pipeline_with;

const MINIMAL: &str = "
library ieee;
use ieee.std_logic_1164.all;

entity minimal is
  generic (N : integer := 4);
  port (clk : in std_logic; q : out std_logic_vector(N-1 downto 0));
end entity minimal;

architecture rtl of minimal is
begin
end architecture rtl;
";

#[test]
fn every_vhdl_revision_agrees() {
    let counts: Vec<_> = LanguageVersion::VHDL
        .iter()
        .map(|&version| {
            let result = pipeline_with(MINIMAL, ParseOptions::new(version));
            assert!(result.diagnostics().is_empty(), "{version}: {:?}", result.diagnostics());
            let entity = result.entity("minimal");
            (
                result.result.units.len(),
                entity.ports().len(),
                entity.generics().len(),
            )
        })
        .collect();
    assert_eq!(counts.len(), 4);
    assert!(counts.iter().all(|c| *c == (2, 2, 1)), "{counts:?}");
}

#[test]
fn every_verilog_revision_agrees() {
    let src = "module m #(parameter W = 8) (input clk, output [W-1:0] q); endmodule";
    for version in LanguageVersion::ALL {
        if version.family() == hdlio::LanguageFamily::Vhdl {
            continue;
        }
        let options = ParseOptions::new(version);
        let result = pipeline_with(src, options);
        if version == LanguageVersion::Verilog1995 {
            // ANSI headers arrived with Verilog-2001
            assert_eq!(result.warning_count, 2, "{version}");
        } else {
            assert!(result.diagnostics().is_empty(), "{version}");
        }
        let entity = result.entity("m");
        assert_eq!((entity.ports().len(), entity.generics().len()), (2, 1));
    }
}

#[test]
fn gated_construct_warns_by_default() {
    let src = "entity e is generic (type T); end;\nentity f is end;";
    let result = pipeline_with(src, ParseOptions::new(LanguageVersion::Vhdl1993));
    assert_eq!(result.unit_names(), vec!["e", "f"]);
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.diagnostics()[0].severity, Severity::Warning);

    let result = pipeline_with(src, ParseOptions::new(LanguageVersion::Vhdl2008));
    assert!(result.diagnostics().is_empty());
}

#[test]
fn gated_construct_rejected_on_request() {
    let src = "entity e is generic (type T); end;\nentity f is end;";
    let options = ParseOptions::new(LanguageVersion::Vhdl1993)
        .with_mismatch_policy(VersionMismatchPolicy::Reject);
    let result = pipeline_with(src, options);
    assert_eq!(result.unit_names(), vec!["f"]);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.diagnostics()[0].unit_context.name(), "e");
}

#[test]
fn protected_type_follows_the_policy_before_2000() {
    let src = "package p is
                 type sv_t is protected
                   procedure bump;
                 end protected;
               end package p;
               entity after is end;";
    let result = pipeline_with(src, ParseOptions::new(LanguageVersion::Vhdl1993));
    assert_eq!(result.unit_names(), vec!["p", "after"]);
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.diagnostics()[0].code.to_string(), "W101");

    let options = ParseOptions::new(LanguageVersion::Vhdl1993)
        .with_mismatch_policy(VersionMismatchPolicy::Reject);
    let result = pipeline_with(src, options);
    assert_eq!(result.unit_names(), vec!["after"]);
    assert_eq!(result.error_count, 1);

    let result = pipeline_with(src, ParseOptions::new(LanguageVersion::Vhdl2000));
    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
}

#[test]
fn context_reference_follows_the_policy_before_2008() {
    let src = "context work.ctx;\nentity e is end;";
    let result = pipeline_with(src, ParseOptions::new(LanguageVersion::Vhdl1993));
    assert_eq!(result.unit_names(), vec!["e"]);
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.error_count, 0);

    let options = ParseOptions::new(LanguageVersion::Vhdl1993)
        .with_mismatch_policy(VersionMismatchPolicy::Reject);
    let result = pipeline_with(src, options);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.diagnostics()[0].code.to_string(), "E103");
    assert_eq!(result.diagnostics()[0].unit_context.name(), "file-level");

    let result = pipeline_with(src, ParseOptions::new(LanguageVersion::Vhdl2008));
    assert!(result.diagnostics().is_empty());
}
