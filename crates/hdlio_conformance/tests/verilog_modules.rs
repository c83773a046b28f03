//! Verilog and SystemVerilog modules through the shared model.

use hdlio::{from_string, GenericClass, LanguageVersion, PortDirection, UnitKind};
use hdlio_conformance::{assert_partition, group_summary, pipeline_sv, pipeline_verilog, port_names};

#[test]
fn ansi_module_with_groups() {
    let src = r#"
module uart_tx #(
    parameter CLKS_PER_BIT = 87,
    parameter [7:0] IDLE = 8'hFF
) (
    // System
    input  wire       clk,
    input  wire       rst_n,

    // Byte interface
    input  wire [7:0] data,
    input  wire       start,
    output reg        busy,
    // Line
    output wire       tx
);
endmodule
"#;
    let result = pipeline_verilog(src);
    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
    assert_eq!(result.result.units[0].unit_kind(), UnitKind::Module);

    let module = result.entity("uart_tx");
    assert_eq!(
        port_names(module),
        vec!["clk", "rst_n", "data", "start", "busy", "tx"]
    );
    assert_eq!(
        group_summary(module),
        vec![(Some("System"), 2), (Some("Byte interface"), 3), (Some("Line"), 1)]
    );
    assert_partition(module);

    let data = module.port("data").unwrap();
    assert_eq!(data.direction, PortDirection::In);
    assert_eq!(data.type_text(), "wire [7:0]");
    assert_eq!(module.port("busy").unwrap().direction, PortDirection::Out);

    let generics: Vec<_> = module
        .generics()
        .iter()
        .map(|g| (g.name.as_str(), g.default_value.as_deref()))
        .collect();
    assert_eq!(
        generics,
        vec![("CLKS_PER_BIT", Some("87")), ("IDLE", Some("8'hFF"))]
    );
}

#[test]
fn non_ansi_module() {
    let src = "
module adder (a, b, sum);
  parameter WIDTH = 4;
  input [WIDTH-1:0] a, b;
  output [WIDTH:0] sum;
  assign sum = a + b;
endmodule
";
    let result = pipeline_verilog(src);
    assert!(!result.has_errors);
    let module = result.entity("adder");
    assert_eq!(port_names(module), vec!["a", "b", "sum"]);
    assert_eq!(module.ports()[1].direction, PortDirection::In);
    assert_eq!(module.ports()[2].direction, PortDirection::Out);
    assert_eq!(module.generics()[0].name, "WIDTH");
    assert_eq!(group_summary(module), vec![(None, 3)]);
}

#[test]
fn systemverilog_items_around_modules_are_skipped() {
    let src = "
package cfg_pkg;
  parameter int DEPTH = 16;
endpackage

interface bus_if;
  logic valid;
endinterface

module top #(parameter type T = logic) (
  input  logic clk,
  inout  wire  sda
);
endmodule : top
";
    let result = pipeline_sv(src);
    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
    assert_eq!(result.unit_names(), vec!["top"]);
    let top = result.entity("top");
    assert_eq!(top.generics()[0].class, GenericClass::Type);
    assert_eq!(top.port("sda").unwrap().direction, PortDirection::InOut);
}

#[test]
fn broken_module_does_not_hide_the_next() {
    let src = "
module bad (input a output b);
endmodule

module good (input a, output b);
endmodule
";
    let result = pipeline_verilog(src);
    assert_eq!(result.unit_names(), vec!["good"]);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.diagnostics()[0].unit_context.name(), "bad");
}

#[test]
fn strict_verilog_conveniences() {
    let file = from_string(
        "module m (input clk); endmodule",
        LanguageVersion::SystemVerilog2012,
    )
    .unwrap();
    assert!(file.entity("m").is_some());
    assert!(from_string("module m (input clk);", LanguageVersion::Verilog2005).is_err());
}
