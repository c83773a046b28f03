//! Version-aware Verilog and SystemVerilog module recognizer.
//!
//! Extracts each module's name, parameters and ports (with comment-driven
//! grouping) and skips everything else: module bodies, and SystemVerilog
//! packages, interfaces, classes and other top-level blocks.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): bytes to tokens, with case-sensitive reserved
//!   words chosen by revision. Comments, blank lines and compiler
//!   directives stay in the stream as trivia.
//! - **Parser**: a recursive-descent recognizer for module headers. Each
//!   module is parsed under a guard, so a syntax error drops only that
//!   module.

#![warn(missing_docs)]

pub mod lexer;
mod module;
mod parser;
pub mod token;

#[cfg(test)]
mod test_util;

pub use lexer::{lex, LexError, LexOutput};
pub use token::{Token, VerilogToken};

use hdlio_ast::DesignUnit;
use hdlio_common::{HdlResult, InternalError, LanguageFamily, ParseOptions};
use hdlio_diagnostics::DiagnosticSink;
use hdlio_source::{FileId, SourceDb};
use std::path::Path;

/// Parses a file already loaded into `source_db`.
pub fn parse_file(
    file_id: FileId,
    source_db: &SourceDb,
    options: &ParseOptions,
    sink: &DiagnosticSink,
) -> HdlResult<Vec<DesignUnit>> {
    let file = source_db
        .get_file(file_id)
        .ok_or_else(|| InternalError::new(format!("no source file with id {}", file_id.as_raw())))?;
    parse_source(&file.content, file_id, &file.path, options, sink)
}

/// Parses Verilog or SystemVerilog text not registered in a [`SourceDb`].
///
/// Every returned unit is a [`DesignUnitKind::Module`](hdlio_ast::DesignUnitKind::Module).
pub fn parse_source(
    text: &str,
    file: FileId,
    path: &Path,
    options: &ParseOptions,
    sink: &DiagnosticSink,
) -> HdlResult<Vec<DesignUnit>> {
    if options.version.family() == LanguageFamily::Vhdl {
        return Err(InternalError::new(format!(
            "Verilog parser invoked with {}",
            options.version
        )));
    }
    let lexed = lex(text, file, options.version);
    let mut parser = parser::VerilogParser::new(lexed, text, path, *options, sink);
    let units = parser.parse_source_file()?;
    tracing::debug!(
        path = %path.display(),
        version = %options.version,
        modules = units.len(),
        "parsed Verilog source"
    );
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdlio_ast::{PortDirection, UnitKind};
    use hdlio_common::LanguageVersion;

    const UART_TX: &str = "`timescale 1ns / 1ps

// Serial transmitter
module uart_tx #(
    parameter CLKS_PER_BIT = 87
) (
    // System
    input  wire       clk,
    input  wire       rst,

    // Byte interface
    input  wire [7:0] data,
    input  wire       valid,
    output reg        ready,

    // Line
    output reg        tx
);
  localparam IDLE = 2'b00;
  reg [1:0] state;
  always @(posedge clk) begin
    if (rst) state <= IDLE;
  end
endmodule
";

    #[test]
    fn parse_file_from_source_db() {
        let mut db = SourceDb::new();
        let id = db.add_source("uart_tx.v", UART_TX.to_string());
        let sink = DiagnosticSink::new();
        let options = ParseOptions::new(LanguageVersion::Verilog2005);
        let units = parse_file(id, &db, &options, &sink).unwrap();
        assert!(sink.diagnostics().is_empty(), "{:?}", sink.diagnostics());

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].unit_kind(), UnitKind::Module);
        assert_eq!(units[0].location.line, 4);

        let m = units[0].as_entity().unwrap();
        assert_eq!(m.generics()[0].name, "CLKS_PER_BIT");
        assert_eq!(m.generics()[0].default_value.as_deref(), Some("87"));
        assert_eq!(m.port("data").unwrap().type_text(), "wire [7:0]");
        assert_eq!(m.port("tx").unwrap().direction, PortDirection::Out);

        let groups: Vec<_> = m
            .grouped_ports()
            .map(|g| (g.name, g.ports.len()))
            .collect();
        assert_eq!(
            groups,
            vec![(Some("System"), 2), (Some("Byte interface"), 3), (Some("Line"), 1)]
        );
    }

    #[test]
    fn vhdl_version_is_rejected() {
        let sink = DiagnosticSink::new();
        let err = parse_source(
            "module m; endmodule",
            FileId::from_raw(0),
            Path::new("m.v"),
            &ParseOptions::default(),
            &sink,
        )
        .unwrap_err();
        assert!(err.message.contains("vhdl-2008"));
    }

    #[test]
    fn unknown_file_id_is_internal_error() {
        let db = SourceDb::new();
        let sink = DiagnosticSink::new();
        let options = ParseOptions::new(LanguageVersion::Verilog2001);
        assert!(parse_file(FileId::from_raw(9), &db, &options, &sink).is_err());
    }

    #[test]
    fn same_module_under_every_revision() {
        let src = "module m (a, y); input a; output y; assign y = a; endmodule";
        for version in LanguageVersion::ALL
            .into_iter()
            .filter(|v| v.family() != LanguageFamily::Vhdl)
        {
            let sink = DiagnosticSink::new();
            let units = parse_source(
                src,
                FileId::from_raw(0),
                Path::new("m.v"),
                &ParseOptions::new(version),
                &sink,
            )
            .unwrap();
            assert_eq!(units.len(), 1, "{version}");
            assert!(sink.diagnostics().is_empty(), "{version}");
        }
    }
}
