//! Diagnostics produced while lexing and parsing HDL sources.
//!
//! A [`Diagnostic`] carries a severity, a stable [`DiagnosticCode`], a
//! message, the source span and 1-based location, and the [`UnitContext`]
//! naming the design unit being parsed when the problem was found. The
//! thread-safe [`DiagnosticSink`] accumulates them and [`TerminalRenderer`]
//! formats them for people.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, UnitContext};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
