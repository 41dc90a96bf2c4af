//! Diagnostic creation, severity management, and rendering for the router.
//!
//! This crate provides structured [`Diagnostic`] messages with severity
//! levels, error codes, and net/pin context. The thread-safe
//! [`DiagnosticSink`] accumulates diagnostics during a routing run, and
//! [`DiagnosticRenderer`] implementations format them for terminal output.
//!
//! Soft routing failures (an unroutable connection, a watchdog that fired)
//! are reported here rather than as `Err` values, so a run can continue past
//! them and summarize at the end.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
