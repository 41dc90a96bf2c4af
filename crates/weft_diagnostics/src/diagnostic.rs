//! Structured diagnostic messages with severity, codes, and routing context.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message with optional net and pin context.
///
/// Diagnostics are the primary mechanism for reporting routing failures,
/// deferred connections, and device-model oddities. Each diagnostic includes:
/// - A severity level and unique code
/// - A primary message
/// - Optional net name, sink pin, and resolved resource ("TILE/WIRE") context
/// - Explanatory notes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The net this diagnostic concerns, if any.
    pub net: Option<String>,
    /// The sink pin this diagnostic concerns, if any.
    pub pin: Option<String>,
    /// The resolved resource (`TILE/WIRE`) the failure was observed at.
    pub resource: Option<String>,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code and message.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            net: None,
            pin: None,
            resource: None,
            notes: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic with the given code and message.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            net: None,
            pin: None,
            resource: None,
            notes: Vec::new(),
        }
    }

    /// Attaches the net name this diagnostic concerns.
    pub fn with_net(mut self, net: impl Into<String>) -> Self {
        self.net = Some(net.into());
        self
    }

    /// Attaches the sink pin name this diagnostic concerns.
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }

    /// Attaches the resolved `TILE/WIRE` resource the failure was observed at.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Routing, 101);
        let diag = Diagnostic::error(code, "failed to route connection");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "failed to route connection");
        assert_eq!(format!("{}", diag.code), "R101");
    }

    #[test]
    fn create_warning() {
        let code = DiagnosticCode::new(Category::Warning, 201);
        let diag = Diagnostic::warning(code, "connection deferred to rip-up");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.message, "connection deferred to rip-up");
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Routing, 101);
        let diag = Diagnostic::error(code, "failed to route connection")
            .with_net("cpu/alu/result[3]")
            .with_pin("A3")
            .with_resource("INT_X4Y7/IMUX_E12")
            .with_note("node budget exhausted after 100000 expansions");
        assert_eq!(diag.net.as_deref(), Some("cpu/alu/result[3]"));
        assert_eq!(diag.pin.as_deref(), Some("A3"));
        assert_eq!(diag.resource.as_deref(), Some("INT_X4Y7/IMUX_E12"));
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Clock, 1);
        let diag = Diagnostic::error(code, "no distribution track").with_net("clk");
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, diag.message);
        assert_eq!(back.net, diag.net);
    }
}
