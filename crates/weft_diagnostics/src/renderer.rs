//! Rendering of diagnostics for terminal output.

use crate::diagnostic::Diagnostic;
use std::fmt::Write;

/// A renderer converting diagnostics into display strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic.
    fn render(&self, diag: &Diagnostic) -> String;

    /// Renders a batch of diagnostics separated by blank lines.
    fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags
            .iter()
            .map(|d| self.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Plain-text renderer suitable for logs and terminals.
///
/// Output format:
///
/// ```text
/// error[R101]: failed to route connection
///   net: clk_div
///   pin: SLICE_X4Y2/A1
///   at: INT_X3Y3/EE2_W_BEG0
///   = note: 3 candidate wires were owned by other nets
/// ```
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}[{}]: {}", diag.severity, diag.code, diag.message);
        if let Some(net) = &diag.net {
            let _ = writeln!(out, "  net: {net}");
        }
        if let Some(pin) = &diag.pin {
            let _ = writeln!(out, "  pin: {pin}");
        }
        if let Some(resource) = &diag.resource {
            let _ = writeln!(out, "  at: {resource}");
        }
        for note in &diag.notes {
            let _ = writeln!(out, "  = note: {note}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn renders_bare_error() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Routing, 101),
            "failed to route connection",
        );
        let rendered = TerminalRenderer::new().render(&diag);
        assert_eq!(rendered, "error[R101]: failed to route connection\n");
    }

    #[test]
    fn renders_context_lines() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Routing, 102),
            "node budget exhausted",
        )
        .with_net("clk_div")
        .with_pin("SLICE_X4Y2/A1")
        .with_resource("INT_X3Y3/EE2_W_BEG0")
        .with_note("increase node_budget in the router settings");
        let rendered = TerminalRenderer::new().render(&diag);
        assert!(rendered.contains("error[R102]: node budget exhausted"));
        assert!(rendered.contains("  net: clk_div"));
        assert!(rendered.contains("  pin: SLICE_X4Y2/A1"));
        assert!(rendered.contains("  at: INT_X3Y3/EE2_W_BEG0"));
        assert!(rendered.contains("  = note: increase node_budget"));
    }

    #[test]
    fn renders_batch() {
        let a = Diagnostic::warning(DiagnosticCode::new(Category::Warning, 201), "first");
        let b = Diagnostic::warning(DiagnosticCode::new(Category::Warning, 202), "second");
        let rendered = TerminalRenderer::new().render_all(&[a, b]);
        assert!(rendered.contains("warning[W201]: first"));
        assert!(rendered.contains("warning[W202]: second"));
    }
}
