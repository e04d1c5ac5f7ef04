//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;

    /// Renders a batch of diagnostics, one after another.
    fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags.iter().map(|d| self.render(d)).collect()
    }
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E301]: port assignment width mismatch: port `A` has width 2, assigned signals have width 1
///   --> line 14
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let head = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return head;
        }
        let color = match diag.severity {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
            Severity::Note => "\x1b[1;36m",
        };
        format!("{color}{head}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        if let Some(line) = diag.line {
            out.push_str(&format!("  --> line {line}\n"));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_error_with_line() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let diag = Diagnostic::error(code, "width mismatch").with_line(14);

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.starts_with("error[E301]: width mismatch\n"));
        assert!(output.contains("--> line 14"));
    }

    #[test]
    fn render_warning_with_notes() {
        let code = DiagnosticCode::new(Category::Warning, 303);
        let diag = Diagnostic::warning(code, "no alias for net `q`")
            .with_note("the assignment is left unmerged")
            .with_help("declare `q` as a signal or port");

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.contains("warning[W303]: no alias for net `q`"));
        assert!(output.contains("= note: the assignment is left unmerged"));
        assert!(output.contains("= help: declare `q` as a signal or port"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn render_with_color() {
        let code = DiagnosticCode::new(Category::Error, 305);
        let diag = Diagnostic::error(code, "cyclic alias");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.contains("\x1b[1;31merror[E305]\x1b[0m"));
    }

    #[test]
    fn render_all_concatenates() {
        let code = DiagnosticCode::new(Category::Warning, 302);
        let diags = vec![
            Diagnostic::warning(code, "first"),
            Diagnostic::warning(code, "second"),
        ];
        let output = TerminalRenderer::new(false).render_all(&diags);
        assert_eq!(output.lines().count(), 2);
    }
}
