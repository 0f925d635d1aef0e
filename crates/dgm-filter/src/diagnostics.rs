//! Diagnostic output for render failures.

use std::io::Write;

use console::{Style, Term};

/// Receives one message per failed render.
pub trait DiagnosticSink {
    fn report(&self, message: &str);
}

/// Writes failure messages to stderr, in red when attached to a terminal.
pub struct StderrSink {
    term: Term,
    red: Style,
}

impl StderrSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            red: Style::new().red().for_stderr(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for StderrSink {
    fn report(&self, message: &str) {
        write_report(&mut &self.term, &self.red, message);
    }
}

/// Write one styled line, logging instead of failing when `out` is closed.
///
/// Returns whether the line was written.
fn write_report(out: &mut impl Write, style: &Style, message: &str) -> bool {
    match writeln!(out, "{}", style.apply_to(message)) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, %message, "failed to write diagnostic");
            false
        }
    }
}
