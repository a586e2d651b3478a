//! Output formatting and status reporting

use console::{Style, Term};
use serde::Serialize;

use crate::error::CliResult;

/// Status reporter writing to stderr; command results go to stdout.
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(&self.prefix("✓", "OK", Style::new().green()), message);
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // printed even in quiet mode
        self.line(&self.prefix("✗", "FAIL", Style::new().red()), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(&self.prefix("⚠", "WARN", Style::new().yellow()), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(&self.prefix("ℹ", "INFO", Style::new().blue()), message);
    }

    /// Print the load summary line
    pub fn summary(&self, loaded: usize, rejected: usize) {
        if self.quiet && rejected == 0 {
            return;
        }

        let status = if rejected > 0 { "INVALID" } else { "VALID" };
        let line = if self.use_color {
            let status_style = if rejected > 0 {
                Style::new().red().bold()
            } else {
                Style::new().green().bold()
            };
            format!(
                "{} {loaded} element(s) loaded, {} rejected",
                status_style.apply_to(status),
                if rejected > 0 {
                    Style::new().red().apply_to(rejected).to_string()
                } else {
                    rejected.to_string()
                }
            )
        } else {
            format!("{status} {loaded} element(s) loaded, {rejected} rejected")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&line);
    }

    fn prefix(&self, symbol: &str, plain: &str, color: Style) -> String {
        if self.use_color {
            color.bold().apply_to(symbol).to_string()
        } else {
            plain.to_string()
        }
    }

    fn line(&self, prefix: &str, message: &str) {
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }
}

/// Pretty-printed JSON for a command result
///
/// # Errors
/// Returns [`crate::CliError::Json`] if the value cannot be serialized.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
