//! Match command handler

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::commands::MatchArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::error::CliResult;
use crate::output::{render_json, Reporter};

/// Result of evaluating an element's attribute rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    /// Descriptor path
    pub element: String,
    /// Whether the candidate attributes satisfy the rules
    pub matched: bool,
    /// Number of enabled rules that took part
    pub rules: usize,
}

/// Execute the match command. Returns whether the attributes matched.
pub fn execute_match(
    config: &CliConfig,
    reporter: &Reporter,
    args: &MatchArgs,
    out: &mut dyn Write,
) -> CliResult<bool> {
    let store = super::open_store(config, reporter, &args.repo)?;
    let descriptor = store.get(&args.element)?;

    // later occurrences of the same attribute win
    let attributes: HashMap<String, String> = args.attrs.iter().cloned().collect();
    let outcome = MatchOutcome {
        element: descriptor.path(),
        matched: store.matches_attributes(descriptor, &attributes),
        rules: descriptor
            .attribute_rules()
            .iter()
            .filter(|rule| rule.enabled)
            .count(),
    };

    match config.format {
        OutputFormat::Json => writeln!(out, "{}", render_json(&outcome)?)?,
        OutputFormat::Text => {
            let verdict = if outcome.matched { "match" } else { "no match" };
            writeln!(out, "{verdict}")?;
        }
    }
    Ok(outcome.matched)
}
