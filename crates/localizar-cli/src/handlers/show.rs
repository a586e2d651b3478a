//! Show command handler

use std::io::Write;

use localizar::ElementDescriptor;

use crate::commands::ElementArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::error::CliResult;
use crate::output::{render_json, Reporter};

/// Execute the show command
pub fn execute_show(
    config: &CliConfig,
    reporter: &Reporter,
    args: &ElementArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let store = super::open_store(config, reporter, &args.repo)?;
    let descriptor = store.get(&args.element)?;

    match config.format {
        OutputFormat::Json => writeln!(out, "{}", render_json(descriptor)?)?,
        OutputFormat::Text => out.write_all(describe(descriptor).as_bytes())?,
    }
    Ok(())
}

/// Plain-text rendering of a descriptor
#[must_use]
pub fn describe(descriptor: &ElementDescriptor) -> String {
    let mut text = String::new();
    text.push_str(&format!("path:        {}\n", descriptor.path()));
    text.push_str(&format!("id:          {}\n", descriptor.id()));
    if let Some(description) = descriptor.description() {
        text.push_str(&format!("description: {description}\n"));
    }
    if let Some(tag) = descriptor.tag() {
        text.push_str(&format!("tag:         {tag}\n"));
    }
    let selected = descriptor
        .selected_strategy()
        .map_or_else(|| "(default order)".to_string(), |kind| kind.to_string());
    text.push_str(&format!("selected:    {selected}\n"));

    text.push_str("selectors:\n");
    for (kind, expression) in descriptor.selectors().iter() {
        text.push_str(&format!("  {kind:<6} {expression}\n"));
    }

    if !descriptor.attribute_rules().is_empty() {
        text.push_str("attributes:\n");
        for rule in descriptor.attribute_rules() {
            let mark = if rule.enabled { "x" } else { " " };
            text.push_str(&format!(
                "  [{mark}] {} {} '{}'\n",
                rule.attribute, rule.condition, rule.expected
            ));
        }
    }
    text
}
