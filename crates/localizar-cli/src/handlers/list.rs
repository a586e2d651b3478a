//! List command handler

use std::io::Write;

use crate::commands::ListArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::{render_json, Reporter};

/// Execute the list command
pub fn execute_list(
    config: &CliConfig,
    reporter: &Reporter,
    args: &ListArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let store = super::open_store(config, reporter, &args.repo)?;

    let paths: Vec<String> = match &args.scope {
        Some(scope) => {
            let page = store.page(scope).ok_or_else(|| {
                CliError::invalid_argument(format!("no elements in scope '{scope}'"))
            })?;
            page.names()
                .into_iter()
                .filter_map(|name| page.descriptor(name))
                .map(localizar::ElementDescriptor::path)
                .collect()
        }
        None => store.iter().map(localizar::ElementDescriptor::path).collect(),
    };

    match config.format {
        OutputFormat::Json => writeln!(out, "{}", render_json(&paths)?)?,
        OutputFormat::Text => {
            for path in &paths {
                writeln!(out, "{path}")?;
            }
        }
    }
    Ok(())
}
