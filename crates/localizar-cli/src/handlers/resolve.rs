//! Resolve command handler

use std::io::Write;

use localizar::{Locator, ResolvedSelector, StrategyKind};
use serde::Serialize;

use crate::commands::ResolveArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::error::CliResult;
use crate::output::{render_json, Reporter};

/// A resolved selector together with its DOM query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocator {
    /// Descriptor path
    pub element: String,
    /// Strategy kind
    pub kind: StrategyKind,
    /// Selector expression
    pub expression: String,
    /// JavaScript query, `None` for image selectors
    pub query: Option<String>,
}

impl ResolvedLocator {
    fn new(element: &str, resolved: &ResolvedSelector<'_>) -> Self {
        let locator = Locator::new(element, resolved);
        Self {
            element: element.to_string(),
            kind: resolved.kind,
            expression: resolved.expression.to_string(),
            query: locator.to_query(),
        }
    }
}

/// Execute the resolve command
pub fn execute_resolve(
    config: &CliConfig,
    reporter: &Reporter,
    args: &ResolveArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let store = super::open_store(config, reporter, &args.repo)?;
    let descriptor = store.get(&args.element)?;
    let path = descriptor.path();

    let resolved: Vec<ResolvedLocator> = if args.all {
        descriptor
            .candidates()
            .map(|candidate| ResolvedLocator::new(&path, &candidate))
            .collect()
    } else {
        vec![ResolvedLocator::new(&path, &store.resolve(descriptor)?)]
    };

    match config.format {
        OutputFormat::Json if args.all => writeln!(out, "{}", render_json(&resolved)?)?,
        OutputFormat::Json => {
            if let Some(first) = resolved.first() {
                writeln!(out, "{}", render_json(first)?)?;
            }
        }
        OutputFormat::Text => {
            for locator in &resolved {
                writeln!(out, "{} {}", locator.kind, locator.expression)?;
                if let Some(query) = &locator.query {
                    writeln!(out, "  {query}")?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::handlers::fixtures;

    fn resolve(config: &CliConfig, element: &str, all: bool) -> String {
        let dir = fixtures::repository();
        let args = ResolveArgs {
            repo: dir.path().to_path_buf(),
            element: element.to_string(),
            all,
        };
        let mut out = Vec::new();
        execute_resolve(config, &Reporter::new(false, true), &args, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_resolve_selected_strategy() {
        let text = resolve(&CliConfig::default(), "Page_Home/navigation_menu", false);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("XPATH //header//nav[contains(@class,'navbar')]")
        );
        assert!(lines.next().unwrap().contains("document.evaluate"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_resolve_default_order_prefers_css() {
        let text = resolve(&CliConfig::default(), "Page_Home/search_box", false);
        assert!(text.starts_with("CSS input[placeholder='Search...']\n"));
        assert!(text.contains("document.querySelector"));
    }

    #[test]
    fn test_resolve_all_json() {
        let config = CliConfig::default().with_format(OutputFormat::Json);
        let text = resolve(&config, "Page_Home/search_box", true);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let kinds: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["kind"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, ["CSS", "BASIC"]);
        assert_eq!(json[0]["element"], "Page_Home/search_box");
    }

    #[test]
    fn test_resolve_single_json_object() {
        let config = CliConfig::default().with_format(OutputFormat::Json);
        let text = resolve(&config, "Page_Home/navigation_menu", false);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["kind"], "XPATH");
        assert_eq!(json["expression"], "//header//nav[contains(@class,'navbar')]");
    }
}
