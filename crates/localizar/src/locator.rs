//! DOM query rendering for resolved selectors.
//!
//! The store never talks to a browser. A driver takes a [`Locator`] and
//! evaluates its query expression in the page; this module only builds the
//! JavaScript for it.

use serde::{Deserialize, Serialize};

use crate::descriptor::ResolvedSelector;
use crate::strategy::StrategyKind;

/// Engine a selector expression is evaluated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "engine", content = "expression", rename_all = "snake_case")]
pub enum Selector {
    /// CSS selector (e.g., "nav.navbar")
    Css(String),
    /// XPath expression
    XPath(String),
    /// Image path, matched visually rather than through the DOM
    Image(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Choose the engine for a resolved selector.
    ///
    /// BASIC expressions are generated either as XPath or as CSS; an
    /// expression starting with `/` or `(` is treated as XPath.
    #[must_use]
    pub fn from_resolution(resolved: &ResolvedSelector<'_>) -> Self {
        let expression = resolved.expression.to_string();
        match resolved.kind {
            StrategyKind::Css => Self::Css(expression),
            StrategyKind::XPath => Self::XPath(expression),
            StrategyKind::Basic if looks_like_xpath(&expression) => Self::XPath(expression),
            StrategyKind::Basic => Self::Css(expression),
            StrategyKind::Image => Self::Image(expression),
        }
    }

    /// The raw expression
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) | Self::Image(s) => s,
        }
    }

    /// JavaScript expression returning the first match, or `None` for
    /// image selectors
    #[must_use]
    pub fn to_query(&self) -> Option<String> {
        match self {
            Self::Css(s) => Some(format!("document.querySelector({s:?})")),
            Self::XPath(s) => Some(format!(
                "document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
            )),
            Self::Image(_) => None,
        }
    }

    /// JavaScript expression returning the match count, or `None` for
    /// image selectors
    #[must_use]
    pub fn to_count_query(&self) -> Option<String> {
        match self {
            Self::Css(s) => Some(format!("document.querySelectorAll({s:?}).length")),
            Self::XPath(s) => Some(format!(
                "document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength"
            )),
            Self::Image(_) => None,
        }
    }
}

fn looks_like_xpath(expression: &str) -> bool {
    let trimmed = expression.trim_start();
    trimmed.starts_with('/') || trimmed.starts_with('(')
}

/// A selector bound to the element it was resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// Descriptor path the selector came from
    pub element: String,
    /// Strategy kind as declared in the record
    pub kind: StrategyKind,
    /// Engine-level selector
    pub selector: Selector,
}

impl Locator {
    /// Build a locator for `element` from a resolved selector
    #[must_use]
    pub fn new(element: impl Into<String>, resolved: &ResolvedSelector<'_>) -> Self {
        Self {
            element: element.into(),
            kind: resolved.kind,
            selector: Selector::from_resolution(resolved),
        }
    }

    /// See [`Selector::to_query`]
    #[must_use]
    pub fn to_query(&self) -> Option<String> {
        self.selector.to_query()
    }

    /// See [`Selector::to_count_query`]
    #[must_use]
    pub fn to_count_query(&self) -> Option<String> {
        self.selector.to_count_query()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn resolved(kind: StrategyKind, expression: &str) -> ResolvedSelector<'_> {
        ResolvedSelector { kind, expression }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let selector = Selector::css("nav.navbar");
            assert_eq!(
                selector.to_query().unwrap(),
                "document.querySelector(\"nav.navbar\")"
            );
            assert!(selector.to_count_query().unwrap().contains("querySelectorAll"));
        }

        #[test]
        fn test_xpath_query() {
            let selector = Selector::xpath("//button[@id='test']");
            let query = selector.to_query().unwrap();
            assert!(query.contains("evaluate"));
            assert!(query.contains("FIRST_ORDERED_NODE_TYPE"));
            assert!(query.contains("//button[@id='test']"));
        }

        #[test]
        fn test_xpath_count_query() {
            let query = Selector::xpath("//li").to_count_query().unwrap();
            assert!(query.contains("SNAPSHOT"));
            assert!(query.contains("snapshotLength"));
        }

        #[test]
        fn test_image_has_no_query() {
            let selector = Selector::Image("img/logo.png".to_string());
            assert!(selector.to_query().is_none());
            assert!(selector.to_count_query().is_none());
            assert_eq!(selector.expression(), "img/logo.png");
        }

        #[test]
        fn test_query_escapes_quotes() {
            let query = Selector::css("a[title=\"x\"]").to_query().unwrap();
            assert_eq!(query, r#"document.querySelector("a[title=\"x\"]")"#);
        }
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_css_and_xpath_map_directly() {
            assert_eq!(
                Selector::from_resolution(&resolved(StrategyKind::Css, "nav")),
                Selector::css("nav")
            );
            assert_eq!(
                Selector::from_resolution(&resolved(StrategyKind::XPath, "//nav")),
                Selector::xpath("//nav")
            );
        }

        #[test]
        fn test_basic_xpath_form() {
            let selector = Selector::from_resolution(&resolved(
                StrategyKind::Basic,
                "//input[@type='search' or @placeholder='Search']",
            ));
            assert!(matches!(selector, Selector::XPath(_)));
        }

        #[test]
        fn test_basic_parenthesized_xpath() {
            let selector =
                Selector::from_resolution(&resolved(StrategyKind::Basic, "(//li)[2]"));
            assert!(matches!(selector, Selector::XPath(_)));
        }

        #[test]
        fn test_basic_css_form() {
            let selector =
                Selector::from_resolution(&resolved(StrategyKind::Basic, "input.search"));
            assert_eq!(selector, Selector::css("input.search"));
        }

        #[test]
        fn test_locator_keeps_declared_kind() {
            let locator = Locator::new(
                "Page_Home/search_box",
                &resolved(StrategyKind::Basic, "//input"),
            );
            assert_eq!(locator.kind, StrategyKind::Basic);
            assert_eq!(locator.selector, Selector::xpath("//input"));
            assert!(locator.to_query().unwrap().contains("document.evaluate"));
        }

        #[test]
        fn test_locator_serializes_engine() {
            let locator = Locator::new("menu", &resolved(StrategyKind::Css, "nav"));
            let json = serde_json::to_value(&locator).unwrap();
            assert_eq!(json["kind"], "CSS");
            assert_eq!(json["selector"]["engine"], "css");
            assert_eq!(json["selector"]["expression"], "nav");
        }
    }
}
