//! Selector strategy kinds and the default resolution order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locator technique a selector expression is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrategyKind {
    /// Combined heuristic form generated from the element's properties
    Basic,
    /// CSS selector
    Css,
    /// XPath expression
    #[serde(rename = "XPATH")]
    XPath,
    /// Image-based lookup (screenshot path)
    Image,
}

/// Kinds tried, in order, when a descriptor has no selected strategy.
///
/// Keys not listed here follow in declaration order.
pub const DEFAULT_PRIORITY: [StrategyKind; 3] =
    [StrategyKind::Css, StrategyKind::XPath, StrategyKind::Basic];

impl StrategyKind {
    /// All known kinds
    pub const ALL: [Self; 4] = [Self::Basic, Self::Css, Self::XPath, Self::Image];

    /// Key used for this kind in persisted records
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Css => "CSS",
            Self::XPath => "XPATH",
            Self::Image => "IMAGE",
        }
    }

    /// Position in [`DEFAULT_PRIORITY`], if listed
    #[must_use]
    pub fn default_rank(self) -> Option<usize> {
        DEFAULT_PRIORITY.iter().position(|k| *k == self)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error for a strategy key that names no known kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown selector strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "CSS" => Ok(Self::Css),
            "XPATH" => Ok(Self::XPath),
            "IMAGE" => Ok(Self::Image),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_keys() {
        assert_eq!("BASIC".parse::<StrategyKind>().unwrap(), StrategyKind::Basic);
        assert_eq!("CSS".parse::<StrategyKind>().unwrap(), StrategyKind::Css);
        assert_eq!("XPATH".parse::<StrategyKind>().unwrap(), StrategyKind::XPath);
        assert_eq!("IMAGE".parse::<StrategyKind>().unwrap(), StrategyKind::Image);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(" xpath ".parse::<StrategyKind>().unwrap(), StrategyKind::XPath);
        assert_eq!("Css".parse::<StrategyKind>().unwrap(), StrategyKind::Css);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "ACCESSIBILITY".parse::<StrategyKind>().unwrap_err();
        assert_eq!(err, UnknownStrategy("ACCESSIBILITY".to_string()));
    }

    #[test]
    fn test_display_round_trips_key() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_default_rank() {
        assert_eq!(StrategyKind::Css.default_rank(), Some(0));
        assert_eq!(StrategyKind::XPath.default_rank(), Some(1));
        assert_eq!(StrategyKind::Basic.default_rank(), Some(2));
        assert_eq!(StrategyKind::Image.default_rank(), None);
    }

    #[test]
    fn test_serde_uses_record_keys() {
        assert_eq!(
            serde_json::to_string(&StrategyKind::XPath).unwrap(),
            "\"XPATH\""
        );
        assert_eq!(
            serde_json::from_str::<StrategyKind>("\"BASIC\"").unwrap(),
            StrategyKind::Basic
        );
    }
}
