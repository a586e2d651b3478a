//! Attribute match rules.
//!
//! Rules are a secondary check run against a candidate element's runtime
//! attributes once a selector has found it. Evaluation is flat:
//!
//! 1. disabled rules are dropped (absent, neither true nor false);
//! 2. the remaining rules are grouped left to right, where a maximal run of
//!    consecutive `or` rules forms one group and every other rule is a group
//!    of its own;
//! 3. a group of `or` rules passes if any member passes, other groups pass
//!    if their single rule passes;
//! 4. the rule set passes if every group passes.
//!
//! An `and` rule therefore ends an `or` run. Nothing deeper than an AND of
//! OR-runs can be expressed.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// How a rule compares the candidate's attribute with the expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCondition {
    /// Exact equality
    Equals,
    /// Substring
    Contains,
    /// Exact equality, OR-linked with adjacent `or` rules
    Or,
    /// Exact equality, AND-linked
    And,
    /// Not equal
    NotEqual,
    /// Substring absent
    NotContain,
    /// Prefix
    StartsWith,
    /// Suffix
    EndsWith,
    /// Regex search
    MatchesRegex,
    /// Regex search fails
    NotMatchRegex,
}

impl MatchCondition {
    /// Keyword used in persisted records
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::Or => "or",
            Self::And => "and",
            Self::NotEqual => "not equal",
            Self::NotContain => "not contain",
            Self::StartsWith => "starts with",
            Self::EndsWith => "ends with",
            Self::MatchesRegex => "matches regex",
            Self::NotMatchRegex => "not match regex",
        }
    }

    /// Whether the expected value is a regular expression
    #[must_use]
    pub const fn is_regex(self) -> bool {
        matches!(self, Self::MatchesRegex | Self::NotMatchRegex)
    }
}

impl fmt::Display for MatchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MatchCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "equals" | "equal" => Ok(Self::Equals),
            "contains" => Ok(Self::Contains),
            "or" => Ok(Self::Or),
            "and" => Ok(Self::And),
            "not equal" => Ok(Self::NotEqual),
            "not contain" | "not contains" => Ok(Self::NotContain),
            "starts with" => Ok(Self::StartsWith),
            "ends with" => Ok(Self::EndsWith),
            "matches regex" => Ok(Self::MatchesRegex),
            "not match regex" => Ok(Self::NotMatchRegex),
            _ => Err(s.to_string()),
        }
    }
}

/// A single attribute rule.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeRule {
    /// Attribute to read from the candidate element
    pub attribute: String,
    /// Comparison
    pub condition: MatchCondition,
    /// Expected value (a pattern for the regex conditions)
    pub expected: String,
    /// Only enabled rules participate
    pub enabled: bool,
    /// Property type, passed through
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(skip)]
    pattern: Option<Regex>,
}

impl PartialEq for AttributeRule {
    fn eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute
            && self.condition == other.condition
            && self.expected == other.expected
            && self.enabled == other.enabled
            && self.rule_type == other.rule_type
    }
}

impl Eq for AttributeRule {}

impl AttributeRule {
    /// Build a rule, compiling the pattern for regex conditions.
    ///
    /// # Errors
    /// Returns the regex error message if the pattern does not compile.
    pub fn new(
        attribute: impl Into<String>,
        condition: MatchCondition,
        expected: impl Into<String>,
        enabled: bool,
    ) -> Result<Self, String> {
        let expected = expected.into();
        let pattern = if condition.is_regex() {
            Some(Regex::new(&expected).map_err(|e| e.to_string())?)
        } else {
            None
        };
        Ok(Self {
            attribute: attribute.into(),
            condition,
            expected,
            enabled,
            rule_type: "Main".to_string(),
            pattern,
        })
    }

    /// Set the passthrough type
    #[must_use]
    pub fn with_type(mut self, rule_type: impl Into<String>) -> Self {
        self.rule_type = rule_type.into();
        self
    }

    /// Evaluate this rule alone; a missing attribute always fails.
    #[must_use]
    pub fn test(&self, attributes: &HashMap<String, String>) -> bool {
        let Some(actual) = attributes.get(&self.attribute) else {
            return false;
        };
        let expected = self.expected.as_str();
        match self.condition {
            MatchCondition::Equals | MatchCondition::Or | MatchCondition::And => {
                actual == expected
            }
            MatchCondition::Contains => actual.contains(expected),
            MatchCondition::NotEqual => actual != expected,
            MatchCondition::NotContain => !actual.contains(expected),
            MatchCondition::StartsWith => actual.starts_with(expected),
            MatchCondition::EndsWith => actual.ends_with(expected),
            MatchCondition::MatchesRegex => self.pattern_matches(actual),
            MatchCondition::NotMatchRegex => !self.pattern_matches(actual),
        }
    }

    fn pattern_matches(&self, actual: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(actual))
    }
}

/// Evaluate a rule sequence against a candidate's attributes.
#[must_use]
pub fn evaluate(rules: &[AttributeRule], attributes: &HashMap<String, String>) -> bool {
    groups(rules)
        .iter()
        .all(|group| group.iter().any(|rule| rule.test(attributes)))
}

/// Enabled rules split into AND-linked groups of OR-linked members.
#[must_use]
pub fn groups(rules: &[AttributeRule]) -> Vec<Vec<&AttributeRule>> {
    let mut groups: Vec<Vec<&AttributeRule>> = Vec::new();
    let mut in_or_run = false;
    for rule in rules.iter().filter(|r| r.enabled) {
        let is_or = rule.condition == MatchCondition::Or;
        match groups.last_mut() {
            Some(last) if is_or && in_or_run => last.push(rule),
            _ => groups.push(vec![rule]),
        }
        in_or_run = is_or;
    }
    groups
}
