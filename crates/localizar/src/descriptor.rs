//! Validated element descriptors and selector resolution.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::ScopedRecord;
use crate::result::{LocalizarError, LocalizarResult, MalformedReason, RecordRef};
use crate::rules::{self, AttributeRule, MatchCondition};
use crate::strategy::{StrategyKind, DEFAULT_PRIORITY};

/// Ordered selector expressions keyed by strategy kind.
///
/// Keys are unique and declaration order is kept; it breaks ties for kinds
/// outside [`DEFAULT_PRIORITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorSet {
    entries: Vec<(StrategyKind, String)>,
}

impl SelectorSet {
    /// Expression for `kind`, if declared
    #[must_use]
    pub fn get(&self, kind: StrategyKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `kind` is declared
    #[must_use]
    pub fn contains(&self, kind: StrategyKind) -> bool {
        self.get(kind).is_some()
    }

    /// Kinds in declaration order
    pub fn kinds(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// `(kind, expression)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (StrategyKind, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of declared kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no kind is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, kind: StrategyKind, expression: String) -> Result<(), MalformedReason> {
        if self.contains(kind) {
            return Err(MalformedReason::DuplicateStrategy(kind));
        }
        self.entries.push((kind, expression));
        Ok(())
    }
}

/// A selector chosen for use: the strategy and its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedSelector<'a> {
    /// Strategy kind
    pub kind: StrategyKind,
    /// Expression to hand to the DOM query layer
    pub expression: &'a str,
}

/// A single element's stored identification and locator data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementDescriptor {
    id: String,
    name: String,
    scope: String,
    description: Option<String>,
    tag: Option<String>,
    selectors: SelectorSet,
    selected_strategy: Option<StrategyKind>,
    attribute_rules: Vec<AttributeRule>,
    use_relative_image_path: bool,
}

impl ElementDescriptor {
    /// Validate a raw record into a descriptor.
    ///
    /// Checks only what a single record can violate; name and id uniqueness
    /// across a batch is the store's job.
    ///
    /// # Errors
    /// Returns [`LocalizarError::MalformedRecord`] naming the record and the
    /// violated invariant.
    pub fn from_record(scoped: &ScopedRecord, position: usize) -> LocalizarResult<Self> {
        Self::validate(scoped).map_err(|reason| {
            LocalizarError::malformed(record_ref(scoped, position), reason)
        })
    }

    fn validate(scoped: &ScopedRecord) -> Result<Self, MalformedReason> {
        let raw = &scoped.record;

        let id = raw.id.trim();
        if id.is_empty() {
            return Err(MalformedReason::MissingId);
        }
        let name = raw.name.trim();
        if name.is_empty() {
            return Err(MalformedReason::MissingName);
        }
        // a name is a single path segment
        if name.contains(['/', '\\']) {
            return Err(MalformedReason::NameWithSeparator(name.to_string()));
        }

        let mut selectors = SelectorSet::default();
        for entry in &raw.selector_collection.entries {
            let kind: StrategyKind = entry
                .key
                .parse()
                .map_err(|_| MalformedReason::UnknownStrategy(entry.key.clone()))?;
            // The authoring tool writes empty entries for unused strategies.
            if entry.value.trim().is_empty() {
                continue;
            }
            selectors.insert(kind, entry.value.clone())?;
        }
        if selectors.is_empty() {
            return Err(MalformedReason::EmptySelectors);
        }

        let selected_strategy = match raw.selector_method.trim() {
            "" => None,
            method => {
                let kind: StrategyKind = method
                    .parse()
                    .map_err(|_| MalformedReason::UnknownStrategy(method.to_string()))?;
                if !selectors.contains(kind) {
                    return Err(MalformedReason::DanglingSelectedStrategy(kind));
                }
                Some(kind)
            }
        };

        let mut attribute_rules = Vec::with_capacity(raw.properties.len());
        for property in &raw.properties {
            let attribute = property.name.trim();
            if attribute.is_empty() {
                return Err(MalformedReason::UnnamedAttributeRule);
            }
            let condition: MatchCondition = property.match_condition.parse().map_err(|c| {
                MalformedReason::UnknownMatchCondition {
                    attribute: attribute.to_string(),
                    condition: c,
                }
            })?;
            let rule = AttributeRule::new(
                attribute,
                condition,
                property.value.clone(),
                property.is_selected,
            )
            .map_err(|message| MalformedReason::InvalidPattern {
                attribute: attribute.to_string(),
                message,
            })?;
            attribute_rules.push(rule.with_type(property.kind.clone()));
        }

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            scope: normalize_scope(&scoped.scope),
            description: non_empty(&raw.description),
            tag: non_empty(&raw.tag),
            selectors,
            selected_strategy,
            attribute_rules,
            use_relative_image_path: raw.use_relative_image_path,
        })
    }

    /// Globally unique id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name within the scope
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Containing folder path, empty at the root
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// `scope/name`, or just `name` at the root
    #[must_use]
    pub fn path(&self) -> String {
        join_path(&self.scope, &self.name)
    }

    /// Free-text documentation
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Tag hint
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Declared selectors
    #[must_use]
    pub const fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// Strategy designated as primary, if any
    #[must_use]
    pub const fn selected_strategy(&self) -> Option<StrategyKind> {
        self.selected_strategy
    }

    /// Attribute rules in declaration order
    #[must_use]
    pub fn attribute_rules(&self) -> &[AttributeRule] {
        &self.attribute_rules
    }

    /// Passthrough flag from the record
    #[must_use]
    pub const fn use_relative_image_path(&self) -> bool {
        self.use_relative_image_path
    }

    /// Pick the selector to use.
    ///
    /// The selected strategy wins when set. Otherwise CSS, then XPATH, then
    /// BASIC, then any remaining kind in declaration order.
    ///
    /// # Errors
    /// Returns [`LocalizarError::NoSelectorAvailable`] if no selector is
    /// declared, which `load` already rules out.
    pub fn resolve(&self) -> LocalizarResult<ResolvedSelector<'_>> {
        self.candidates()
            .next()
            .ok_or_else(|| LocalizarError::NoSelectorAvailable {
                id: self.id.clone(),
            })
    }

    /// Every declared selector in fallback order, starting with the one
    /// [`resolve`](Self::resolve) returns. No kind appears twice.
    pub fn candidates(&self) -> impl Iterator<Item = ResolvedSelector<'_>> {
        let mut order: Vec<StrategyKind> = Vec::with_capacity(self.selectors.len());
        if let Some(kind) = self.selected_strategy {
            order.push(kind);
        }
        for kind in DEFAULT_PRIORITY.into_iter().chain(self.selectors.kinds()) {
            if !order.contains(&kind) {
                order.push(kind);
            }
        }
        order.into_iter().filter_map(move |kind| {
            self.selectors
                .get(kind)
                .map(|expression| ResolvedSelector { kind, expression })
        })
    }

    /// Evaluate the attribute rules against a candidate element.
    #[must_use]
    pub fn matches_attributes(&self, attributes: &HashMap<String, String>) -> bool {
        rules::evaluate(&self.attribute_rules, attributes)
    }
}

pub(crate) fn record_ref(scoped: &ScopedRecord, position: usize) -> RecordRef {
    RecordRef {
        position,
        id: non_empty(&scoped.record.id),
        name: non_empty(&scoped.record.name),
        origin: scoped.origin.clone(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Scopes are compared with surrounding and doubled separators removed.
pub(crate) fn normalize_scope(scope: &str) -> String {
    scope
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn join_path(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}/{name}")
    }
}
