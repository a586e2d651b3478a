//! Result and error types for Localizar.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strategy::StrategyKind;

/// Result type for Localizar operations
pub type LocalizarResult<T> = Result<T, LocalizarError>;

/// Errors that can occur in Localizar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalizarError {
    /// A record failed structural validation during `load`
    #[error("Malformed record {record}: {reason}")]
    MalformedRecord {
        /// Which record was rejected
        record: RecordRef,
        /// The violated invariant
        reason: MalformedReason,
    },

    /// Lookup miss
    #[error("Element not found: {name}")]
    NotFound {
        /// The name or path that was queried
        name: String,
    },

    /// A descriptor has no selector to resolve to
    #[error("No selector available for element {id}")]
    NoSelectorAvailable {
        /// Descriptor id
        id: String,
    },

    /// The record document itself could not be parsed
    #[error("Record syntax error: {message}")]
    RecordSyntax {
        /// Parser message
        message: String,
    },
}

impl LocalizarError {
    /// Create a malformed-record error
    #[must_use]
    pub fn malformed(record: RecordRef, reason: MalformedReason) -> Self {
        Self::MalformedRecord { record, reason }
    }

    /// Create a not-found error
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// The rejected record, if this is a load-time error
    #[must_use]
    pub const fn record(&self) -> Option<&RecordRef> {
        match self {
            Self::MalformedRecord { record, .. } => Some(record),
            _ => None,
        }
    }

    /// The violated invariant, if this is a load-time error
    #[must_use]
    pub const fn reason(&self) -> Option<&MalformedReason> {
        match self {
            Self::MalformedRecord { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Identifies a record inside a load batch.
///
/// Position is always known; id, name and origin are filled in as far as the
/// raw record provides them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    /// Zero-based position in the batch
    pub position: usize,
    /// `elementGuidId`, when present
    pub id: Option<String>,
    /// Element name, when present
    pub name: Option<String>,
    /// Where the record came from (usually a file path)
    pub origin: Option<String>,
}

impl RecordRef {
    /// Reference a record by its batch position only
    #[must_use]
    pub fn at(position: usize) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.position)?;
        if let Some(origin) = &self.origin {
            write!(f, " ({origin})")?;
        }
        match (&self.name, &self.id) {
            (Some(name), Some(id)) => write!(f, " '{name}' [{id}]"),
            (Some(name), None) => write!(f, " '{name}'"),
            (None, Some(id)) => write!(f, " [{id}]"),
            (None, None) => Ok(()),
        }
    }
}

/// The invariant a malformed record violates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// `elementGuidId` is missing or blank
    #[error("missing element id")]
    MissingId,

    /// `name` is missing or blank
    #[error("missing element name")]
    MissingName,

    /// `name` contains a path separator
    #[error("element name '{0}' contains a path separator")]
    NameWithSeparator(String),

    /// No selector entry has an expression
    #[error("selector collection is empty")]
    EmptySelectors,

    /// A selector key names no known strategy
    #[error("unknown selector strategy '{0}'")]
    UnknownStrategy(String),

    /// A strategy key appears twice
    #[error("selector strategy {0} is declared more than once")]
    DuplicateStrategy(StrategyKind),

    /// `selectorMethod` names a strategy with no entry
    #[error("selected strategy {0} has no entry in the selector collection")]
    DanglingSelectedStrategy(StrategyKind),

    /// An attribute rule uses an unknown condition
    #[error("unknown match condition '{condition}' on attribute '{attribute}'")]
    UnknownMatchCondition {
        /// Attribute the rule reads
        attribute: String,
        /// Condition keyword as written
        condition: String,
    },

    /// A regex condition's pattern does not compile
    #[error("invalid pattern for attribute '{attribute}': {message}")]
    InvalidPattern {
        /// Attribute the rule reads
        attribute: String,
        /// Regex compiler message
        message: String,
    },

    /// An attribute rule has a blank attribute name
    #[error("attribute rule has no attribute name")]
    UnnamedAttributeRule,

    /// Another record already uses this name in the scope
    #[error("name '{name}' already used in scope '{scope}'")]
    DuplicateName {
        /// Scope of both records
        scope: String,
        /// Colliding name
        name: String,
    },

    /// Another record already uses this id
    #[error("id '{0}' already used by another element")]
    DuplicateId(String),

    /// The record could not be parsed
    #[error("unparseable record: {0}")]
    Syntax(String),
}
