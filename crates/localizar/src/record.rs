//! Raw element records as persisted by the authoring tool.
//!
//! A record is a `WebElementEntity` XML document:
//!
//! ```xml
//! <WebElementEntity>
//!    <description>Search box on the home page</description>
//!    <name>search_box</name>
//!    <tag></tag>
//!    <elementGuidId>34567890-3456-3456-3456-345678901234</elementGuidId>
//!    <selectorCollection>
//!       <entry>
//!          <key>BASIC</key>
//!          <value>//input[@type='search' or @placeholder='Search']</value>
//!       </entry>
//!    </selectorCollection>
//!    <selectorMethod>BASIC</selectorMethod>
//!    <useRalativeImagePath>false</useRalativeImagePath>
//!    <webElementProperties>
//!       <isSelected>true</isSelected>
//!       <matchCondition>equals</matchCondition>
//!       <name>tag</name>
//!       <type>Main</type>
//!       <value>input</value>
//!    </webElementProperties>
//! </WebElementEntity>
//! ```
//!
//! Every field defaults when absent so that structural problems (a missing
//! name, an empty selector collection) are reported by validation with the
//! record identified, rather than as an opaque parse failure. Unknown
//! elements are ignored.

use serde::{Deserialize, Serialize};

use crate::result::{LocalizarError, LocalizarResult};

/// A record exactly as persisted, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "WebElementEntity", rename_all = "camelCase")]
pub struct RawRecord {
    /// Free-text documentation
    #[serde(default)]
    pub description: String,
    /// Element name, unique within its scope
    #[serde(default)]
    pub name: String,
    /// Tag hint, often empty
    #[serde(default)]
    pub tag: String,
    /// Globally unique id
    #[serde(default, rename = "elementGuidId")]
    pub id: String,
    /// Ordered `key -> value` selector entries
    #[serde(default)]
    pub selector_collection: RawSelectorCollection,
    /// Selected strategy key, or empty
    #[serde(default)]
    pub selector_method: String,
    /// Passed through untouched
    #[serde(default, rename = "useRalativeImagePath")]
    pub use_relative_image_path: bool,
    /// Attribute match rules
    #[serde(default, rename = "webElementProperties")]
    pub properties: Vec<RawProperty>,
}

/// The `<selectorCollection>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSelectorCollection {
    /// `<entry>` children in document order
    #[serde(default, rename = "entry")]
    pub entries: Vec<RawSelectorEntry>,
}

/// One `<entry>` of a selector collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSelectorEntry {
    /// Strategy key (`BASIC`, `CSS`, `XPATH`, ...)
    #[serde(default)]
    pub key: String,
    /// Selector expression
    #[serde(default)]
    pub value: String,
}

/// One `<webElementProperties>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    /// Whether the rule participates in matching
    #[serde(default)]
    pub is_selected: bool,
    /// Condition keyword (`equals`, `contains`, `or`, ...)
    #[serde(default)]
    pub match_condition: String,
    /// Attribute name
    #[serde(default)]
    pub name: String,
    /// Property type, passed through (usually `Main`)
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Expected value
    #[serde(default)]
    pub value: String,
}

impl RawRecord {
    /// Parse a record from its XML form.
    ///
    /// # Errors
    /// Returns [`LocalizarError::RecordSyntax`] if the document is not
    /// well-formed or a field has the wrong shape.
    pub fn from_xml(xml: &str) -> LocalizarResult<Self> {
        quick_xml::de::from_str(xml).map_err(|e| LocalizarError::RecordSyntax {
            message: e.to_string(),
        })
    }

    /// Add a selector entry
    #[must_use]
    pub fn with_selector(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.selector_collection.entries.push(RawSelectorEntry {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Set the selected strategy key
    #[must_use]
    pub fn with_selector_method(mut self, method: impl Into<String>) -> Self {
        self.selector_method = method.into();
        self
    }

    /// Add an attribute rule
    #[must_use]
    pub fn with_property(mut self, property: RawProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Create a record with the two required identity fields
    #[must_use]
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

impl RawProperty {
    /// Create an enabled rule of type `Main`
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        match_condition: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            is_selected: true,
            match_condition: match_condition.into(),
            name: name.into(),
            kind: "Main".to_string(),
            value: value.into(),
        }
    }

    /// Enable or disable the rule
    #[must_use]
    pub const fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }
}

/// A raw record together with where it lives in the repository.
///
/// The scope is the folder (page) path containing the record; names are
/// unique per scope. The origin is only used to identify the record in
/// error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopedRecord {
    /// Containing folder path, empty for the repository root
    pub scope: String,
    /// File path or other label for diagnostics
    pub origin: Option<String>,
    /// The record itself
    pub record: RawRecord,
}

impl ScopedRecord {
    /// Wrap a record in the root scope
    #[must_use]
    pub fn new(record: RawRecord) -> Self {
        Self {
            scope: String::new(),
            origin: None,
            record,
        }
    }

    /// Set the scope
    #[must_use]
    pub fn in_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Set the origin label
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl From<RawRecord> for ScopedRecord {
    fn from(record: RawRecord) -> Self {
        Self::new(record)
    }
}

/// One slot of a load batch.
///
/// A collaborator that fails to parse a record still hands the slot to the
/// store, so rejections keep their batch position and load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEntry {
    /// A parsed record
    Parsed(ScopedRecord),
    /// A record that could not be parsed
    Unparsed {
        /// File path or other label for diagnostics
        origin: Option<String>,
        /// Parser message
        message: String,
    },
}

impl BatchEntry {
    /// An unparseable record from `origin`
    #[must_use]
    pub fn unparsed(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unparsed {
            origin: Some(origin.into()),
            message: message.into(),
        }
    }
}

impl From<ScopedRecord> for BatchEntry {
    fn from(record: ScopedRecord) -> Self {
        Self::Parsed(record)
    }
}

impl From<RawRecord> for BatchEntry {
    fn from(record: RawRecord) -> Self {
        Self::Parsed(ScopedRecord::new(record))
    }
}
