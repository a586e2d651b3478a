//! Localizar: element descriptor store and selector resolver
//!
//! Localizar (Spanish: "to locate") loads an object repository of web element
//! records, validates them, and answers one question for a test driver: which
//! selector should be used to find this element?
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   LOCALIZAR Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ XML        │    │ Descriptor │    │ Locator    │            │
//! │   │ Records    │───►│ Store      │───►│ (DOM query)│───► driver │
//! │   │ (RawRecord)│    │ (validated)│    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use localizar::{DescriptorStore, RawRecord, ScopedRecord, StrategyKind};
//!
//! let record = RawRecord::named("guid-1", "navigation_menu")
//!     .with_selector("XPATH", "//header//nav")
//!     .with_selector("CSS", "nav.navbar");
//! let store = DescriptorStore::load([ScopedRecord::new(record).in_scope("Page_Home")])?;
//!
//! let resolved = store.resolve_path("Page_Home/navigation_menu")?;
//! assert_eq!(resolved.kind, StrategyKind::Css);
//! assert_eq!(resolved.expression, "nav.navbar");
//! # Ok::<(), localizar::LocalizarError>(())
//! ```

#![warn(missing_docs)]

mod descriptor;
mod locator;
mod page;
mod record;
mod result;
mod rules;
mod store;
mod strategy;

pub use descriptor::{ElementDescriptor, ResolvedSelector, SelectorSet};
pub use locator::{Locator, Selector};
pub use page::PageView;
pub use record::{
    BatchEntry, RawProperty, RawRecord, RawSelectorCollection, RawSelectorEntry, ScopedRecord,
};
pub use result::{LocalizarError, LocalizarResult, MalformedReason, RecordRef};
pub use rules::{evaluate as evaluate_rules, AttributeRule, MatchCondition};
pub use store::{DescriptorStore, LoadOptions, LoadPolicy, LoadReport};
pub use strategy::{StrategyKind, UnknownStrategy, DEFAULT_PRIORITY};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        BatchEntry, DescriptorStore, ElementDescriptor, LoadOptions, LoadPolicy, LocalizarError,
        LocalizarResult, Locator, RawRecord, ResolvedSelector, ScopedRecord, Selector,
        StrategyKind,
    };
}
