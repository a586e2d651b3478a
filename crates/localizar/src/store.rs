//! The element descriptor store.
//!
//! A store only exists as the result of a successful [`DescriptorStore::load`];
//! there is no empty constructor and no mutation afterwards, so a published
//! store can be shared across threads without locking.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::descriptor::{join_path, normalize_scope, record_ref, ElementDescriptor, ResolvedSelector};
use crate::page::PageView;
use crate::record::{BatchEntry, ScopedRecord};
use crate::result::{LocalizarError, LocalizarResult, MalformedReason, RecordRef};

/// What `load` does when a record is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Fail the whole batch on the first rejected record
    #[default]
    AbortOnFirstError,
    /// Drop rejected records, keep the rest, report what was dropped
    SkipAndReport,
}

/// Options for [`DescriptorStore::load_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Rejection policy
    #[serde(default)]
    pub policy: LoadPolicy,
}

impl LoadOptions {
    /// Create default options (abort on first error)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rejection policy
    #[must_use]
    pub const fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Outcome of a load under [`LoadPolicy::SkipAndReport`].
#[derive(Debug)]
pub struct LoadReport {
    /// The store built from the accepted records
    pub store: DescriptorStore,
    /// One error per rejected record, in batch order
    pub rejected: Vec<LocalizarError>,
}

impl LoadReport {
    /// Whether every record was accepted
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Immutable, validated collection of element descriptors.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    descriptors: Vec<ElementDescriptor>,
    by_path: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl DescriptorStore {
    /// Load a batch of records, aborting on the first rejected record.
    ///
    /// # Errors
    /// Returns [`LocalizarError::MalformedRecord`] for the first record that
    /// fails validation or collides with an earlier one.
    pub fn load<I>(records: I) -> LocalizarResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<BatchEntry>,
    {
        Self::load_with(records, &LoadOptions::default()).map(|report| report.store)
    }

    /// Load a batch of records under the given options.
    ///
    /// Unparsed entries are rejected as [`MalformedReason::Syntax`] at their
    /// own position, so they follow the same policy as invalid records.
    ///
    /// With [`LoadPolicy::SkipAndReport`] this never fails; rejected records
    /// are listed in the report. When two records collide on name or id the
    /// earlier one is kept.
    ///
    /// # Errors
    /// With [`LoadPolicy::AbortOnFirstError`], the first rejection.
    pub fn load_with<I>(records: I, options: &LoadOptions) -> LocalizarResult<LoadReport>
    where
        I: IntoIterator,
        I::Item: Into<BatchEntry>,
    {
        let mut builder = Builder::default();
        let mut rejected = Vec::new();
        let mut total = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            total += 1;
            let outcome = match record.into() {
                BatchEntry::Parsed(scoped) => builder.accept(&scoped, position),
                BatchEntry::Unparsed { origin, message } => Err(LocalizarError::malformed(
                    RecordRef {
                        origin,
                        ..RecordRef::at(position)
                    },
                    MalformedReason::Syntax(message),
                )),
            };
            if let Err(err) = outcome {
                match options.policy {
                    LoadPolicy::AbortOnFirstError => return Err(err),
                    LoadPolicy::SkipAndReport => {
                        warn!(error = %err, "skipping element record");
                        rejected.push(err);
                    }
                }
            }
        }

        let store = builder.finish();
        info!(
            total,
            loaded = store.len(),
            rejected = rejected.len(),
            "element descriptors loaded"
        );
        Ok(LoadReport { store, rejected })
    }

    /// Look up a descriptor by path (`scope/name`, or `name` at the root).
    ///
    /// # Errors
    /// Returns [`LocalizarError::NotFound`] on a miss.
    pub fn get(&self, path: &str) -> LocalizarResult<&ElementDescriptor> {
        let key = normalize_scope(path);
        self.by_path
            .get(&key)
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| LocalizarError::not_found(path))
    }

    /// Look up a descriptor by name within a scope.
    ///
    /// # Errors
    /// Returns [`LocalizarError::NotFound`] on a miss.
    pub fn get_in(&self, scope: &str, name: &str) -> LocalizarResult<&ElementDescriptor> {
        let path = join_path(&normalize_scope(scope), name);
        self.by_path
            .get(&path)
            .map(|&i| &self.descriptors[i])
            .ok_or(LocalizarError::NotFound { name: path })
    }

    /// Look up a descriptor by its globally unique id.
    ///
    /// # Errors
    /// Returns [`LocalizarError::NotFound`] on a miss.
    pub fn get_by_id(&self, id: &str) -> LocalizarResult<&ElementDescriptor> {
        self.by_id
            .get(id)
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| LocalizarError::not_found(id))
    }

    /// Pick the selector to use for a descriptor.
    ///
    /// # Errors
    /// See [`ElementDescriptor::resolve`].
    pub fn resolve<'a>(
        &self,
        descriptor: &'a ElementDescriptor,
    ) -> LocalizarResult<ResolvedSelector<'a>> {
        descriptor.resolve()
    }

    /// Look up a descriptor by path and resolve it.
    ///
    /// # Errors
    /// [`LocalizarError::NotFound`] on a miss.
    pub fn resolve_path(&self, path: &str) -> LocalizarResult<ResolvedSelector<'_>> {
        self.get(path)?.resolve()
    }

    /// Evaluate a descriptor's attribute rules against a candidate element.
    #[must_use]
    pub fn matches_attributes(
        &self,
        descriptor: &ElementDescriptor,
        attributes: &HashMap<String, String>,
    ) -> bool {
        descriptor.matches_attributes(attributes)
    }

    /// All descriptors in load order
    pub fn iter(&self) -> impl Iterator<Item = &ElementDescriptor> {
        self.descriptors.iter()
    }

    /// Number of descriptors
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the store holds no descriptors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Distinct scopes in first-seen order
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.descriptors
            .iter()
            .map(ElementDescriptor::scope)
            .filter(|scope| seen.insert(*scope))
            .collect()
    }

    /// Page object view over one scope, if it holds any descriptor
    #[must_use]
    pub fn page(&self, scope: &str) -> Option<PageView<'_>> {
        let scope = normalize_scope(scope);
        let members: Vec<&ElementDescriptor> = self
            .descriptors
            .iter()
            .filter(|d| d.scope() == scope)
            .collect();
        (!members.is_empty()).then(|| PageView::new(scope, members))
    }
}

#[derive(Default)]
struct Builder {
    descriptors: Vec<ElementDescriptor>,
    by_path: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl Builder {
    fn accept(&mut self, scoped: &ScopedRecord, position: usize) -> LocalizarResult<()> {
        let descriptor = ElementDescriptor::from_record(scoped, position)?;

        let path = descriptor.path();
        if self.by_path.contains_key(&path) {
            return Err(LocalizarError::malformed(
                record_ref(scoped, position),
                MalformedReason::DuplicateName {
                    scope: descriptor.scope().to_string(),
                    name: descriptor.name().to_string(),
                },
            ));
        }
        if self.by_id.contains_key(descriptor.id()) {
            return Err(LocalizarError::malformed(
                record_ref(scoped, position),
                MalformedReason::DuplicateId(descriptor.id().to_string()),
            ));
        }

        debug!(path = %path, id = descriptor.id(), "accepted element record");
        let index = self.descriptors.len();
        self.by_path.insert(path, index);
        self.by_id.insert(descriptor.id().to_string(), index);
        self.descriptors.push(descriptor);
        Ok(())
    }

    fn finish(self) -> DescriptorStore {
        DescriptorStore {
            descriptors: self.descriptors,
            by_path: self.by_path,
            by_id: self.by_id,
        }
    }
}
