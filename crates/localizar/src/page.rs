//! Page object views over a store.
//!
//! A scope in the repository is a page (or a component of one). A
//! [`PageView`] collects the descriptors of one scope and hands out
//! locators by element name, the way a hand-written page object would.

use crate::descriptor::{join_path, ElementDescriptor};
use crate::locator::Locator;
use crate::result::{LocalizarError, LocalizarResult};

/// Read-only view of the descriptors in one scope.
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    scope: String,
    descriptors: Vec<&'a ElementDescriptor>,
}

impl<'a> PageView<'a> {
    pub(crate) fn new(scope: String, descriptors: Vec<&'a ElementDescriptor>) -> Self {
        Self { scope, descriptors }
    }

    /// The scope this page covers
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Element names in load order
    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        self.descriptors
            .iter()
            .copied()
            .map(ElementDescriptor::name)
            .collect()
    }

    /// Number of elements on the page
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the page has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor by name
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&'a ElementDescriptor> {
        self.descriptors.iter().copied().find(|d| d.name() == name)
    }

    /// Resolved locator for the named element.
    ///
    /// # Errors
    /// [`LocalizarError::NotFound`] if the page has no such element.
    pub fn locator(&self, name: &str) -> LocalizarResult<Locator> {
        let descriptor = self.descriptor(name).ok_or_else(|| {
            LocalizarError::not_found(join_path(&self.scope, name))
        })?;
        let resolved = descriptor.resolve()?;
        Ok(Locator::new(descriptor.path(), &resolved))
    }

    /// Resolved locators for every element on the page
    ///
    /// # Errors
    /// Propagates the first resolution failure.
    pub fn locators(&self) -> LocalizarResult<Vec<Locator>> {
        self.descriptors
            .iter()
            .map(|d| d.resolve().map(|r| Locator::new(d.path(), &r)))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::locator::Selector;
    use crate::record::{RawRecord, ScopedRecord};
    use crate::result::LocalizarError;
    use crate::store::DescriptorStore;
    use crate::strategy::StrategyKind;

    fn store() -> DescriptorStore {
        DescriptorStore::load(vec![
            ScopedRecord::new(
                RawRecord::named("1", "username")
                    .with_selector("CSS", "input[name='username']"),
            )
            .in_scope("Page_Login"),
            ScopedRecord::new(
                RawRecord::named("2", "submit")
                    .with_selector("XPATH", "//button[@type='submit']")
                    .with_selector("CSS", "button[type='submit']")
                    .with_selector_method("XPATH"),
            )
            .in_scope("Page_Login"),
            ScopedRecord::new(RawRecord::named("3", "logo").with_selector("CSS", "img.logo"))
                .in_scope("Page_Home"),
        ])
        .unwrap()
    }

    #[test]
    fn test_page_collects_scope() {
        let store = store();
        let page = store.page("Page_Login").unwrap();
        assert_eq!(page.scope(), "Page_Login");
        assert_eq!(page.len(), 2);
        assert_eq!(page.names(), ["username", "submit"]);
    }

    #[test]
    fn test_unknown_page() {
        assert!(store().page("Page_Checkout").is_none());
    }

    #[test]
    fn test_page_locator() {
        let store = store();
        let page = store.page("Page_Login").unwrap();
        let locator = page.locator("submit").unwrap();
        assert_eq!(locator.element, "Page_Login/submit");
        assert_eq!(locator.kind, StrategyKind::XPath);
        assert_eq!(locator.selector, Selector::xpath("//button[@type='submit']"));
    }

    #[test]
    fn test_page_locator_miss() {
        let store = store();
        let page = store.page("Page_Login").unwrap();
        assert_eq!(
            page.locator("logo").unwrap_err(),
            LocalizarError::not_found("Page_Login/logo")
        );
    }

    #[test]
    fn test_page_locators() {
        let store = store();
        let page = store.page("Page_Home").unwrap();
        let locators = page.locators().unwrap();
        assert_eq!(locators.len(), 1);
        assert_eq!(locators[0].selector, Selector::css("img.logo"));
    }
}
