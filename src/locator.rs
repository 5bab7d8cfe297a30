//! Lazy element references
//!
//! A [`Locator`] stores how to find an element and only queries the browser
//! when the element is actually needed:
//!
//! ```no_run
//! use pagestate::{By, Locator, SharedDriver};
//!
//! # async fn example(driver: SharedDriver) -> pagestate::Result<()> {
//! let search_input = Locator::new(driver, By::Name, "q").named("search_input");
//!
//! // No explicit lookup needed: the first access finds and caches the element.
//! search_input.send_keys("ello poppet").await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::driver::{Element, SharedDriver};
use crate::errors::{PageError, Result};
use crate::select::Select;
use crate::types::{By, Query};

/// Outcome of resolving a [`Locator`]
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Single-element lookup found nothing
    NotFound,
    /// Single element
    One(Element),
    /// Single element adapted to a dropdown view
    Select(Select),
    /// Every match, in document order (possibly empty)
    All(Vec<Element>),
}

impl Resolved {
    /// `true` for a single element, or for a non-empty sequence
    pub fn is_found(&self) -> bool {
        match self {
            Resolved::NotFound => false,
            Resolved::One(_) | Resolved::Select(_) => true,
            Resolved::All(elements) => !elements.is_empty(),
        }
    }

    /// The single element, or the first one of a sequence
    pub fn first(&self) -> Option<&Element> {
        match self {
            Resolved::NotFound => None,
            Resolved::One(element) => Some(element),
            Resolved::Select(select) => Some(select.element()),
            Resolved::All(elements) => elements.first(),
        }
    }

    /// Every element as a sequence
    pub fn to_vec(&self) -> Vec<Element> {
        match self {
            Resolved::All(elements) => elements.clone(),
            other => other.first().cloned().into_iter().collect(),
        }
    }
}

#[derive(Debug, Default)]
struct Cache {
    name: Option<String>,
    found: bool,
    result: Option<Resolved>,
}

/// Deferred, cached reference to one element (or all matching elements)
///
/// Clones share the name and the cache, so a locator registered on a page and
/// the copy kept by the caller always agree on what was found.
#[derive(Clone)]
pub struct Locator {
    query: Query,
    parent: Option<Box<Locator>>,
    multiple: bool,
    select: bool,
    driver: SharedDriver,
    cache: Arc<Mutex<Cache>>,
}

impl Locator {
    pub fn new(driver: SharedDriver, by: By, value: impl Into<String>) -> Self {
        Self::from_query(driver, Query::new(by, value))
    }

    pub fn from_query(driver: SharedDriver, query: Query) -> Self {
        Locator {
            query,
            parent: None,
            multiple: false,
            select: false,
            driver,
            cache: Arc::new(Mutex::new(Cache::default())),
        }
    }

    /// Set the display name, also used as the registry key on a page
    pub fn named(self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    /// Scope lookups to the element `parent` resolves to
    pub fn within(mut self, parent: &Locator) -> Self {
        self.parent = Some(Box::new(parent.clone()));
        self
    }

    /// Resolve to every match instead of the first one
    pub fn all(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Wrap the found element in a [`Select`] view
    pub fn as_select(mut self) -> Self {
        self.select = true;
        self
    }

    fn cache(&self) -> MutexGuard<'_, Cache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn name(&self) -> Option<String> {
        self.cache().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.cache().name = Some(name.into());
    }

    /// Name for diagnostics: the display name, or the query when unnamed
    pub fn display_name(&self) -> String {
        self.name().unwrap_or_else(|| self.query.to_string())
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn by(&self) -> By {
        self.query.by
    }

    pub fn value(&self) -> &str {
        &self.query.value
    }

    pub fn parent(&self) -> Option<&Locator> {
        self.parent.as_deref()
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Whether the last resolution found something. Never queries the page.
    pub fn is_found(&self) -> bool {
        self.cache().found
    }

    /// The last resolution result, if any
    pub fn cached(&self) -> Option<Resolved> {
        self.cache().result.clone()
    }

    /// Forget the cached result so the next access re-queries the page
    pub fn reset(&self) {
        let mut cache = self.cache();
        cache.found = false;
        cache.result = None;
    }

    pub(crate) fn not_found(&self) -> PageError {
        PageError::NotFound {
            name: self.display_name(),
            by: self.query.by,
            value: self.query.value.clone(),
        }
    }

    fn store(&self, resolved: &Resolved) {
        let mut cache = self.cache();
        cache.found = resolved.is_found();
        cache.result = Some(resolved.clone());
    }

    fn cached_element(&self) -> Option<Element> {
        let cache = self.cache();
        if !cache.found {
            return None;
        }
        cache.result.as_ref().and_then(Resolved::first).cloned()
    }

    fn parent_scope(&self) -> Pin<Box<dyn Future<Output = Result<Option<Element>>> + Send + '_>> {
        Box::pin(async move {
            match &self.parent {
                Some(parent) => match parent.resolve().await?.first() {
                    Some(element) => Ok(Some(element.clone())),
                    None => Err(parent.not_found()),
                },
                None => Ok(None),
            }
        })
    }

    /// Query the page now and refresh the cache.
    ///
    /// The parent (if any) is re-resolved first and used as the search scope.
    /// A single-element miss is cached as [`Resolved::NotFound`] and returned
    /// as [`PageError::NotFound`]; a multi-element miss is an empty sequence.
    pub async fn resolve(&self) -> Result<Resolved> {
        let scope = self.parent_scope().await?;
        debug!(
            "Resolving {} by {} (scoped: {})",
            self.display_name(),
            self.query,
            scope.is_some()
        );

        let resolved = if self.multiple {
            let elements = match &scope {
                Some(parent) => parent.find_all(&self.query).await?,
                None => self.driver.find_all(&self.query).await?,
            };
            Resolved::All(elements)
        } else {
            let element = match &scope {
                Some(parent) => parent.find(&self.query).await?,
                None => self.driver.find(&self.query).await?,
            };
            match element {
                Some(element) if self.select => Resolved::Select(Select::new(element).await?),
                Some(element) => Resolved::One(element),
                None => Resolved::NotFound,
            }
        };

        self.store(&resolved);

        if matches!(resolved, Resolved::NotFound) {
            return Err(self.not_found());
        }
        Ok(resolved)
    }

    /// Resolution that reports a missing element as [`Resolved::NotFound`]
    pub fn graceful(&self) -> Graceful<'_> {
        Graceful {
            locator: self,
            log: true,
        }
    }

    /// The element this locator refers to, resolving it first if nothing is
    /// cached. For multi-element locators this is the first match.
    pub async fn element(&self) -> Result<Element> {
        if let Some(element) = self.cached_element() {
            return Ok(element);
        }

        let resolved = self.resolve().await?;
        resolved.first().cloned().ok_or_else(|| self.not_found())
    }

    /// Every element this locator refers to, resolving first if nothing is
    /// cached. Single-element locators yield a one-element sequence.
    pub async fn elements(&self) -> Result<Vec<Element>> {
        if let Some(resolved) = self.cached().filter(Resolved::is_found) {
            return Ok(resolved.to_vec());
        }
        Ok(self.resolve().await?.to_vec())
    }

    /// The [`Select`] view of this locator's element
    pub async fn select(&self) -> Result<Select> {
        if let Some(Resolved::Select(select)) = self.cached() {
            return Ok(select);
        }
        Select::new(self.element().await?).await
    }

    pub async fn click(&self) -> Result<()> {
        self.element().await?.click().await
    }

    pub async fn send_keys(&self, text: &str) -> Result<()> {
        self.element().await?.send_keys(text).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.element().await?.clear().await
    }

    pub async fn text(&self) -> Result<String> {
        self.element().await?.text().await
    }

    pub async fn attr(&self, name: &str) -> Result<Option<String>> {
        self.element().await?.attr(name).await
    }

    pub async fn prop(&self, name: &str) -> Result<Option<String>> {
        self.element().await?.prop(name).await
    }

    pub async fn is_displayed(&self) -> Result<bool> {
        self.element().await?.is_displayed().await
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        self.element().await?.is_enabled().await
    }

    pub async fn tag_name(&self) -> Result<String> {
        self.element().await?.tag_name().await
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("name", &self.name())
            .field("query", &self.query)
            .field("parent", &self.parent)
            .field("multiple", &self.multiple)
            .field("select", &self.select)
            .field("found", &self.is_found())
            .finish()
    }
}

impl From<&Locator> for Query {
    fn from(locator: &Locator) -> Self {
        locator.query.clone()
    }
}

/// Resolution mode that turns "not found" into a value instead of an error
pub struct Graceful<'a> {
    locator: &'a Locator,
    log: bool,
}

impl Graceful<'_> {
    /// Do not log misses
    pub fn quiet(mut self) -> Self {
        self.log = false;
        self
    }

    pub async fn resolve(&self) -> Result<Resolved> {
        match self.locator.resolve().await {
            Err(err) if err.is_not_found() => {
                if self.log {
                    debug!("{}", err);
                }
                Ok(Resolved::NotFound)
            }
            other => other,
        }
    }

    /// The element, or `None` when it is not on the page
    pub async fn element(&self) -> Result<Option<Element>> {
        Ok(self.resolve().await?.first().cloned())
    }
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
