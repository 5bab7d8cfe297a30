//! Page template matching
//!
//! A [`PageMatcher`] is an ordered list of [`Condition`]s that together
//! describe one page state, plus a registry of named [`Locator`]s that the
//! page exposes:
//!
//! ```no_run
//! use pagestate::{By, Locator, PageMatcher, SharedDriver};
//! use std::time::Duration;
//!
//! # async fn example(driver: SharedDriver) -> pagestate::Result<()> {
//! let mut template = PageMatcher::new(driver.clone());
//! template
//!     .match_partial_url("wikipedia.org/w/index.php?search=")
//!     .match_title("Search - Wikipedia")
//!     .match_presence(Locator::new(driver.clone(), By::Name, "search").named("search_input"));
//!
//! if template.matches(Duration::ZERO, Duration::from_millis(100), false).await? {
//!     template.get("search_input").await?.send_keys("Selentric").await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::condition::Condition;
use crate::driver::{Element, SharedDriver};
use crate::errors::{PageError, Result};
use crate::locator::Locator;
use crate::types::Query;
use crate::wait;

/// Ordered page-state conditions plus a registry of named locators
pub struct PageMatcher {
    driver: SharedDriver,
    conditions: Vec<Condition>,
    locators: HashMap<String, Locator>,
}

impl PageMatcher {
    pub fn new(driver: SharedDriver) -> Self {
        PageMatcher {
            driver,
            conditions: Vec::new(),
            locators: HashMap::new(),
        }
    }

    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Registered conditions, in evaluation order
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Number of registered conditions
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Names of all registered locators, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.locators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Register `locator` under its own name, or a generated one when unnamed
    fn register(&mut self, locator: Locator) -> &Locator {
        let name = locator
            .name()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        debug!("Registering locator '{}' ({})", name, locator.query());
        self.locators.insert(name.clone(), locator);
        &self.locators[&name]
    }

    /// Append an arbitrary condition
    pub fn match_condition(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    fn match_locator(&mut self, locator: Locator, condition: fn(Query) -> Condition) -> &mut Self {
        let query = self.register(locator).query().clone();
        self.match_condition(condition(query))
    }

    /// The current URL must equal `url`
    pub fn match_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.match_condition(Condition::UrlIs(url.into()))
    }

    /// The current URL must contain `text`
    pub fn match_partial_url(&mut self, text: impl Into<String>) -> &mut Self {
        self.match_condition(Condition::UrlContains(text.into()))
    }

    /// The page title must equal `title`
    pub fn match_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.match_condition(Condition::TitleIs(title.into()))
    }

    /// The page title must contain `text`
    pub fn match_partial_title(&mut self, text: impl Into<String>) -> &mut Self {
        self.match_condition(Condition::TitleContains(text.into()))
    }

    /// An element matching the locator's query must exist
    pub fn match_presence(&mut self, locator: Locator) -> &mut Self {
        self.match_locator(locator, Condition::Present)
    }

    /// An element matching the locator's query must exist and be visible
    pub fn match_visibility(&mut self, locator: Locator) -> &mut Self {
        self.match_locator(locator, Condition::Visible)
    }

    /// The locator's element must be absent or hidden
    pub fn match_invisibility(&mut self, locator: Locator) -> &mut Self {
        self.match_locator(locator, Condition::Invisible)
    }

    /// The locator's element text must contain `text`
    pub fn match_element_text(&mut self, locator: Locator, text: impl Into<String>) -> &mut Self {
        let query = self.register(locator).query().clone();
        self.match_condition(Condition::TextContains(query, text.into()))
    }

    /// The locator's element `value` attribute must contain `text`
    pub fn match_element_value_text(
        &mut self,
        locator: Locator,
        text: impl Into<String>,
    ) -> &mut Self {
        let query = self.register(locator).query().clone();
        self.match_condition(Condition::ValueContains(query, text.into()))
    }

    /// The locator's element must be visible and enabled
    pub fn match_clickable_element(&mut self, locator: Locator) -> &mut Self {
        self.match_locator(locator, Condition::Clickable)
    }

    /// A JavaScript alert must be open
    pub fn match_alert_present(&mut self) -> &mut Self {
        self.match_condition(Condition::AlertPresent)
    }

    /// Register a locator for named access without adding a condition
    pub fn add_locator(&mut self, locator: Locator) -> &mut Self {
        self.register(locator);
        self
    }

    /// Register a locator under `name`, renaming the locator as well
    pub fn add_locator_by_name(&mut self, locator: Locator, name: impl Into<String>) -> &mut Self {
        locator.set_name(name);
        self.register(locator);
        self
    }

    /// Evaluate every condition in order.
    ///
    /// Each condition is polled for up to `timeout` (a zero timeout still
    /// checks once). The first condition that does not hold stops evaluation
    /// and yields `Ok(false)`; later conditions are not checked. With `debug`,
    /// the failing condition is logged.
    pub async fn matches(&self, timeout: Duration, poll: Duration, debug: bool) -> Result<bool> {
        let timeout = wait::at_least_one_check(timeout);

        for (index, condition) in self.conditions.iter().enumerate() {
            if !condition.poll(self.driver.as_ref(), timeout, poll).await? {
                if debug {
                    info!(
                        "Timeout: condition {} ({}) not met within {:?}",
                        index, condition, timeout
                    );
                } else {
                    debug!("Condition {} ({}) not met", index, condition);
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The registered locator called `name`
    pub fn locator(&self, name: &str) -> Result<&Locator> {
        self.locators
            .get(name)
            .ok_or_else(|| PageError::UnknownReference(name.to_string()))
    }

    /// The element behind the locator called `name`, resolving it if it has
    /// not been found yet
    pub async fn get(&self, name: &str) -> Result<Element> {
        self.locator(name)?.element().await
    }

    /// Every element behind the locator called `name`
    pub async fn get_all(&self, name: &str) -> Result<Vec<Element>> {
        self.locator(name)?.elements().await
    }
}

impl fmt::Debug for PageMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageMatcher")
            .field("conditions", &self.conditions)
            .field("locators", &self.names())
            .finish()
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod matcher_test;
