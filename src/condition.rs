//! Page-state predicates
//!
//! A [`Condition`] is one declarative check against the live browser. Element
//! conditions hold a [`Query`] copied out of a locator, so every check
//! re-queries the page instead of trusting any cached element.

use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::driver::{Driver, Element};
use crate::errors::{PageError, Result};
use crate::types::Query;
use crate::wait;

/// One check from the closed set of supported page-state predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Current URL equals the given URL
    UrlIs(String),
    /// Current URL contains the given text
    UrlContains(String),
    /// Page title equals the given text
    TitleIs(String),
    /// Page title contains the given text
    TitleContains(String),
    /// An element matching the query exists
    Present(Query),
    /// An element matching the query exists and is displayed
    Visible(Query),
    /// No element matches the query, or the match is hidden
    Invisible(Query),
    /// The matching element's text contains the given text
    TextContains(Query, String),
    /// The matching element's `value` attribute contains the given text
    ValueContains(Query, String),
    /// The matching element is displayed and enabled
    Clickable(Query),
    /// A JavaScript alert is open
    AlertPresent,
}

impl Condition {
    /// The element query this condition inspects, if any
    pub fn query(&self) -> Option<&Query> {
        match self {
            Condition::Present(q)
            | Condition::Visible(q)
            | Condition::Invisible(q)
            | Condition::TextContains(q, _)
            | Condition::ValueContains(q, _)
            | Condition::Clickable(q) => Some(q),
            _ => None,
        }
    }

    /// Evaluate the condition once.
    ///
    /// A missing or stale element counts as "not satisfied" (or as satisfied
    /// for [`Condition::Invisible`]); other driver errors propagate.
    pub async fn check(&self, driver: &dyn Driver) -> Result<bool> {
        match self.evaluate(driver).await {
            Err(PageError::StaleElement(msg)) => {
                debug!("Stale element while checking {}: {}", self, msg);
                Ok(matches!(self, Condition::Invisible(_)))
            }
            other => other,
        }
    }

    async fn evaluate(&self, driver: &dyn Driver) -> Result<bool> {
        match self {
            Condition::UrlIs(url) => Ok(driver.current_url().await? == *url),
            Condition::UrlContains(text) => Ok(driver.current_url().await?.contains(text.as_str())),
            Condition::TitleIs(title) => Ok(driver.title().await? == *title),
            Condition::TitleContains(text) => Ok(driver.title().await?.contains(text.as_str())),
            Condition::Present(query) => Ok(driver.find(query).await?.is_some()),
            Condition::Visible(query) => match driver.find(query).await? {
                Some(element) => element.is_displayed().await,
                None => Ok(false),
            },
            Condition::Invisible(query) => match driver.find(query).await? {
                Some(element) => element.is_displayed().await.map(|shown| !shown),
                None => Ok(true),
            },
            Condition::TextContains(query, text) => match driver.find(query).await? {
                Some(element) => Ok(element.text().await?.contains(text.as_str())),
                None => Ok(false),
            },
            Condition::ValueContains(query, text) => match driver.find(query).await? {
                Some(element) => Ok(element
                    .attr("value")
                    .await?
                    .is_some_and(|value| value.contains(text.as_str()))),
                None => Ok(false),
            },
            Condition::Clickable(query) => match driver.find(query).await? {
                Some(element) => clickable(&element).await,
                None => Ok(false),
            },
            Condition::AlertPresent => Ok(driver.alert_text().await?.is_some()),
        }
    }

    /// Poll until the condition holds; `false` if `timeout` elapses first
    pub async fn poll(&self, driver: &dyn Driver, timeout: Duration, poll: Duration) -> Result<bool> {
        wait::poll_until(timeout, poll, || self.check(driver)).await
    }

    /// Poll until the condition holds, failing with
    /// [`PageError::ConditionTimeout`] when `timeout` elapses first
    pub async fn wait(&self, driver: &dyn Driver, timeout: Duration, poll: Duration) -> Result<()> {
        if self.poll(driver, timeout, poll).await? {
            Ok(())
        } else {
            Err(PageError::ConditionTimeout {
                condition: self.to_string(),
                timeout,
            })
        }
    }
}

async fn clickable(element: &Element) -> Result<bool> {
    Ok(element.is_displayed().await? && element.is_enabled().await?)
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::UrlIs(url) => write!(f, "url == '{}'", url),
            Condition::UrlContains(text) => write!(f, "url contains '{}'", text),
            Condition::TitleIs(title) => write!(f, "title == '{}'", title),
            Condition::TitleContains(text) => write!(f, "title contains '{}'", text),
            Condition::Present(q) => write!(f, "presence of {}", q),
            Condition::Visible(q) => write!(f, "visibility of {}", q),
            Condition::Invisible(q) => write!(f, "invisibility of {}", q),
            Condition::TextContains(q, text) => write!(f, "text '{}' in {}", text, q),
            Condition::ValueContains(q, text) => write!(f, "value '{}' in {}", text, q),
            Condition::Clickable(q) => write!(f, "{} to be clickable", q),
            Condition::AlertPresent => write!(f, "alert to be present"),
        }
    }
}

#[cfg(test)]
#[path = "condition_test.rs"]
mod condition_test;
