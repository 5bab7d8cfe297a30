//! Page façade: one page template plus waits and window discovery

use rand::Rng;
use std::fmt;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::condition::Condition;
use crate::driver::{Element, SharedDriver};
use crate::errors::{PageError, Result, WaitState};
use crate::locator::Locator;
use crate::matcher::PageMatcher;
use crate::types::{PageConfig, Query, WindowId};
use crate::wait;

const READY_SCRIPT: &str = "return document.readyState";

/// A named page state backed by a [`PageMatcher`]
pub struct Page {
    name: String,
    matcher: PageMatcher,
    config: PageConfig,
}

fn expired(start: Instant, timeout: Option<Duration>) -> Option<Duration> {
    timeout.filter(|limit| start.elapsed() > *limit)
}

impl Page {
    pub fn new(name: impl Into<String>, matcher: PageMatcher) -> Self {
        Page {
            name: name.into(),
            matcher,
            config: PageConfig::default(),
        }
    }

    /// Replace the default timings
    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn matcher(&self) -> &PageMatcher {
        &self.matcher
    }

    pub fn matcher_mut(&mut self) -> &mut PageMatcher {
        &mut self.matcher
    }

    pub fn driver(&self) -> &SharedDriver {
        self.matcher.driver()
    }

    /// Check the page template once, using the configured match timeout
    pub async fn matches(&self, debug: bool) -> Result<bool> {
        self.matches_within(debug, self.config.match_timeout()).await
    }

    /// Check the page template, polling each condition for up to `timeout`
    pub async fn matches_within(&self, debug: bool, timeout: Duration) -> Result<bool> {
        self.matcher
            .matches(timeout, self.config.match_poll(), debug)
            .await
    }

    /// Wait until the page matches, using the configured poll interval and bound
    pub async fn wait_for_match(&self) -> Result<&Self> {
        self.wait_for_match_with(self.config.wait_poll(), self.config.wait_timeout())
            .await
    }

    /// Wait until the page matches. `None` waits forever.
    pub async fn wait_for_match_with(
        &self,
        poll: Duration,
        timeout: Option<Duration>,
    ) -> Result<&Self> {
        info!("Waiting for page to match {}", self.name);
        self.wait_for_state(true, poll, timeout).await?;
        info!("Page matches {}!", self.name);
        Ok(self)
    }

    /// Wait until the page stops matching, using the configured poll interval and bound
    pub async fn wait_for_no_match(&self) -> Result<&Self> {
        self.wait_for_no_match_with(self.config.wait_poll(), self.config.wait_timeout())
            .await
    }

    /// Wait until the page stops matching. `None` waits forever.
    pub async fn wait_for_no_match_with(
        &self,
        poll: Duration,
        timeout: Option<Duration>,
    ) -> Result<&Self> {
        info!("Waiting for page to no longer match {}", self.name);
        self.wait_for_state(false, poll, timeout).await?;
        info!("Page no longer matches {}.", self.name);
        Ok(self)
    }

    async fn wait_for_state(
        &self,
        wanted: bool,
        poll: Duration,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let start = Instant::now();
        while self.matches_within(false, Duration::ZERO).await? != wanted {
            sleep(poll).await;
            if let Some(limit) = expired(start, timeout) {
                let state = if wanted {
                    WaitState::Match
                } else {
                    WaitState::NoMatch
                };
                warn!("Page {} did not {} within {:?}", self.name, state, limit);
                return Err(PageError::WaitTimeout {
                    page: self.name.clone(),
                    timeout: limit,
                    state,
                });
            }
        }
        Ok(())
    }

    /// Wait for `document.readyState == "complete"` with the configured timings
    pub async fn wait_until_ready(&self) -> Result<()> {
        self.wait_until_ready_with(self.config.ready_timeout(), self.config.ready_poll())
            .await
    }

    /// Wait for `document.readyState == "complete"`
    pub async fn wait_until_ready_with(&self, timeout: Duration, poll: Duration) -> Result<()> {
        info!("Waiting until DOM is ready.");
        sleep(self.config.ready_settle()).await;

        let driver = self.driver();
        let ready = wait::poll_until(timeout, poll, || async move {
            let state = driver.execute(READY_SCRIPT).await?;
            Ok(state.as_str() == Some("complete"))
        })
        .await?;

        if !ready {
            warn!("Document for {} not ready within {:?}", self.name, timeout);
            return Err(PageError::WaitTimeout {
                page: self.name.clone(),
                timeout,
                state: WaitState::DocumentReady,
            });
        }

        info!("DOM ready.");
        Ok(())
    }

    /// [`Page::wait_for_match`] followed by [`Page::wait_until_ready`]
    pub async fn wait_until_match_and_ready(&self) -> Result<&Self> {
        self.wait_for_match().await?;
        self.wait_until_ready().await?;
        Ok(self)
    }

    /// Wait for a single ad-hoc condition, e.g. `Condition::Clickable(button.query().clone())`
    pub async fn wait_for(
        &self,
        condition: &Condition,
        timeout: Duration,
        poll: Duration,
    ) -> Result<()> {
        info!("Waiting for {} on {}", condition, self.name);
        let timeout = if timeout.is_zero() {
            Duration::from_millis(100)
        } else {
            timeout
        };
        condition.wait(self.driver().as_ref(), timeout, poll).await
    }

    /// Wait for a locator's element to satisfy `check`, with the configured timings
    pub async fn wait_for_locator(
        &self,
        locator: &Locator,
        check: fn(Query) -> Condition,
    ) -> Result<()> {
        debug!(
            "Waiting for \"{}\" to be found by \"{}\": \"{}\"",
            locator.display_name(),
            locator.by(),
            locator.value()
        );
        self.wait_for(
            &check(locator.query().clone()),
            self.config.wait_for_timeout(),
            self.config.match_poll(),
        )
        .await
    }

    /// Cycle through the open windows until one matches this page, leaving it
    /// selected. `None` keeps scanning forever.
    pub async fn locate_window(&self, timeout: Option<Duration>) -> Result<WindowId> {
        let start = Instant::now();
        info!("Trying to locate window that matches {}", self.name);

        loop {
            for window in self.driver().windows().await? {
                self.driver().switch_to_window(&window).await?;
                if self.matches(true).await? {
                    info!("Found window for {}", self.name);
                    return Ok(window);
                }
                if let Some(limit) = expired(start, timeout) {
                    return Err(PageError::WindowNotFound {
                        page: self.name.clone(),
                        timeout: limit,
                    });
                }
            }

            if let Some(limit) = expired(start, timeout) {
                return Err(PageError::WindowNotFound {
                    page: self.name.clone(),
                    timeout: limit,
                });
            }
            sleep(self.config.wait_poll()).await;
        }
    }

    /// The registered locator called `name`
    pub fn locator(&self, name: &str) -> Result<&Locator> {
        self.matcher.locator(name)
    }

    /// The element behind the locator called `name`, resolving it if needed
    pub async fn get(&self, name: &str) -> Result<Element> {
        self.matcher.get(name).await
    }

    /// Every element behind the locator called `name`
    pub async fn get_all(&self, name: &str) -> Result<Vec<Element>> {
        self.matcher.get_all(name).await
    }

    /// Sleep a random whole number of seconds in `[low, high]`
    pub async fn randomly_wait(low: u64, high: u64) {
        let secs = rand::thread_rng().gen_range(low.min(high)..=high.max(low));
        debug!("Pausing for {}s", secs);
        sleep(Duration::from_secs(secs)).await;
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .finish()
    }
}

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;
