use anyhow::Result;
use clap::Args;
use tracing::debug;

use pagestate::{Locator, PageMatcher, Query, SharedDriver};

/// Conditions that together describe the expected page
#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    /// Page name used in log messages and output
    #[arg(long, default_value = "page")]
    pub name: String,

    /// Current URL must equal this
    #[arg(long = "url", value_name = "URL")]
    pub url_is: Option<String>,

    /// Current URL must contain this (repeatable)
    #[arg(long, value_name = "TEXT")]
    pub url_contains: Vec<String>,

    /// Page title must equal this
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Page title must contain this (repeatable)
    #[arg(long, value_name = "TEXT")]
    pub title_contains: Vec<String>,

    /// Element must exist (STRATEGY:VALUE, e.g. name:search)
    #[arg(long, value_name = "QUERY")]
    pub present: Vec<Query>,

    /// Element must exist and be displayed
    #[arg(long, value_name = "QUERY")]
    pub visible: Vec<Query>,

    /// Element must be absent or hidden
    #[arg(long, value_name = "QUERY")]
    pub invisible: Vec<Query>,

    /// Element must be displayed and enabled
    #[arg(long, value_name = "QUERY")]
    pub clickable: Vec<Query>,

    /// A JavaScript alert must be open
    #[arg(long)]
    pub alert: bool,
}

impl TemplateArgs {
    /// Fail unless at least one condition flag was given
    pub fn ensure_conditions(&self) -> Result<()> {
        let empty = self.url_is.is_none()
            && self.url_contains.is_empty()
            && self.title.is_none()
            && self.title_contains.is_empty()
            && self.present.is_empty()
            && self.visible.is_empty()
            && self.invisible.is_empty()
            && self.clickable.is_empty()
            && !self.alert;
        if empty {
            anyhow::bail!(
                "No page conditions given. Use --url, --url-contains, --title, --title-contains, \
                 --present, --visible, --invisible, --clickable or --alert"
            );
        }
        Ok(())
    }

    /// Assemble the page template. Element conditions register their locator
    /// under the query's display form, e.g. `name='search'`.
    pub fn build(&self, driver: SharedDriver) -> Result<PageMatcher> {
        self.ensure_conditions()?;
        let mut matcher = PageMatcher::new(driver.clone());
        let locator = |query: &Query| {
            Locator::from_query(driver.clone(), query.clone()).named(query.to_string())
        };

        if let Some(url) = &self.url_is {
            matcher.match_url(url.as_str());
        }
        for text in &self.url_contains {
            matcher.match_partial_url(text.as_str());
        }
        if let Some(title) = &self.title {
            matcher.match_title(title.as_str());
        }
        for text in &self.title_contains {
            matcher.match_partial_title(text.as_str());
        }
        for query in &self.present {
            matcher.match_presence(locator(query));
        }
        for query in &self.visible {
            matcher.match_visibility(locator(query));
        }
        for query in &self.invisible {
            matcher.match_invisibility(locator(query));
        }
        for query in &self.clickable {
            matcher.match_clickable_element(locator(query));
        }
        if self.alert {
            matcher.match_alert_present();
        }

        debug!("Built template {} with {} condition(s)", self.name, matcher.len());
        Ok(matcher)
    }
}
