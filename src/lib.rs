//! # pagestate
#![allow(clippy::uninlined_format_args)]
//!
//! Page-state verification and lazy element lookup on top of WebDriver.
//!
//! A page is described once, declaratively, by the conditions that identify
//! it (URL, title, element presence or visibility, element text) and by the
//! elements automation code wants to refer to by name. Element lookups are
//! deferred until first use and cached afterwards.
//!
//! ## Installation
//!
//! ```bash
//! cargo install pagestate
//! ```
//!
//! ## CLI Usage
//!
//! The CLI connects to an already-running geckodriver (port 4444) or
//! chromedriver (port 9515).
//!
//! ```bash
//! # Does the current page look like a Wikipedia search result?
//! pagestate check "https://en.wikipedia.org/w/index.php?search=panda" \
//!     --url-contains "search=" --title-contains "Wikipedia" --present name:search
//!
//! # Wait up to 30 seconds for a login form
//! pagestate check --wait --timeout 30000 --visible id:wpName1 --clickable css:button#wpLoginAttempt
//!
//! # Switch to whichever window shows the checkout page
//! pagestate locate-window --url-contains "/checkout" --timeout 10000
//! ```
//!
//! Results are printed as a single JSON object on stdout; errors are printed
//! as `{"error": true, "message": ..., "exit_code": ...}`.
//!
//! ## Library Usage
//!
//! ```no_run
//! use pagestate::{BrowserType, By, Locator, Page, PageMatcher, SharedDriver, WebDriverSession};
//! use std::sync::Arc;
//!
//! # async fn example() -> pagestate::Result<()> {
//! let session = WebDriverSession::connect(BrowserType::Firefox, None, true).await?;
//! let driver: SharedDriver = Arc::new(session);
//!
//! let mut template = PageMatcher::new(driver.clone());
//! template
//!     .match_partial_url("wikipedia.org/w/index.php?search=")
//!     .match_title("Search - Wikipedia")
//!     .match_presence(Locator::new(driver.clone(), By::Name, "search").named("search_input"))
//!     .add_locator(Locator::new(driver.clone(), By::Id, "pt-login").named("login_link"));
//!
//! let page = Page::new("WikipediaSearch", template);
//! driver.goto("https://en.wikipedia.org/w/index.php?search=").await?;
//! page.wait_until_match_and_ready().await?;
//! page.get("search_input").await?.send_keys("red panda").await?;
//! # Ok(())
//! # }
//! ```

/// Polled page-state predicates
pub mod condition;

/// Async traits every browser backend implements
pub mod driver;

/// Error types and exit codes
pub mod errors;

/// Lazy, cached element references
pub mod locator;

/// Page templates: ordered conditions plus named locators
pub mod matcher;

/// In-memory driver for tests
pub mod mock;

/// Page façade with waits and window discovery
pub mod page;

/// `<select>` helpers
pub mod select;

/// Queries, window ids and timing configuration
pub mod types;

/// Poll-until-true primitive
pub mod wait;

/// fantoccini-backed driver
pub mod webdriver;

pub use condition::Condition;
pub use driver::{Driver, Element, SharedDriver, WebElement};
pub use errors::{PageError, Result, WaitState};
pub use locator::{Graceful, Locator, Resolved};
pub use matcher::PageMatcher;
pub use mock::{MockDriver, MockElement, MockPage};
pub use page::Page;
pub use select::Select;
pub use types::{By, PageConfig, Query, WindowId};
pub use webdriver::{BrowserType, WebDriverSession};
