//! Driver seam
//!
//! Everything this crate needs from a browser is expressed by the two traits
//! below. [`crate::webdriver::WebDriverSession`] implements them over a real
//! WebDriver endpoint and [`crate::mock::MockDriver`] implements them in memory.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::errors::Result;
use crate::types::{Query, WindowId};

/// Shared handle to a located element
pub type Element = Arc<dyn WebElement>;

/// Shared handle to a driver
pub type SharedDriver = Arc<dyn Driver>;

/// An element that was found on the page
#[async_trait]
pub trait WebElement: Send + Sync + fmt::Debug {
    /// Driver-assigned identity of this element
    fn id(&self) -> String;

    /// Find the first descendant matching `query`
    async fn find(&self, query: &Query) -> Result<Option<Element>>;

    /// Find all descendants matching `query`, in document order
    async fn find_all(&self, query: &Query) -> Result<Vec<Element>>;

    async fn click(&self) -> Result<()>;

    async fn send_keys(&self, text: &str) -> Result<()>;

    async fn clear(&self) -> Result<()>;

    /// Rendered text of the element
    async fn text(&self) -> Result<String>;

    /// HTML attribute value
    async fn attr(&self, name: &str) -> Result<Option<String>>;

    /// DOM property value, stringified
    async fn prop(&self, name: &str) -> Result<Option<String>>;

    async fn is_displayed(&self) -> Result<bool>;

    async fn is_enabled(&self) -> Result<bool>;

    async fn tag_name(&self) -> Result<String>;
}

/// Browser session operations used by locators and page matching
#[async_trait]
pub trait Driver: Send + Sync {
    /// Find the first element matching `query` from the document root
    async fn find(&self, query: &Query) -> Result<Option<Element>>;

    /// Find all elements matching `query` from the document root
    async fn find_all(&self, query: &Query) -> Result<Vec<Element>>;

    async fn current_url(&self) -> Result<String>;

    async fn title(&self) -> Result<String>;

    /// Execute a synchronous script and return its JSON result
    async fn execute(&self, script: &str) -> Result<serde_json::Value>;

    /// Handles of all open windows and tabs
    async fn windows(&self) -> Result<Vec<WindowId>>;

    async fn switch_to_window(&self, window: &WindowId) -> Result<()>;

    /// Text of the open alert, or `None` when no alert is open
    async fn alert_text(&self) -> Result<Option<String>>;

    async fn goto(&self, url: &str) -> Result<()>;
}
