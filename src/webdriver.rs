//! WebDriver-backed implementation of the driver traits
//!
//! [`WebDriverSession`] wraps a fantoccini [`Client`] connected to an
//! already-running geckodriver or chromedriver.

use async_trait::async_trait;
use fantoccini::elements::Element as WdElementHandle;
use fantoccini::error::CmdError;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

use crate::driver::{Driver, Element, WebElement};
use crate::errors::{PageError, Result};
use crate::types::{By, Query, WindowId};

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = PageError;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => Err(PageError::Config(format!("Unsupported browser: {}", s))),
        }
    }
}

impl BrowserType {
    /// Default WebDriver URL for this browser type
    pub fn default_webdriver_url(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "http://localhost:4444",
            BrowserType::Chrome => "http://localhost:9515",
        }
    }

    fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }

    /// Session capabilities for this browser
    pub fn capabilities(&self, headless: bool) -> serde_json::Map<String, Value> {
        let mut caps = serde_json::Map::new();

        match self {
            BrowserType::Firefox => {
                let mut args = Vec::new();
                if headless {
                    args.push("--headless".to_string());
                }
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
            BrowserType::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
        }

        caps
    }
}

/// How a [`Query`] is sent over the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selector {
    Css(String),
    Id(String),
    XPath(String),
    LinkText(String),
}

impl Selector {
    /// Strategies WebDriver does not support natively are rewritten as CSS or XPath
    pub(crate) fn from_query(query: &Query) -> Self {
        let value = query.value.as_str();
        match query.by {
            By::Id => Selector::Id(value.to_string()),
            By::Css => Selector::Css(value.to_string()),
            By::XPath => Selector::XPath(value.to_string()),
            By::LinkText => Selector::LinkText(value.to_string()),
            By::Name => Selector::Css(format!("[name=\"{}\"]", value.replace('"', "\\\""))),
            By::ClassName => Selector::Css(format!(".{}", value)),
            By::TagName => Selector::Css(value.to_string()),
            By::PartialLinkText => Selector::XPath(format!(
                ".//a[contains(text(), {})]",
                xpath_literal(value)
            )),
        }
    }

    fn locator(&self) -> WdLocator<'_> {
        match self {
            Selector::Css(s) => WdLocator::Css(s),
            Selector::Id(s) => WdLocator::Id(s),
            Selector::XPath(s) => WdLocator::XPath(s),
            Selector::LinkText(s) => WdLocator::LinkText(s),
        }
    }
}

fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

fn command_error(err: CmdError) -> PageError {
    let message = err.to_string();
    if message.to_lowercase().contains("stale element") {
        PageError::StaleElement(message)
    } else {
        PageError::Driver(message)
    }
}

/// Turn a lookup result into `None` when WebDriver reports "no such element"
fn found(result: std::result::Result<WdElementHandle, CmdError>) -> Result<Option<Element>> {
    match result {
        Ok(element) => Ok(Some(Arc::new(WdElement(element)) as Element)),
        Err(err) if err.is_miss() => Ok(None),
        Err(err) => Err(command_error(err)),
    }
}

fn found_all(result: std::result::Result<Vec<WdElementHandle>, CmdError>) -> Result<Vec<Element>> {
    match result {
        Ok(elements) => Ok(elements
            .into_iter()
            .map(|element| Arc::new(WdElement(element)) as Element)
            .collect()),
        Err(err) if err.is_miss() => Ok(Vec::new()),
        Err(err) => Err(command_error(err)),
    }
}

/// A connected WebDriver session
pub struct WebDriverSession {
    client: Client,
    browser_type: BrowserType,
}

impl WebDriverSession {
    /// Connect to the WebDriver at `webdriver_url`, or the browser's default URL
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `webdriver_url` - Optional WebDriver endpoint
    /// * `headless` - Whether to run in headless mode
    pub async fn connect(
        browser_type: BrowserType,
        webdriver_url: Option<&str>,
        headless: bool,
    ) -> Result<Self> {
        let webdriver_url = webdriver_url.unwrap_or(browser_type.default_webdriver_url());
        info!("Connecting to {:?} WebDriver", browser_type);

        if !Self::is_webdriver_running(webdriver_url).await {
            let driver_name = browser_type.driver_name();
            return Err(PageError::Driver(format!(
                "Cannot connect to {} WebDriver at {}.\n\
                Please ensure {} is running:\n\
                  For Firefox: geckodriver --port 4444\n\
                  For Chrome: chromedriver --port 9515",
                driver_name, webdriver_url, driver_name
            )));
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(browser_type.capabilities(headless))
            .connect(webdriver_url)
            .await
            .map_err(|e| PageError::Driver(format!("Failed to connect to WebDriver: {}", e)))?;

        Ok(WebDriverSession {
            client,
            browser_type,
        })
    }

    /// Whether a WebDriver answers on `{url}/status`
    pub async fn is_webdriver_running(url: &str) -> bool {
        let status_url = format!("{}/status", url.trim_end_matches('/'));

        match reqwest::get(&status_url).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// End the session
    pub async fn close(&self) -> Result<()> {
        self.client.clone().close().await.map_err(PageError::driver)
    }
}

#[async_trait]
impl Driver for WebDriverSession {
    async fn find(&self, query: &Query) -> Result<Option<Element>> {
        let selector = Selector::from_query(query);
        found(self.client.find(selector.locator()).await)
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<Element>> {
        let selector = Selector::from_query(query);
        found_all(self.client.find_all(selector.locator()).await)
    }

    async fn current_url(&self) -> Result<String> {
        let url = self.client.current_url().await.map_err(command_error)?;
        Ok(url.to_string())
    }

    async fn title(&self) -> Result<String> {
        self.client.title().await.map_err(command_error)
    }

    async fn execute(&self, script: &str) -> Result<Value> {
        self.client
            .execute(script, vec![])
            .await
            .map_err(command_error)
    }

    async fn windows(&self) -> Result<Vec<WindowId>> {
        let handles = self.client.windows().await.map_err(command_error)?;
        Ok(handles
            .into_iter()
            .map(|handle| WindowId(String::from(handle)))
            .collect())
    }

    async fn switch_to_window(&self, window: &WindowId) -> Result<()> {
        let handle = WindowHandle::try_from(window.as_str().to_string())
            .map_err(|e| PageError::Driver(format!("invalid window handle {}: {}", window, e)))?;
        self.client
            .switch_to_window(handle)
            .await
            .map_err(command_error)
    }

    async fn alert_text(&self) -> Result<Option<String>> {
        match self.client.get_alert_text().await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.to_string().to_lowercase().contains("no such alert") => Ok(None),
            Err(err) => Err(command_error(err)),
        }
    }

    async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.client.goto(url).await.map_err(command_error)
    }
}

/// An element found through a [`WebDriverSession`]
#[derive(Debug)]
pub struct WdElement(WdElementHandle);

#[async_trait]
impl WebElement for WdElement {
    fn id(&self) -> String {
        self.0.element_id().to_string()
    }

    async fn find(&self, query: &Query) -> Result<Option<Element>> {
        let selector = Selector::from_query(query);
        found(self.0.find(selector.locator()).await)
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<Element>> {
        let selector = Selector::from_query(query);
        found_all(self.0.find_all(selector.locator()).await)
    }

    async fn click(&self) -> Result<()> {
        self.0.click().await.map_err(command_error)
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.0.send_keys(text).await.map_err(command_error)
    }

    async fn clear(&self) -> Result<()> {
        self.0.clear().await.map_err(command_error)
    }

    async fn text(&self) -> Result<String> {
        self.0.text().await.map_err(command_error)
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        self.0.attr(name).await.map_err(command_error)
    }

    async fn prop(&self, name: &str) -> Result<Option<String>> {
        self.0.prop(name).await.map_err(command_error)
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.0.is_displayed().await.map_err(command_error)
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.0.is_enabled().await.map_err(command_error)
    }

    async fn tag_name(&self) -> Result<String> {
        self.0.tag_name().await.map_err(command_error)
    }
}

#[cfg(test)]
#[path = "webdriver_test.rs"]
mod webdriver_test;
