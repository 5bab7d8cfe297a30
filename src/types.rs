use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::errors::{PageError, Result};

/// Element lookup strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// Single CSS class name
    ClassName,
    /// Tag name such as `option`
    TagName,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Exact anchor text
    LinkText,
    /// Substring of anchor text
    PartialLinkText,
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            By::Id => "id",
            By::Name => "name",
            By::ClassName => "class name",
            By::TagName => "tag name",
            By::Css => "css selector",
            By::XPath => "xpath",
            By::LinkText => "link text",
            By::PartialLinkText => "partial link text",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for By {
    type Err = PageError;

    /// Parse strategy from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "id" => Ok(By::Id),
            "name" => Ok(By::Name),
            "class" | "class name" => Ok(By::ClassName),
            "tag" | "tag name" => Ok(By::TagName),
            "css" | "css selector" => Ok(By::Css),
            "xpath" => Ok(By::XPath),
            "link" | "link text" => Ok(By::LinkText),
            "partial link" | "partial link text" => Ok(By::PartialLinkText),
            _ => Err(PageError::Config(format!("Unsupported strategy: {}", s))),
        }
    }
}

/// A strategy plus the string it locates by
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Query {
    pub by: By,
    pub value: String,
}

impl Query {
    pub fn new(by: By, value: impl Into<String>) -> Self {
        Query {
            by,
            value: value.into(),
        }
    }

    pub fn css(value: impl Into<String>) -> Self {
        Query::new(By::Css, value)
    }

    /// Parse a query from "STRATEGY:VALUE" format (e.g., "css:div.main", "name:q")
    pub fn parse(s: &str) -> Result<Self> {
        let (by, value) = s.split_once(':').ok_or_else(|| {
            PageError::Config(format!(
                "Invalid query '{}'. Use STRATEGY:VALUE (e.g., css:div.main)",
                s
            ))
        })?;

        if value.is_empty() {
            return Err(PageError::Config(format!("Empty locating string in '{}'", s)));
        }

        Ok(Query::new(by.parse()?, value))
    }
}

impl std::str::FromStr for Query {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self> {
        Query::parse(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}'", self.by, self.value)
    }
}

/// Opaque browser window/tab handle
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(s: &str) -> Self {
        WindowId(s.to_string())
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default timings used by [`crate::Page`]
///
/// All values are milliseconds. `None` for an optional bound means "wait
/// forever".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// How long each predicate may poll inside a single `matches` call
    pub match_timeout_ms: u64,
    /// Poll interval for predicate checks
    pub match_poll_ms: u64,
    /// Poll interval of `wait_for_match` / `wait_for_no_match`
    pub wait_poll_ms: u64,
    /// Overall bound of `wait_for_match` / `wait_for_no_match`
    pub wait_timeout_ms: Option<u64>,
    /// Bound of `wait_until_ready`
    pub ready_timeout_ms: u64,
    /// Poll interval of `wait_until_ready`
    pub ready_poll_ms: u64,
    /// Pause before the first readiness probe
    pub ready_settle_ms: u64,
    /// Bound of `wait_for`
    pub wait_for_timeout_ms: u64,
    /// Bound of `locate_window`
    pub locate_timeout_ms: Option<u64>,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            match_timeout_ms: 10,
            match_poll_ms: 100,
            wait_poll_ms: 100,
            wait_timeout_ms: None,
            ready_timeout_ms: 60_000,
            ready_poll_ms: 500,
            ready_settle_ms: 1_000,
            wait_for_timeout_ms: 5_000,
            locate_timeout_ms: None,
        }
    }
}

impl PageConfig {
    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn match_timeout(&self) -> Duration {
        Duration::from_millis(self.match_timeout_ms)
    }

    pub fn match_poll(&self) -> Duration {
        Duration::from_millis(self.match_poll_ms)
    }

    pub fn wait_poll(&self) -> Duration {
        Duration::from_millis(self.wait_poll_ms)
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn ready_poll(&self) -> Duration {
        Duration::from_millis(self.ready_poll_ms)
    }

    pub fn ready_settle(&self) -> Duration {
        Duration::from_millis(self.ready_settle_ms)
    }

    pub fn wait_for_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_for_timeout_ms)
    }

    pub fn locate_timeout(&self) -> Option<Duration> {
        self.locate_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
