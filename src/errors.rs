use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::types::By;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PageError>;

/// The page state a [`crate::Page`] wait was trying to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// Waiting for the page template to match
    Match,
    /// Waiting for the page template to stop matching
    NoMatch,
    /// Waiting for `document.readyState == "complete"`
    DocumentReady,
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitState::Match => write!(f, "match"),
            WaitState::NoMatch => write!(f, "stop matching"),
            WaitState::DocumentReady => write!(f, "report document ready"),
        }
    }
}

/// Error type for locator resolution, page matching and waits
#[derive(Debug, Error)]
pub enum PageError {
    /// Single-element resolution found nothing (exit code 2)
    #[error("{name} unable to locate element by {by}, with locator '{value}'")]
    NotFound { name: String, by: By, value: String },

    /// Named access for a name that was never registered (exit code 2)
    #[error("no locator named \"{0}\" is registered on this page")]
    UnknownReference(String),

    /// A page wait ran past its bound (exit code 5)
    #[error("page {page} did not {state} within {timeout:?}")]
    WaitTimeout {
        page: String,
        timeout: Duration,
        state: WaitState,
    },

    /// No window handle matched the page template in time (exit code 5)
    #[error("cannot locate window handle matching {page} in {timeout:?}")]
    WindowNotFound { page: String, timeout: Duration },

    /// A single condition did not hold in time (exit code 5)
    #[error("timed out after {timeout:?} waiting for {condition}")]
    ConditionTimeout { condition: String, timeout: Duration },

    /// The element went away between lookup and use
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// Select adaptation applied to something that is not a `<select>`
    #[error("select only works on <select> elements, not on <{0}>")]
    UnexpectedTag(String),

    /// No `<option>` satisfied a select request
    #[error("cannot locate option {0}")]
    NoSuchOption(String),

    /// WebDriver command or connection failure (exit code 4)
    #[error("WebDriver command failed: {0}")]
    Driver(String),

    /// Bad query string or configuration file
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PageError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PageError::NotFound { .. } | PageError::UnknownReference(_) => 2,
            PageError::Driver(_) => 4,
            PageError::WaitTimeout { .. }
            | PageError::WindowNotFound { .. }
            | PageError::ConditionTimeout { .. } => 5,
            _ => 1,
        }
    }

    /// Whether this is the "element does not exist" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, PageError::NotFound { .. })
    }

    pub(crate) fn driver(err: impl fmt::Display) -> Self {
        PageError::Driver(err.to_string())
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Config(err.to_string())
    }
}

impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        PageError::Config(err.to_string())
    }
}
