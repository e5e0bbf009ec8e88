//! Browser session abstraction shared by the interactive extractors.
//!
//! A [`Navigator`] is one live page: it can load a URL, report the current
//! HTML, click the nth element matching a selector and step back through
//! history. Extractors borrow the session as `&mut dyn Navigator`, so they run
//! one after another against whatever page the previous step left behind.
//!
//! # Implementations
//!
//! | Type | Module | Notes |
//! |------|--------|-------|
//! | [`chromium::ChromiumNavigator`] | [`chromium`] | Headless Chromium over CDP |
//! | `mock::MockNavigator` | `mock` | In-memory pages for tests |

pub mod chromium;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a navigator session.
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("{action} timed out after {timeout_ms}ms")]
    Timeout { action: String, timeout_ms: u64 },

    #[error("no element at index {index} for selector `{selector}`")]
    ElementNotFound { selector: String, index: usize },

    #[error("browser protocol error: {0}")]
    Protocol(String),
}

/// Position of an element among all matches of a selector on the current page.
///
/// Handles are positional rather than live node references: they stay valid
/// only until the page changes, and are resolved again on every click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    pub selector: String,
    pub index: usize,
}

impl ElementHandle {
    pub fn new(selector: &str, index: usize) -> Self {
        Self {
            selector: selector.to_string(),
            index,
        }
    }
}

/// A single stateful browser page.
#[async_trait]
pub trait Navigator: Send {
    /// Load `url` and wait for it to finish loading.
    async fn navigate(&mut self, url: &str) -> Result<(), NavigatorError>;

    /// Poll until `selector` matches something or `timeout` elapses.
    ///
    /// Best-effort readiness probe: returns whether the element appeared and
    /// never fails.
    async fn wait_until_present(&mut self, selector: &str, timeout: Duration) -> bool;

    /// HTML of the page as currently rendered.
    async fn current_html(&mut self) -> Result<String, NavigatorError>;

    /// Handles for every element currently matching `selector`, in document order.
    async fn find_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>, NavigatorError>;

    /// Click the element behind `element` and wait for any resulting load.
    async fn click(&mut self, element: &ElementHandle) -> Result<(), NavigatorError>;

    /// Return to the previous history entry.
    async fn go_back(&mut self) -> Result<(), NavigatorError>;

    /// Tear the session down.
    async fn close(self: Box<Self>) -> Result<(), NavigatorError>;
}

/// Creates navigator sessions.
#[async_trait]
pub trait NavigatorLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Navigator>, NavigatorError>;
}
