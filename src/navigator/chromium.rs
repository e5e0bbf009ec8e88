//! Chromium-backed navigator using chromiumoxide.

use super::{ElementHandle, Navigator, NavigatorError, NavigatorLauncher};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long a click may take to start a navigation before it is treated as
/// an in-page action.
const CLICK_NAVIGATION_GRACE: Duration = Duration::from_millis(1500);

impl From<CdpError> for NavigatorError {
    fn from(err: CdpError) -> Self {
        NavigatorError::Protocol(err.to_string())
    }
}

/// Launches a local Chromium and opens a single page on it.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    chrome_path: Option<PathBuf>,
    headless: bool,
    navigation_timeout: Duration,
}

impl ChromiumLauncher {
    /// `chrome_path` of `None` lets chromiumoxide look for an installed browser.
    pub fn new(chrome_path: Option<PathBuf>, headless: bool, navigation_timeout: Duration) -> Self {
        Self {
            chrome_path,
            headless,
            navigation_timeout,
        }
    }
}

#[async_trait]
impl NavigatorLauncher for ChromiumLauncher {
    #[instrument(level = "info", skip_all)]
    async fn launch(&self) -> Result<Box<dyn Navigator>, NavigatorError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if let Some(ref path) = self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if !self.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(NavigatorError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| NavigatorError::Launch(e.to_string()))?;

        // The CDP connection only makes progress while the handler is polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "Browser handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(NavigatorError::Launch(e.to_string()));
            }
        };

        info!("Chromium session started");
        Ok(Box::new(ChromiumNavigator {
            browser,
            page,
            handler_task,
            timeout: self.navigation_timeout,
        }))
    }
}

/// One Chromium page driven over the DevTools protocol.
pub struct ChromiumNavigator {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    timeout: Duration,
}

impl ChromiumNavigator {
    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Let any navigation triggered by the last action finish.
    async fn settle(&self) {
        if tokio::time::timeout(self.timeout, self.page.wait_for_navigation())
            .await
            .is_err()
        {
            warn!(timeout_ms = self.timeout_ms(), "Page did not settle before timeout");
        }
    }

    async fn current_url(&self) -> Option<String> {
        self.page.url().await.ok().flatten()
    }
}

#[async_trait]
impl Navigator for ChromiumNavigator {
    #[instrument(level = "debug", skip(self))]
    async fn navigate(&mut self, url: &str) -> Result<(), NavigatorError> {
        match tokio::time::timeout(self.timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {
                self.settle().await;
                Ok(())
            }
            Ok(Err(e)) => Err(NavigatorError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(NavigatorError::Timeout {
                action: format!("navigation to {url}"),
                timeout_ms: self.timeout_ms(),
            }),
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_until_present(&mut self, selector: &str, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return true;
            }
            if start.elapsed() >= timeout {
                debug!(selector, "Element not present before timeout");
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn current_html(&mut self) -> Result<String, NavigatorError> {
        Ok(self.page.content().await?)
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>, NavigatorError> {
        let elements = self.page.find_elements(selector).await?;
        Ok((0..elements.len())
            .map(|index| ElementHandle::new(selector, index))
            .collect())
    }

    #[instrument(level = "debug", skip(self))]
    async fn click(&mut self, element: &ElementHandle) -> Result<(), NavigatorError> {
        let before = self.current_url().await;
        let elements = self.page.find_elements(element.selector.as_str()).await?;
        let target = elements
            .get(element.index)
            .ok_or_else(|| NavigatorError::ElementNotFound {
                selector: element.selector.clone(),
                index: element.index,
            })?;

        match tokio::time::timeout(self.timeout, target.click()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(NavigatorError::Timeout {
                    action: format!("click on `{}`[{}]", element.selector, element.index),
                    timeout_ms: self.timeout_ms(),
                });
            }
        }

        // Element::click only dispatches input events; a navigation it
        // triggers starts afterwards, and wait_for_navigation resolves at once
        // while the old frame is still loaded.
        let grace = CLICK_NAVIGATION_GRACE.min(self.timeout);
        let start = Instant::now();
        while self.current_url().await == before {
            if start.elapsed() >= grace {
                debug!("Click did not navigate");
                return Ok(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        self.settle().await;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn go_back(&mut self) -> Result<(), NavigatorError> {
        let before = self.current_url().await;
        self.page.evaluate("window.history.back()").await?;

        // history.back() returns before the navigation starts.
        let start = Instant::now();
        while self.current_url().await == before {
            if start.elapsed() >= self.timeout {
                return Err(NavigatorError::Timeout {
                    action: "history back".to_string(),
                    timeout_ms: self.timeout_ms(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        self.settle().await;
        Ok(())
    }

    #[instrument(level = "info", skip_all)]
    async fn close(self: Box<Self>) -> Result<(), NavigatorError> {
        let ChromiumNavigator {
            mut browser,
            page,
            handler_task,
            ..
        } = *self;

        if let Err(e) = page.close().await {
            debug!(error = %e, "Page close failed");
        }
        let closed = browser.close().await;
        match closed {
            Ok(_) => {
                if let Err(e) = browser.wait().await {
                    warn!(error = %e, "Waiting for Chromium to exit failed");
                }
                info!("Chromium session closed");
            }
            Err(ref e) => warn!(error = %e, "Browser close failed"),
        }
        handler_task.abort();
        closed.map(|_| ()).map_err(NavigatorError::from)
    }
}
