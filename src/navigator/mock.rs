//! In-memory navigator for tests.
//!
//! A [`MockSite`] maps URLs to HTML and `(url, selector, index)` clicks to
//! what they do. [`MockNavigator`] walks that site with a history stack, so
//! extractors see the same navigate/click/back behavior they would in a real
//! browser.

use super::{ElementHandle, Navigator, NavigatorError, NavigatorLauncher};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Effect of clicking an element.
#[derive(Debug, Clone)]
pub enum ClickAction {
    /// Load another page of the site, pushing a history entry.
    Navigate(String),
    /// Like `Navigate`, but the new page only lands once the caller waits for
    /// an element; until then the old page is still current.
    NavigateSlowly(String),
    /// Replace the current page's HTML in place (e.g. a lightbox opening).
    Reveal(String),
    /// The click itself errors.
    Fail,
}

#[derive(Debug, Clone, Default)]
pub struct MockSite {
    pages: HashMap<String, String>,
    clicks: HashMap<(String, String, usize), ClickAction>,
    back_fails: HashSet<String>,
}

impl MockSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn on_click(mut self, url: &str, selector: &str, index: usize, action: ClickAction) -> Self {
        self.clicks
            .insert((url.to_string(), selector.to_string(), index), action);
        self
    }

    /// Make history back fail while `url` is the current page.
    pub fn fail_back_from(mut self, url: &str) -> Self {
        self.back_fails.insert(url.to_string());
        self
    }
}

/// Counters shared between a launcher and the sessions it hands out.
#[derive(Debug, Default)]
pub struct SessionStats {
    pub launched: AtomicUsize,
    pub closed: AtomicUsize,
    pub navigations: AtomicUsize,
}

pub struct MockNavigator {
    site: Arc<MockSite>,
    history: Vec<(String, String)>,
    pending: Option<String>,
    stats: Arc<SessionStats>,
}

impl MockNavigator {
    pub fn new(site: MockSite) -> Self {
        Self::with_stats(Arc::new(site), Arc::new(SessionStats::default()))
    }

    fn with_stats(site: Arc<MockSite>, stats: Arc<SessionStats>) -> Self {
        Self {
            site,
            history: Vec::new(),
            pending: None,
            stats,
        }
    }

    fn current(&self) -> Option<&(String, String)> {
        self.history.last()
    }

    fn count_matches(&self, selector: &str) -> Result<usize, NavigatorError> {
        let selector = Selector::parse(selector)
            .map_err(|e| NavigatorError::Protocol(format!("invalid selector: {e}")))?;
        Ok(match self.current() {
            Some((_, html)) => Html::parse_document(html).select(&selector).count(),
            None => 0,
        })
    }

    fn load(&mut self, url: &str) -> Result<(), NavigatorError> {
        let html = self
            .site
            .pages
            .get(url)
            .ok_or_else(|| NavigatorError::Navigation {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            })?;
        self.history.push((url.to_string(), html.clone()));
        self.stats.navigations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Navigator for MockNavigator {
    async fn navigate(&mut self, url: &str) -> Result<(), NavigatorError> {
        self.pending = None;
        self.load(url)
    }

    async fn wait_until_present(&mut self, selector: &str, _timeout: Duration) -> bool {
        if let Some(target) = self.pending.take() {
            if self.load(&target).is_err() {
                return false;
            }
        }
        self.count_matches(selector).map(|n| n > 0).unwrap_or(false)
    }

    async fn current_html(&mut self) -> Result<String, NavigatorError> {
        Ok(self.current().map(|(_, html)| html.clone()).unwrap_or_default())
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>, NavigatorError> {
        let count = self.count_matches(selector)?;
        Ok((0..count).map(|i| ElementHandle::new(selector, i)).collect())
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), NavigatorError> {
        if element.index >= self.count_matches(&element.selector)? {
            return Err(NavigatorError::ElementNotFound {
                selector: element.selector.clone(),
                index: element.index,
            });
        }
        let url = self.current().map(|(url, _)| url.clone()).unwrap_or_default();
        let key = (url, element.selector.clone(), element.index);
        match self.site.clicks.get(&key).cloned() {
            Some(ClickAction::Navigate(target)) => self.load(&target),
            Some(ClickAction::NavigateSlowly(target)) => {
                self.pending = Some(target);
                Ok(())
            }
            Some(ClickAction::Reveal(html)) => {
                if let Some(entry) = self.history.last_mut() {
                    entry.1 = html;
                }
                Ok(())
            }
            Some(ClickAction::Fail) => Err(NavigatorError::Protocol(
                "element is not clickable".to_string(),
            )),
            None => Ok(()),
        }
    }

    async fn go_back(&mut self) -> Result<(), NavigatorError> {
        let current = self.current().map(|(url, _)| url.as_str()).unwrap_or_default();
        if self.site.back_fails.contains(current) {
            return Err(NavigatorError::Timeout {
                action: "history back".to_string(),
                timeout_ms: 0,
            });
        }
        if self.history.len() < 2 {
            return Err(NavigatorError::Navigation {
                url: "history".to_string(),
                message: "no previous entry".to_string(),
            });
        }
        self.history.pop();
        // Going back reloads the original markup, discarding in-page changes.
        if let Some((url, html)) = self.history.last_mut() {
            if let Some(original) = self.site.pages.get(url.as_str()) {
                *html = original.clone();
            }
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), NavigatorError> {
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out [`MockNavigator`] sessions over one shared site.
pub struct MockLauncher {
    site: Arc<MockSite>,
    pub stats: Arc<SessionStats>,
    fail: bool,
}

impl MockLauncher {
    pub fn new(site: MockSite) -> Self {
        Self {
            site: Arc::new(site),
            stats: Arc::new(SessionStats::default()),
            fail: false,
        }
    }

    /// A launcher whose every launch fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(MockSite::new())
        }
    }
}

#[async_trait]
impl NavigatorLauncher for MockLauncher {
    async fn launch(&self) -> Result<Box<dyn Navigator>, NavigatorError> {
        if self.fail {
            return Err(NavigatorError::Launch("browser binary not found".to_string()));
        }
        self.stats.launched.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockNavigator::with_stats(
            Arc::clone(&self.site),
            Arc::clone(&self.stats),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> MockSite {
        MockSite::new()
            .page("https://a.test", r#"<a class="x">1</a><a class="x">2</a>"#)
            .page("https://b.test", "<h2>B</h2>")
            .on_click("https://a.test", "a.x", 1, ClickAction::Navigate("https://b.test".to_string()))
            .on_click("https://a.test", "a.x", 0, ClickAction::Reveal("<img class=\"big\">".to_string()))
    }

    #[tokio::test]
    async fn test_click_navigate_and_back() {
        let mut nav = MockNavigator::new(site());
        nav.navigate("https://a.test").await.unwrap();
        let links = nav.find_all("a.x").await.unwrap();
        assert_eq!(links.len(), 2);

        nav.click(&links[1]).await.unwrap();
        assert_eq!(nav.current_html().await.unwrap(), "<h2>B</h2>");

        nav.go_back().await.unwrap();
        assert_eq!(nav.find_all("a.x").await.unwrap().len(), 2);
        assert!(nav.go_back().await.is_err());
    }

    #[tokio::test]
    async fn test_reveal_replaces_current_html() {
        let mut nav = MockNavigator::new(site());
        nav.navigate("https://a.test").await.unwrap();
        nav.click(&ElementHandle::new("a.x", 0)).await.unwrap();
        assert!(nav.wait_until_present("img.big", Duration::ZERO).await);
    }

    #[tokio::test]
    async fn test_slow_navigation_lands_on_wait() {
        let site = site().on_click(
            "https://a.test",
            "a.x",
            1,
            ClickAction::NavigateSlowly("https://b.test".to_string()),
        );
        let mut nav = MockNavigator::new(site);
        nav.navigate("https://a.test").await.unwrap();
        nav.click(&ElementHandle::new("a.x", 1)).await.unwrap();
        assert!(nav.current_html().await.unwrap().contains("a class"));

        assert!(nav.wait_until_present("h2", Duration::ZERO).await);
        assert_eq!(nav.current_html().await.unwrap(), "<h2>B</h2>");
    }

    #[tokio::test]
    async fn test_click_out_of_range_and_unknown_page() {
        let mut nav = MockNavigator::new(site());
        assert!(nav.navigate("https://missing.test").await.is_err());
        nav.navigate("https://a.test").await.unwrap();
        let err = nav.click(&ElementHandle::new("a.x", 5)).await.unwrap_err();
        assert!(matches!(err, NavigatorError::ElementNotFound { index: 5, .. }));
    }
}
