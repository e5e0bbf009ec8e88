//! Page URLs and timeouts used by a scrape run.
//!
//! Defaults point at the live Mars sites. A YAML file may override any subset
//! of fields:
//!
//! ```yaml
//! news_url: https://redplanetscience.com
//! wait_timeout_ms: 2000
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// News listing page.
    pub news_url: String,
    /// Featured image gallery. Also the base for the relative image path.
    pub image_url: String,
    /// Page holding the Mars vs. Earth table.
    pub facts_url: String,
    /// Hemisphere catalog. Also the base for the relative image paths.
    pub hemispheres_url: String,
    /// Best-effort wait for an element to render.
    pub wait_timeout_ms: u64,
    /// Upper bound on a single navigation, click or HTTP fetch.
    pub navigation_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_url: "https://redplanetscience.com".to_string(),
            image_url: "https://spaceimages-mars.com".to_string(),
            facts_url: "https://galaxyfacts-mars.com".to_string(),
            hemispheres_url: "https://marshemispheres.com".to_string(),
            wait_timeout_ms: 1000,
            navigation_timeout_ms: 30_000,
        }
    }
}

impl Config {
    /// Load a config file, falling back to defaults for missing fields.
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Every page URL must be absolute.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        for (field, value) in [
            ("news_url", &self.news_url),
            ("image_url", &self.image_url),
            ("facts_url", &self.facts_url),
            ("hemispheres_url", &self.hemispheres_url),
        ] {
            Url::parse(value).map_err(|e| format!("{field}: invalid URL {value:?}: {e}"))?;
        }
        Ok(())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}
