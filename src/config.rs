use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_URL: &str = "https://webscraper.io/test-sites/e-commerce/static/computers/laptops";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

const CONFIG_FILE: &str = "laptop_scraper";
const ENV_PREFIX: &str = "LAPTOP_SCRAPER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            url: DEFAULT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `laptop_scraper.toml` if present, then `LAPTOP_SCRAPER_*` env vars.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("url", DEFAULT_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("cache_ttl_secs", DEFAULT_CACHE_TTL_SECS)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read settings")?;

        settings
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
