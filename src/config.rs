//! Viewer configuration, stored as TOML.
//!
//! Every section has defaults, so a partial file (or none at all) is valid:
//! - `log`: log level for the `swu_deckview` target
//! - `sets`: canonical set order
//! - `catalog`: where per-set card files live
//! - `deck_api`: deck source and CORS-proxy chain
//! - `fetch`: retry and timeout policy
//! - `recent`: recent-decks file and capacity

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cards::SetOrder;
use crate::deck::recent::DEFAULT_CAPACITY;
use crate::error::ConfigError;
use crate::fetch::{fetcher_for, HttpFetcher, JsonFetcher, RetryPolicy};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetsConfig {
    pub order: SetOrder,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory or http(s) base holding `<set>.json`.
    pub data_root: String,
    /// Upstream card API used to refresh the data files.
    pub card_api: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_root: "data".to_string(),
            card_api: "https://api.swu-db.com/cards".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckApiConfig {
    pub base_url: String,
    /// Public deck page, used to build shareable links.
    pub deck_page_url: String,
    pub use_proxy: bool,
    pub proxies: Vec<String>,
}

impl Default for DeckApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://swudb.com/api/getDeckJson".to_string(),
            deck_page_url: "https://swudb.com/deck".to_string(),
            use_proxy: false,
            proxies: vec![
                "https://api.allorigins.win/raw?url=".to_string(),
                "https://api.allorigins.win/get?url=".to_string(),
                "https://thingproxy.freeboard.io/fetch/".to_string(),
                "https://cors.bridged.cc/".to_string(),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentConfig {
    pub path: String,
    pub capacity: usize,
}

impl Default for RecentConfig {
    fn default() -> Self {
        Self {
            path: "recent_decks.json".to_string(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Complete viewer configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub log: LogConfig,
    pub sets: SetsConfig,
    pub catalog: CatalogConfig,
    pub deck_api: DeckApiConfig,
    pub fetch: RetryPolicy,
    pub recent: RecentConfig,
}

impl ViewerConfig {
    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Write this configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read `path`, or write the defaults there when it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        info!(path = %path.display(), "wrote default config");
        Ok(config)
    }

    #[must_use]
    pub fn set_order(&self) -> &SetOrder {
        &self.sets.order
    }

    /// Fetcher for per-set card files under `catalog.data_root`.
    #[must_use]
    pub fn catalog_fetcher(&self) -> Arc<dyn JsonFetcher> {
        fetcher_for(&self.catalog.data_root, self.fetch.clone())
    }

    /// Fetcher for the deck API, going through the proxy chain when enabled.
    #[must_use]
    pub fn deck_fetcher(&self) -> Arc<dyn JsonFetcher> {
        let fetcher = if self.deck_api.use_proxy {
            HttpFetcher::proxied(self.fetch.clone(), &self.deck_api.proxies)
        } else {
            HttpFetcher::direct(self.fetch.clone())
        };
        Arc::new(fetcher.bust_cache(true))
    }

    /// Public page of a deck.
    #[must_use]
    pub fn deck_page(&self, deck_id: &str) -> String {
        format!("{}/{}", self.deck_api.deck_page_url.trim_end_matches('/'), deck_id)
    }
}
