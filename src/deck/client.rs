//! Loading decks from the deck API.

use std::sync::Arc;

use reqwest::Url;
use tracing::{info, instrument};

use super::model::Deck;
use crate::error::DeckLoadError;
use crate::fetch::JsonFetcher;

/// Extract a deck id from a deck page URL or a bare id.
///
/// The id is the last non-empty path segment.
///
/// ## Example
///
/// ```
/// use swu_deckview::deck::deck_id_from_url;
///
/// assert_eq!(deck_id_from_url("https://swudb.com/deck/AbC123").as_deref(), Some("AbC123"));
/// assert_eq!(deck_id_from_url("AbC123").as_deref(), Some("AbC123"));
/// assert_eq!(deck_id_from_url("  "), None);
/// ```
#[must_use]
pub fn deck_id_from_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(input) {
        if let Some(segments) = url.path_segments() {
            return segments
                .filter(|s| !s.is_empty())
                .last()
                .map(str::to_string);
        }
    }
    input
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Fetches and validates decks.
#[derive(Clone)]
pub struct DeckClient {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl DeckClient {
    /// Create a client requesting `<base_url>/<deck_id>`.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// API URL of a deck.
    #[must_use]
    pub fn deck_url(&self, deck_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), deck_id)
    }

    /// Load a deck given its page URL or id.
    #[instrument(name = "load_deck", skip(self))]
    pub async fn load(&self, deck: &str) -> Result<Deck, DeckLoadError> {
        let deck_id = deck_id_from_url(deck).ok_or(DeckLoadError::MissingDeckId)?;
        let payload = self.fetcher.fetch_json(&self.deck_url(&deck_id)).await?;
        let deck = Deck::from_payload(&deck_id, &payload)?;
        info!(
            deck_id = %deck_id,
            name = deck.name(),
            main = deck.main.len(),
            sideboard = deck.sideboard.len(),
            "loaded deck"
        );
        Ok(deck)
    }
}
