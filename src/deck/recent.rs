//! Bounded, most-recent-first list of viewed decks.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::client::deck_id_from_url;
use super::model::Deck;
use crate::cards::CardMetadata;

/// Default number of remembered decks.
pub const DEFAULT_CAPACITY: usize = 8;

/// Aspect shown for decks whose base has none.
pub const DEFAULT_BASE_ASPECT: &str = "Command";

const CARD_ART_CDN: &str = "https://cdn.swu-db.com/images/cards";

/// One remembered deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentDeck {
    /// Deck page URL; the identity of the entry.
    pub url: String,
    pub name: String,
    pub leader_art: Option<String>,
    pub base_aspect: String,
    /// Seconds since the unix epoch.
    pub viewed_at: u64,
}

impl RecentDeck {
    /// Describe a freshly viewed deck.
    ///
    /// Leader art comes from the deck payload, falling back to the card CDN.
    /// The base aspect is the resolved base card's first aspect.
    #[must_use]
    pub fn describe(url: impl Into<String>, deck: &Deck, base: Option<&CardMetadata>) -> Self {
        let leader_art = deck.leader.as_ref().and_then(|leader| {
            leader.front_art.clone().or_else(|| {
                leader
                    .card_id()
                    .map(|id| format!("{CARD_ART_CDN}/{}.png", id.art_path()))
            })
        });
        let base_aspect = base
            .and_then(CardMetadata::primary_aspect)
            .unwrap_or(DEFAULT_BASE_ASPECT)
            .to_string();
        let viewed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            url: url.into(),
            name: deck.name().to_string(),
            leader_art,
            base_aspect,
            viewed_at,
        }
    }
}

/// Most-recent-first list of viewed decks, at most `capacity` long.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentDecks {
    capacity: usize,
    entries: Vec<RecentDeck>,
}

impl Default for RecentDecks {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecentDecks {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Put `deck` at the front, replacing an entry with the same URL.
    pub fn record(&mut self, deck: RecentDeck) {
        self.entries.retain(|d| d.url != deck.url);
        self.entries.insert(0, deck);
        self.entries.truncate(self.capacity);
    }

    /// Forget the deck given by page URL or deck id. Returns whether an entry was removed.
    pub fn remove(&mut self, deck: &str) -> bool {
        let wanted = deck_id_from_url(deck);
        let before = self.entries.len();
        self.entries.retain(|entry| {
            entry.url != deck && (wanted.is_none() || deck_id_from_url(&entry.url) != wanted)
        });
        self.entries.len() != before
    }

    /// Forget every deck.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[RecentDeck] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a saved list. A missing or unreadable file yields an empty list.
    #[must_use]
    pub fn load(path: &Path, capacity: usize) -> Self {
        let mut recent = Self::new(capacity);
        let saved: Vec<RecentDeck> = match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring unreadable recent decks file");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };
        recent.entries = saved;
        recent.entries.truncate(capacity);
        recent
    }

    /// Write the list as JSON.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(&self.entries)?;
        std::fs::write(path, json)
    }
}
