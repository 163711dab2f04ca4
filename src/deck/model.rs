//! Deck payloads from the deck source.
//!
//! A payload looks like
//! `{ deck: [{id, count}], sideboard: [...], leader: {id}, secondleader?: {id}, base: {id}, metadata: {name} }`
//! or `{ error: "..." }`. Only the `deck` list is required; every row inside
//! it is read leniently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::aggregate::{aggregate, DeckCardCount, DeckEntry};
use crate::cards::CardId;
use crate::error::DeckLoadError;

/// Name shown for decks without one.
pub const UNNAMED_DECK: &str = "Unnamed Deck";

/// Reference to a single leader or base card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCardRef {
    pub id: String,
    /// Art URL when the deck source embeds one.
    pub front_art: Option<String>,
}

impl DeckCardRef {
    fn from_value(value: &Value) -> Option<Self> {
        let id = value.get("id").and_then(Value::as_str)?.to_string();
        let front_art = value
            .get("FrontArt")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self { id, front_art })
    }

    /// Parsed identifier, if well formed.
    #[must_use]
    pub fn card_id(&self) -> Option<CardId> {
        CardId::parse(&self.id).ok()
    }
}

/// Entry counts shown in the deck header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub main_entries: usize,
    pub sideboard_entries: usize,
}

/// A deck list as loaded from the deck source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Deck id at the source.
    pub id: String,
    pub name: Option<String>,
    pub leader: Option<DeckCardRef>,
    pub second_leader: Option<DeckCardRef>,
    pub base: Option<DeckCardRef>,
    pub main: Vec<DeckEntry>,
    pub sideboard: Vec<DeckEntry>,
}

impl Deck {
    /// Validate and read a deck payload.
    ///
    /// Fails on `null`, on an empty object or string, on an `error` payload,
    /// and on a payload without a `deck` list.
    pub fn from_payload(id: &str, payload: &Value) -> Result<Self, DeckLoadError> {
        match payload {
            Value::Null => return Err(DeckLoadError::Empty),
            Value::String(s) if s.is_empty() => return Err(DeckLoadError::Empty),
            Value::Object(map) if map.is_empty() => return Err(DeckLoadError::Empty),
            _ => {}
        }
        if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
            let message = error
                .as_str()
                .map_or_else(|| error.to_string(), str::to_string);
            return Err(DeckLoadError::Api(message));
        }
        let main = payload
            .get("deck")
            .and_then(Value::as_array)
            .ok_or(DeckLoadError::InvalidFormat)?;
        let sideboard = payload
            .get("sideboard")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(Self {
            id: id.to_string(),
            name: payload
                .pointer("/metadata/name")
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            leader: payload.get("leader").and_then(DeckCardRef::from_value),
            second_leader: payload.get("secondleader").and_then(DeckCardRef::from_value),
            base: payload.get("base").and_then(DeckCardRef::from_value),
            main: main.iter().map(DeckEntry::from_value).collect(),
            sideboard: sideboard.iter().map(DeckEntry::from_value).collect(),
        })
    }

    /// Display name, `"Unnamed Deck"` when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_DECK)
    }

    /// Number of rows in the main deck and sideboard lists.
    #[must_use]
    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            main_entries: self.main.len(),
            sideboard_entries: self.sideboard.len(),
        }
    }

    /// Per-card counts across main deck and sideboard.
    #[must_use]
    pub fn card_counts(&self) -> Vec<DeckCardCount> {
        aggregate(&self.main, &self.sideboard)
    }

    /// Leaders in display order (first, then second).
    pub fn leaders(&self) -> impl Iterator<Item = &DeckCardRef> {
        self.leader.iter().chain(self.second_leader.iter())
    }
}
