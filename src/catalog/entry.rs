//! Per-set card index.
//!
//! A `CatalogEntry` maps card numbers to metadata for one set. It is built once
//! from the set's data document and never mutated afterwards. The backing
//! `im::OrdMap` makes handing copies to every resolver an O(1) clone.

use im::OrdMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::cards::{CardMetadata, RawCard};
use crate::error::SetLoadError;

/// Index of one set's cards by number.
///
/// ## Example
///
/// ```
/// use serde_json::json;
/// use swu_deckview::catalog::CatalogEntry;
///
/// let doc = json!({"data": [{"Number": "001", "Name": "Director Krennic", "Type": "Leader"}]});
/// let entry = CatalogEntry::from_document("SOR", &doc).unwrap();
///
/// assert_eq!(entry.get(1).unwrap().name, "Director Krennic");
/// assert!(entry.get(2).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    set: String,
    cards: OrdMap<u32, CardMetadata>,
}

impl CatalogEntry {
    /// Create an empty entry for `set`.
    #[must_use]
    pub fn new(set: impl Into<String>) -> Self {
        Self {
            set: set.into(),
            cards: OrdMap::new(),
        }
    }

    /// Index a set data document shaped `{ "data": [ RawCard, ... ] }`.
    ///
    /// Records that are not objects or carry no usable `Number` are skipped.
    /// Records are read in place, without copying the document.
    /// A document without a `data` array is a load failure.
    pub fn from_document(set: &str, document: &Value) -> Result<Self, SetLoadError> {
        let records = document
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SetLoadError::new(set, "invalid data format: expected array in data property")
            })?;

        let mut entry = Self::new(set);
        let mut skipped = 0usize;
        for record in records {
            let card = RawCard::deserialize(record)
                .ok()
                .and_then(|raw| CardMetadata::from_raw(set, raw));
            match card {
                Some(card) => entry.insert(card),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(set, skipped, "skipped card records without a usable number");
        }
        Ok(entry)
    }

    /// Add a card, replacing any card with the same number.
    pub fn insert(&mut self, card: CardMetadata) {
        self.cards.insert(card.number, card);
    }

    /// Set code of this entry.
    #[must_use]
    pub fn set(&self) -> &str {
        &self.set
    }

    /// Look up a card by number.
    #[must_use]
    pub fn get(&self, number: u32) -> Option<&CardMetadata> {
        self.cards.get(&number)
    }

    /// Check if a card number is present.
    #[must_use]
    pub fn contains(&self, number: u32) -> bool {
        self.cards.contains_key(&number)
    }

    /// Number of indexed cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the entry holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over cards in number order.
    pub fn iter(&self) -> impl Iterator<Item = &CardMetadata> {
        self.cards.values()
    }
}
