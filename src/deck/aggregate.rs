//! Merging a deck's main and sideboard lists into per-card counts.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::cards::CardId;

/// One row of a deck list as delivered by the deck source.
///
/// Both fields are optional because the source is not trusted: rows without
/// a usable `id` are skipped during aggregation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub id: Option<String>,
    pub count: Option<i64>,
}

impl DeckEntry {
    /// Create a row.
    pub fn new(id: impl Into<String>, count: i64) -> Self {
        Self {
            id: Some(id.into()),
            count: Some(count),
        }
    }

    /// Read a row from arbitrary JSON, keeping whatever is usable.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let id = value.get("id").and_then(Value::as_str).map(str::to_string);
        let count = value.get("count").and_then(|c| {
            c.as_i64()
                .or_else(|| c.as_f64().map(|f| f as i64))
                .or_else(|| c.as_str().and_then(|s| s.trim().parse().ok()))
        });
        Self { id, count }
    }

    /// Copies of the card in this row. Absent, zero or negative counts mean one.
    #[must_use]
    pub fn effective_count(&self) -> u32 {
        match self.count {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => 1,
        }
    }
}

/// How many copies of one card a deck holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckCardCount {
    pub id: CardId,
    pub main: u32,
    pub sideboard: u32,
}

impl DeckCardCount {
    /// Create a count record.
    #[must_use]
    pub fn new(id: CardId, main: u32, sideboard: u32) -> Self {
        Self {
            id,
            main,
            sideboard,
        }
    }

    /// Main plus sideboard copies.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.main.saturating_add(self.sideboard)
    }
}

/// Merge main and sideboard rows by card identifier.
///
/// Output is in order of first appearance (main list first). Rows with a
/// missing or malformed `id` are skipped. Repeated rows for the same card
/// within one list add up.
///
/// ## Example
///
/// ```
/// use swu_deckview::deck::{aggregate, DeckEntry};
///
/// let counts = aggregate(&[DeckEntry::new("SOR_001", 2)], &[DeckEntry::new("SOR_001", 1)]);
/// assert_eq!(counts.len(), 1);
/// assert_eq!((counts[0].main, counts[0].sideboard), (2, 1));
/// ```
#[must_use]
pub fn aggregate(main: &[DeckEntry], sideboard: &[DeckEntry]) -> Vec<DeckCardCount> {
    let mut counts: Vec<DeckCardCount> = Vec::new();
    let mut index: FxHashMap<CardId, usize> = FxHashMap::default();

    let rows = main
        .iter()
        .map(|row| (row, false))
        .chain(sideboard.iter().map(|row| (row, true)));
    for (row, in_sideboard) in rows {
        let Some(raw_id) = row.id.as_deref() else {
            warn!(?row, "skipping deck row without id");
            continue;
        };
        let id = match CardId::parse(raw_id) {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "skipping deck row");
                continue;
            }
        };

        let slot = *index.entry(id.clone()).or_insert_with(|| {
            counts.push(DeckCardCount::new(id, 0, 0));
            counts.len() - 1
        });
        let record = &mut counts[slot];
        let copies = row.effective_count();
        if in_sideboard {
            record.sideboard = record.sideboard.saturating_add(copies);
        } else {
            record.main = record.main.saturating_add(copies);
        }
    }
    counts
}
