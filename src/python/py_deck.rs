//! Aggregation, comparison and grouping bindings for Python.
//!
//! Everything here works on plain tuples so notebooks can feed deck lists
//! without building wrapper objects.

use std::collections::HashMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::cards::{CardId, CardMetadata, RawCard, SetOrder};
use crate::compare::{ComparisonClass, DeckComparison};
use crate::deck::{DeckCardCount, DeckEntry, ResolvedCard};
use crate::grouping::{GroupingEngine, SortStrategy};

/// `(id, main, sideboard)`
type CountTuple = (String, u32, u32);

/// `(id, a_main, a_sideboard, b_main, b_sideboard)`
type ComparedTuple = (String, u32, u32, u32, u32);

fn parse_counts(counts: Vec<CountTuple>) -> PyResult<Vec<DeckCardCount>> {
    counts
        .into_iter()
        .map(|(id, main, sideboard)| {
            CardId::parse(&id)
                .map(|id| DeckCardCount::new(id, main, sideboard))
                .map_err(|e| PyValueError::new_err(e.to_string()))
        })
        .collect()
}

/// Merge `(id, count)` rows of a main deck and sideboard into `(id, main, sideboard)`.
///
/// Malformed identifiers are skipped.
#[pyfunction]
pub fn aggregate(main: Vec<(String, i64)>, sideboard: Vec<(String, i64)>) -> Vec<CountTuple> {
    let rows = |list: Vec<(String, i64)>| -> Vec<DeckEntry> {
        list.into_iter().map(|(id, count)| DeckEntry::new(id, count)).collect()
    };
    crate::deck::aggregate(&rows(main), &rows(sideboard))
        .into_iter()
        .map(|c| (c.id.canonical(), c.main, c.sideboard))
        .collect()
}

/// Compare two aggregated decks.
///
/// Returns a dict with keys `only_a`, `only_b`, `different` and `same`, each a
/// list of `(id, a_main, a_sideboard, b_main, b_sideboard)` in canonical order.
#[pyfunction]
pub fn compare(
    deck_a: Vec<CountTuple>,
    deck_b: Vec<CountTuple>,
) -> PyResult<HashMap<&'static str, Vec<ComparedTuple>>> {
    let comparison = DeckComparison::compare(&parse_counts(deck_a)?, &parse_counts(deck_b)?)
        .sorted(&SetOrder::default());

    let mut buckets = HashMap::new();
    for class in ComparisonClass::ALL {
        let name = match class {
            ComparisonClass::OnlyInA => "only_a",
            ComparisonClass::OnlyInB => "only_b",
            ComparisonClass::DifferentCounts => "different",
            ComparisonClass::Same => "same",
        };
        let cards = comparison
            .bucket(class)
            .iter()
            .map(|c| (c.id.canonical(), c.a.main, c.a.sideboard, c.b.main, c.b.sideboard))
            .collect();
        buckets.insert(name, cards);
    }
    Ok(buckets)
}

/// Group cards with the strategy named `sort_type`.
///
/// `cards` holds `(id, record)` pairs where `record` is one card object from
/// a set data file, as JSON. Returns `(group key, [canonical ids])` in display
/// order. Unknown strategy names group by set.
#[pyfunction]
pub fn group_keys(
    sort_type: &str,
    cards: Vec<(String, String)>,
) -> PyResult<Vec<(String, Vec<String>)>> {
    let mut resolved = Vec::with_capacity(cards.len());
    for (id, record) in cards {
        let id = CardId::parse(&id).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let raw: RawCard =
            serde_json::from_str(&record).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let metadata = CardMetadata::from_raw(id.set(), raw)
            .unwrap_or_else(|| CardMetadata::placeholder(&id));
        resolved.push(ResolvedCard {
            counts: DeckCardCount::new(id, 1, 0),
            metadata,
        });
    }

    let groups = GroupingEngine::default().group(SortStrategy::from_name(sort_type), &resolved);
    Ok(groups
        .into_iter()
        .map(|group| {
            let ids = group.cards.iter().map(|c| c.id().canonical()).collect();
            (group.key.to_string(), ids)
        })
        .collect())
}
