//! Card-by-card comparison of two decks.
//!
//! Every identifier present in either deck lands in exactly one bucket:
//!
//! | A total | B total | counts         | class             |
//! |---------|---------|----------------|-------------------|
//! | > 0     | 0       |                | `OnlyInA`         |
//! | 0       | > 0     |                | `OnlyInB`         |
//! | > 0     | > 0     | differ         | `DifferentCounts` |
//! | > 0     | > 0     | equal          | `Same`            |
//!
//! ## Key Types
//!
//! - `ComparisonClass`: the four buckets
//! - `SideCounts`: one deck's main/sideboard copies of a card
//! - `ComparedCard`: one identifier with both sides' counts
//! - `DeckComparison`: the four buckets of a comparison

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, SetOrder};
use crate::deck::DeckCardCount;

/// Bucket a card falls into when comparing deck A with deck B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonClass {
    OnlyInA,
    OnlyInB,
    DifferentCounts,
    Same,
}

impl ComparisonClass {
    /// Display order of the buckets.
    pub const ALL: [ComparisonClass; 4] = [
        ComparisonClass::OnlyInA,
        ComparisonClass::OnlyInB,
        ComparisonClass::DifferentCounts,
        ComparisonClass::Same,
    ];

    /// Classify one identifier from both sides' counts.
    ///
    /// Returns `None` when neither deck holds a copy.
    #[must_use]
    pub fn classify(a: SideCounts, b: SideCounts) -> Option<Self> {
        match (a.total() > 0, b.total() > 0) {
            (false, false) => None,
            (true, false) => Some(Self::OnlyInA),
            (false, true) => Some(Self::OnlyInB),
            (true, true) if a == b => Some(Self::Same),
            (true, true) => Some(Self::DifferentCounts),
        }
    }

    /// Section title, given the two deck names.
    #[must_use]
    pub fn title(self, deck_a: &str, deck_b: &str) -> String {
        match self {
            Self::OnlyInA => format!("Only in {deck_a}"),
            Self::OnlyInB => format!("Only in {deck_b}"),
            Self::DifferentCounts => "Different Counts".to_string(),
            Self::Same => "Same Cards".to_string(),
        }
    }

    /// CSS class of card tiles in this bucket.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::OnlyInA => "deck1-only",
            Self::OnlyInB => "deck2-only",
            Self::DifferentCounts => "different-count",
            Self::Same => "same-card",
        }
    }
}

/// Copies of a card in one deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideCounts {
    pub main: u32,
    pub sideboard: u32,
}

impl SideCounts {
    #[must_use]
    pub fn new(main: u32, sideboard: u32) -> Self {
        Self { main, sideboard }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.main.saturating_add(self.sideboard)
    }
}

impl From<&DeckCardCount> for SideCounts {
    fn from(count: &DeckCardCount) -> Self {
        Self::new(count.main, count.sideboard)
    }
}

/// One identifier of the union with both decks' counts.
///
/// The side a card is absent from has zero counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedCard {
    pub id: CardId,
    pub class: ComparisonClass,
    pub a: SideCounts,
    pub b: SideCounts,
}

/// Bucket sizes of a comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub only_a: usize,
    pub only_b: usize,
    pub different: usize,
    pub same: usize,
}

/// Result of comparing two decks.
///
/// Buckets start in union order (first appearance in A, then in B); use
/// `sorted` for canonical identifier order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckComparison {
    pub only_a: Vec<ComparedCard>,
    pub only_b: Vec<ComparedCard>,
    pub different: Vec<ComparedCard>,
    pub same: Vec<ComparedCard>,
}

impl DeckComparison {
    /// Classify every card present in either aggregate.
    ///
    /// ## Example
    ///
    /// ```
    /// use swu_deckview::cards::CardId;
    /// use swu_deckview::compare::DeckComparison;
    /// use swu_deckview::deck::DeckCardCount;
    ///
    /// let a = [DeckCardCount::new(CardId::new("SOR", 1), 2, 0)];
    /// let cmp = DeckComparison::compare(&a, &[]);
    /// assert_eq!(cmp.only_a.len(), 1);
    /// assert_eq!(cmp.only_a[0].a.main, 2);
    /// ```
    #[must_use]
    pub fn compare(deck_a: &[DeckCardCount], deck_b: &[DeckCardCount]) -> Self {
        let mut union: Vec<CardId> = Vec::new();
        let mut seen: FxHashSet<CardId> = FxHashSet::default();
        let sides_a = tally(deck_a, &mut union, &mut seen);
        let sides_b = tally(deck_b, &mut union, &mut seen);

        let mut comparison = Self::default();
        for id in union {
            let a = sides_a.get(&id).copied().unwrap_or_default();
            let b = sides_b.get(&id).copied().unwrap_or_default();
            let Some(class) = ComparisonClass::classify(a, b) else {
                continue;
            };
            comparison
                .bucket_mut(class)
                .push(ComparedCard { id, class, a, b });
        }
        comparison
    }

    /// Same comparison with every bucket in canonical identifier order.
    #[must_use]
    pub fn sorted(mut self, order: &SetOrder) -> Self {
        for class in ComparisonClass::ALL {
            order.sort_by_id(self.bucket_mut(class), |card| &card.id);
        }
        self
    }

    /// Cards in one bucket.
    #[must_use]
    pub fn bucket(&self, class: ComparisonClass) -> &[ComparedCard] {
        match class {
            ComparisonClass::OnlyInA => &self.only_a,
            ComparisonClass::OnlyInB => &self.only_b,
            ComparisonClass::DifferentCounts => &self.different,
            ComparisonClass::Same => &self.same,
        }
    }

    fn bucket_mut(&mut self, class: ComparisonClass) -> &mut Vec<ComparedCard> {
        match class {
            ComparisonClass::OnlyInA => &mut self.only_a,
            ComparisonClass::OnlyInB => &mut self.only_b,
            ComparisonClass::DifferentCounts => &mut self.different,
            ComparisonClass::Same => &mut self.same,
        }
    }

    /// Non-empty buckets in display order.
    pub fn buckets(&self) -> impl Iterator<Item = (ComparisonClass, &[ComparedCard])> {
        ComparisonClass::ALL
            .into_iter()
            .map(|class| (class, self.bucket(class)))
            .filter(|(_, cards)| !cards.is_empty())
    }

    #[must_use]
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            only_a: self.only_a.len(),
            only_b: self.only_b.len(),
            different: self.different.len(),
            same: self.same.len(),
        }
    }

    /// Number of distinct identifiers across both decks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.only_a.len() + self.only_b.len() + self.different.len() + self.same.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sum each identifier's counts, appending identifiers not yet in `seen` to `union`.
fn tally(
    counts: &[DeckCardCount],
    union: &mut Vec<CardId>,
    seen: &mut FxHashSet<CardId>,
) -> FxHashMap<CardId, SideCounts> {
    let mut sides: FxHashMap<CardId, SideCounts> = FxHashMap::default();
    for count in counts {
        if seen.insert(count.id.clone()) {
            union.push(count.id.clone());
        }
        let side = sides.entry(count.id.clone()).or_default();
        side.main = side.main.saturating_add(count.main);
        side.sideboard = side.sideboard.saturating_add(count.sideboard);
    }
    sides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(id: &str, main: u32, sideboard: u32) -> DeckCardCount {
        DeckCardCount::new(id.parse().unwrap(), main, sideboard)
    }

    #[test]
    fn test_classify() {
        let none = SideCounts::default();
        let two = SideCounts::new(2, 0);
        assert_eq!(ComparisonClass::classify(none, none), None);
        assert_eq!(ComparisonClass::classify(two, none), Some(ComparisonClass::OnlyInA));
        assert_eq!(ComparisonClass::classify(none, two), Some(ComparisonClass::OnlyInB));
        assert_eq!(ComparisonClass::classify(two, two), Some(ComparisonClass::Same));
        assert_eq!(
            ComparisonClass::classify(two, SideCounts::new(2, 1)),
            Some(ComparisonClass::DifferentCounts)
        );
    }

    #[test]
    fn test_buckets() {
        let a = [count("SOR_001", 2, 0), count("SOR_002", 1, 0), count("SOR_003", 2, 0)];
        let b = [count("SOR_002", 1, 0), count("SOR_003", 1, 0), count("SOR_004", 0, 2)];
        let cmp = DeckComparison::compare(&a, &b);

        assert_eq!(cmp.only_a[0].a, SideCounts::new(2, 0));
        assert_eq!(cmp.only_a[0].b, SideCounts::default());
        assert_eq!(cmp.same[0].id, CardId::new("SOR", 2));
        assert_eq!(cmp.different[0].a.main, 2);
        assert_eq!(cmp.different[0].b.main, 1);
        assert_eq!(cmp.only_b[0].b, SideCounts::new(0, 2));
        assert_eq!(
            cmp.summary(),
            ComparisonSummary { only_a: 1, only_b: 1, different: 1, same: 1 }
        );
        assert_eq!(cmp.buckets().count(), 4);
    }

    #[test]
    fn test_sorted_orders_each_bucket() {
        let a = [count("TWI_001", 1, 0), count("SOR_009", 1, 0), count("SOR_002", 1, 0)];
        let cmp = DeckComparison::compare(&a, &[]).sorted(&SetOrder::default());
        let ids: Vec<_> = cmp.only_a.iter().map(|c| c.id.canonical()).collect();
        assert_eq!(ids, ["SOR_002", "SOR_009", "TWI_001"]);
    }

    #[test]
    fn test_large_decks_keep_union_order() {
        let a: Vec<_> = (1..=2000).map(|n| DeckCardCount::new(CardId::new("SOR", n), 1, 0)).collect();
        let b: Vec<_> = (1000..=3000)
            .rev()
            .map(|n| DeckCardCount::new(CardId::new("SOR", n), 1, 0))
            .collect();
        let cmp = DeckComparison::compare(&a, &b);

        assert_eq!(cmp.len(), 3000);
        assert_eq!(cmp.same.len(), 1001);
        assert_eq!(cmp.only_a.first().map(|c| c.id.number()), Some(1));
        assert_eq!(cmp.only_b.first().map(|c| c.id.number()), Some(3000));
        assert_eq!(cmp.only_b.last().map(|c| c.id.number()), Some(2001));
    }

    #[test]
    fn test_titles() {
        assert_eq!(ComparisonClass::OnlyInB.title("Aggro", "Control"), "Only in Control");
        assert_eq!(ComparisonClass::Same.css_class(), "same-card");
    }
}
