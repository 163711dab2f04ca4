//! Grouping resolved cards and rendering the groups.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use super::strategy::{GroupKey, SortStrategy};
use crate::cards::SetOrder;
use crate::deck::ResolvedCard;
use crate::render::{CardRenderer, CardView};

/// Cards sharing one group key, in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardGroup<'a> {
    pub key: GroupKey,
    pub cards: Vec<&'a ResolvedCard>,
}

impl CardGroup<'_> {
    /// Copies across main deck and sideboard.
    #[must_use]
    pub fn copies(&self) -> u32 {
        self.cards.iter().map(|c| c.counts.total()).sum()
    }
}

/// One group after every card went through a renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedGroup {
    pub key: GroupKey,
    pub cards: Vec<String>,
}

/// Partitions and orders cards by a `SortStrategy`.
///
/// Output depends only on the strategy, the set order and the input order;
/// running it twice gives the same result.
#[derive(Clone, Debug, Default)]
pub struct GroupingEngine {
    set_order: SetOrder,
}

impl GroupingEngine {
    #[must_use]
    pub fn new(set_order: SetOrder) -> Self {
        Self { set_order }
    }

    #[must_use]
    pub fn set_order(&self) -> &SetOrder {
        &self.set_order
    }

    /// Group `cards`, order the groups and the cards within each.
    #[must_use]
    pub fn group<'a>(
        &self,
        strategy: SortStrategy,
        cards: &'a [ResolvedCard],
    ) -> Vec<CardGroup<'a>> {
        let mut first_seen: Vec<GroupKey> = Vec::new();
        let mut buckets: FxHashMap<GroupKey, Vec<&'a ResolvedCard>> = FxHashMap::default();
        for card in cards {
            let key = strategy.group_key(card.id(), &card.metadata);
            buckets
                .entry(key)
                .or_insert_with_key(|key| {
                    first_seen.push(key.clone());
                    Vec::new()
                })
                .push(card);
        }

        strategy
            .order_groups(&first_seen, &self.set_order)
            .into_iter()
            .filter_map(|key| {
                let mut cards = buckets.remove(&key)?;
                strategy.order_within(&mut cards, &self.set_order, |card| card.id());
                Some(CardGroup { key, cards })
            })
            .collect()
    }

    /// Group `cards` with the strategy named `sort_type` and render every card.
    ///
    /// Unknown names fall back to the `set` strategy.
    pub fn render<R>(
        &self,
        sort_type: &str,
        cards: &[ResolvedCard],
        renderer: &R,
    ) -> Vec<RenderedGroup>
    where
        R: CardRenderer + ?Sized,
    {
        let strategy = SortStrategy::from_name(sort_type);
        debug!(strategy = %strategy, cards = cards.len(), "rendering groups");
        self.group(strategy, cards)
            .into_iter()
            .map(|group| RenderedGroup {
                cards: group
                    .cards
                    .iter()
                    .map(|card| {
                        renderer.render(&CardView::deck(
                            card.id(),
                            &card.metadata,
                            card.counts.main,
                            card.counts.sideboard,
                        ))
                    })
                    .collect(),
                key: group.key,
            })
            .collect()
    }

    /// Render every group as a titled section.
    pub fn render_sections<R>(
        &self,
        sort_type: &str,
        cards: &[ResolvedCard],
        renderer: &R,
    ) -> Vec<String>
    where
        R: CardRenderer + ?Sized,
    {
        self.render(sort_type, cards, renderer)
            .into_iter()
            .map(|group| renderer.section(group.key.as_str(), &group.cards))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardMetadata};
    use crate::deck::DeckCardCount;
    use crate::render::TextRenderer;

    fn card(id: &str, cost: Option<&str>) -> ResolvedCard {
        let id: CardId = id.parse().unwrap();
        let mut metadata = CardMetadata::placeholder(&id);
        metadata.cost = cost.map(str::to_string);
        ResolvedCard {
            counts: DeckCardCount::new(id, 1, 0),
            metadata,
        }
    }

    #[test]
    fn test_group_by_set() {
        let cards = [card("TWI_003", None), card("SOR_010", None), card("SOR_002", None)];
        let groups = GroupingEngine::default().group(SortStrategy::Set, &cards);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.as_str(), "SOR");
        let numbers: Vec<_> = groups[0].cards.iter().map(|c| c.id().number()).collect();
        assert_eq!(numbers, [2, 10]);
        assert_eq!(groups[1].key.as_str(), "TWI");
        assert_eq!(groups[0].copies(), 2);
    }

    #[test]
    fn test_within_group_canonical_order() {
        let cards = [
            card("TWI_001", Some("2")),
            card("SOR_050", Some("2")),
            card("SOR_004", Some("2")),
        ];
        let groups = GroupingEngine::default().group(SortStrategy::Cost, &cards);
        let ids: Vec<_> = groups[0].cards.iter().map(|c| c.id().canonical()).collect();
        assert_eq!(ids, ["SOR_004", "SOR_050", "TWI_001"]);
    }

    #[test]
    fn test_render_unknown_strategy_uses_set() {
        let cards = [card("SHD_001", Some("1")), card("SOR_001", Some("3"))];
        let engine = GroupingEngine::default();
        let fallback = engine.render("nonsense", &cards, &TextRenderer);
        let by_set = engine.render("set", &cards, &TextRenderer);
        assert_eq!(fallback, by_set);
        assert_eq!(fallback[0].key.as_str(), "SOR");
    }

    #[test]
    fn test_render_sections() {
        let cards = [card("SOR_001", Some("1"))];
        let sections = GroupingEngine::default().render_sections("cost", &cards, &TextRenderer);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].starts_with("== Cost: 1 (1) =="));
    }
}
