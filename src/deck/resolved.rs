//! A deck with every card's metadata looked up.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::aggregate::DeckCardCount;
use super::model::{Deck, DeckCardRef, DeckSummary};
use crate::cards::{CardId, CardMetadata};
use crate::catalog::CardCatalog;

/// Counts and metadata of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCard {
    pub counts: DeckCardCount,
    pub metadata: CardMetadata,
}

impl ResolvedCard {
    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.counts.id
    }
}

/// A deck ready for grouping or comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDeck {
    pub id: String,
    pub name: String,
    /// One or two leaders, each counted once in the main deck.
    pub leaders: Vec<ResolvedCard>,
    pub base: Option<ResolvedCard>,
    /// Main deck and sideboard cards in first-appearance order.
    pub cards: Vec<ResolvedCard>,
    pub summary: DeckSummary,
}

impl ResolvedDeck {
    /// Look up leaders, base and every card of `deck` concurrently.
    ///
    /// Cards that cannot be found resolve to placeholders; leader or base
    /// references with malformed identifiers are dropped.
    pub async fn resolve(catalog: &CardCatalog, deck: &Deck) -> Self {
        let leader_ids: Vec<CardId> = deck.leaders().filter_map(parse_ref).collect();
        let base_id = deck.base.as_ref().and_then(parse_ref);
        let counts = deck.card_counts();

        let ids: Vec<CardId> = leader_ids
            .iter()
            .chain(base_id.iter())
            .chain(counts.iter().map(|c| &c.id))
            .cloned()
            .collect();
        let mut metadata = catalog.resolve_many(&ids).await.into_iter();

        let single = |id: CardId, metadata: CardMetadata| ResolvedCard {
            counts: DeckCardCount::new(id, 1, 0),
            metadata,
        };
        let mut leaders = Vec::with_capacity(leader_ids.len());
        for id in leader_ids {
            let card = metadata.next().unwrap_or_else(|| CardMetadata::placeholder(&id));
            leaders.push(single(id, card));
        }
        let base = base_id.map(|id| {
            let card = metadata.next().unwrap_or_else(|| CardMetadata::placeholder(&id));
            single(id, card)
        });
        let cards: Vec<ResolvedCard> = counts
            .into_iter()
            .map(|counts| {
                let card = metadata
                    .next()
                    .unwrap_or_else(|| CardMetadata::placeholder(&counts.id));
                ResolvedCard {
                    counts,
                    metadata: card,
                }
            })
            .collect();

        debug!(deck = %deck.id, cards = cards.len(), "resolved deck");
        Self {
            id: deck.id.clone(),
            name: deck.name().to_string(),
            leaders,
            base,
            cards,
            summary: deck.summary(),
        }
    }

    /// Aggregated counts of the main deck and sideboard.
    #[must_use]
    pub fn counts(&self) -> Vec<DeckCardCount> {
        self.cards.iter().map(|c| c.counts.clone()).collect()
    }

    /// Metadata for `id` if the deck holds it.
    #[must_use]
    pub fn metadata(&self, id: &CardId) -> Option<&CardMetadata> {
        self.leaders
            .iter()
            .chain(self.base.iter())
            .chain(self.cards.iter())
            .find(|c| c.id() == id)
            .map(|c| &c.metadata)
    }
}

fn parse_ref(card: &DeckCardRef) -> Option<CardId> {
    let id = card.card_id();
    if id.is_none() {
        warn!(id = %card.id, "ignoring malformed leader or base id");
    }
    id
}
