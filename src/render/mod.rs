//! Card tile rendering.
//!
//! The grouping engine and the comparison view hand every card to a
//! `CardRenderer` as a `CardView`. Renderers are pure: same view, same output.
//!
//! ## Key Types
//!
//! - `CardRenderer`: the rendering seam
//! - `CardView`: identifier, metadata and counts of one card
//! - `TextRenderer`: one line per card for terminals
//! - `HtmlRenderer`: card tile markup
//! - `deck_page` / `comparison_page`: whole deck and comparison views

use crate::cards::{CardId, CardMetadata};
use crate::compare::{ComparedCard, ComparisonClass, SideCounts};

pub mod html;
pub mod page;
pub mod text;

pub use html::HtmlRenderer;
pub use page::{comparison_page, deck_page};
pub use text::TextRenderer;

/// Turns cards, and the page around them, into markup.
pub trait CardRenderer {
    fn render(&self, card: &CardView<'_>) -> String;

    /// Wrap already rendered cards in a titled section.
    fn section(&self, title: &str, cards: &[String]) -> String;

    /// Wrap one comparison bucket. Defaults to a plain section.
    fn comparison_section(&self, title: &str, cards: &[String]) -> String {
        self.section(title, cards)
    }

    /// Page title.
    fn heading(&self, text: &str) -> String;

    /// Row of labelled counts shown under the title.
    fn summary(&self, stats: &[(String, usize)]) -> String;

    /// Join rendered sections into the page body.
    fn page(&self, sections: &[String]) -> String {
        sections.concat()
    }
}

/// Counts shown on a card tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileCounts<'a> {
    /// Copies in the deck being viewed.
    Deck(SideCounts),
    /// Copies in both compared decks.
    Comparison {
        class: ComparisonClass,
        deck_a: &'a str,
        a: SideCounts,
        deck_b: &'a str,
        b: SideCounts,
    },
}

/// Everything a renderer needs to draw one card.
#[derive(Clone, Copy, Debug)]
pub struct CardView<'a> {
    pub id: &'a CardId,
    pub metadata: &'a CardMetadata,
    pub counts: TileCounts<'a>,
}

impl<'a> CardView<'a> {
    /// A card of the deck being viewed.
    #[must_use]
    pub fn deck(id: &'a CardId, metadata: &'a CardMetadata, main: u32, sideboard: u32) -> Self {
        Self {
            id,
            metadata,
            counts: TileCounts::Deck(SideCounts::new(main, sideboard)),
        }
    }

    /// A card of a comparison between decks named `deck_a` and `deck_b`.
    #[must_use]
    pub fn compared(
        card: &'a ComparedCard,
        metadata: &'a CardMetadata,
        deck_a: &'a str,
        deck_b: &'a str,
    ) -> Self {
        Self {
            id: &card.id,
            metadata,
            counts: TileCounts::Comparison {
                class: card.class,
                deck_a,
                a: card.a,
                deck_b,
                b: card.b,
            },
        }
    }

    /// Count banner, e.g. `Deck: 3 | Side: 1` or `Aggro: 2 (1 side) | Control: 1`.
    ///
    /// Empty when the card has no copies at all.
    #[must_use]
    pub fn count_label(&self) -> String {
        match self.counts {
            TileCounts::Deck(counts) => {
                let mut parts = Vec::with_capacity(2);
                if counts.main > 0 {
                    parts.push(format!("Deck: {}", counts.main));
                }
                if counts.sideboard > 0 {
                    parts.push(format!("Side: {}", counts.sideboard));
                }
                parts.join(" | ")
            }
            TileCounts::Comparison {
                deck_a, a, deck_b, b, ..
            } => [(deck_a, a), (deck_b, b)]
                .into_iter()
                .filter(|(_, side)| side.total() > 0)
                .map(|(name, side)| {
                    if side.sideboard > 0 {
                        format!("{name}: {} ({} side)", side.main, side.sideboard)
                    } else {
                        format!("{name}: {}", side.main)
                    }
                })
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    /// Extra CSS class for comparison tiles.
    #[must_use]
    pub fn css_class(&self) -> Option<&'static str> {
        match self.counts {
            TileCounts::Deck(_) => None,
            TileCounts::Comparison { class, .. } => Some(class.css_class()),
        }
    }

    /// Stats present on the card, in display order.
    #[must_use]
    pub fn stats(&self) -> Vec<(&'static str, &'a str)> {
        let m = self.metadata;
        [("Cost", &m.cost), ("Power", &m.power), ("HP", &m.hp)]
            .into_iter()
            .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
            .collect()
    }
}
