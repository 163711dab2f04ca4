//! Whole-page views built from a renderer's pieces.
//!
//! Headings, summaries, sections and the page wrapper all come from the same
//! `CardRenderer`, so an HTML page never carries text-only markup.

use std::borrow::Cow;

use super::{CardRenderer, CardView};
use crate::cards::CardMetadata;
use crate::compare::DeckComparison;
use crate::deck::{ResolvedCard, ResolvedDeck};
use crate::grouping::GroupingEngine;

/// Section title of the leader and base tiles.
pub const LEADERS_TITLE: &str = "Leaders & Base";

/// Render one deck: title, entry counts, leaders and base, then the groups of `sort`.
///
/// An unknown `sort` falls back to grouping by set.
pub fn deck_page<R>(renderer: &R, engine: &GroupingEngine, sort: &str, deck: &ResolvedDeck) -> String
where
    R: CardRenderer + ?Sized,
{
    let single = |card: &ResolvedCard| {
        renderer.render(&CardView::deck(card.id(), &card.metadata, 1, 0))
    };
    let mut sections = Vec::new();
    let leaders: Vec<String> = deck
        .leaders
        .iter()
        .chain(deck.base.iter())
        .map(single)
        .collect();
    if !leaders.is_empty() {
        sections.push(renderer.section(LEADERS_TITLE, &leaders));
    }
    sections.extend(engine.render_sections(sort, &deck.cards, renderer));

    let stats = [
        ("Main deck entries".to_string(), deck.summary.main_entries),
        ("Sideboard entries".to_string(), deck.summary.sideboard_entries),
    ];
    format!(
        "{}{}{}",
        renderer.heading(&deck.name),
        renderer.summary(&stats),
        renderer.page(&sections)
    )
}

/// Render a comparison: title, bucket sizes, then one section per non-empty bucket.
///
/// Tile metadata comes from deck A, then deck B, then a placeholder.
pub fn comparison_page<R>(
    renderer: &R,
    comparison: &DeckComparison,
    deck_a: &ResolvedDeck,
    deck_b: &ResolvedDeck,
) -> String
where
    R: CardRenderer + ?Sized,
{
    let (name_a, name_b) = (deck_a.name.as_str(), deck_b.name.as_str());
    let summary = comparison.summary();
    let stats = [
        (format!("Only in {name_a}"), summary.only_a),
        (format!("Only in {name_b}"), summary.only_b),
        ("Different Counts".to_string(), summary.different),
        ("Same Cards".to_string(), summary.same),
    ];

    let sections: Vec<String> = comparison
        .buckets()
        .map(|(class, cards)| {
            let tiles: Vec<String> = cards
                .iter()
                .map(|card| {
                    let metadata = deck_a
                        .metadata(&card.id)
                        .or_else(|| deck_b.metadata(&card.id))
                        .map_or_else(
                            || Cow::Owned(CardMetadata::placeholder(&card.id)),
                            Cow::Borrowed,
                        );
                    renderer.render(&CardView::compared(card, &metadata, name_a, name_b))
                })
                .collect();
            let title = format!("{} ({} cards)", class.title(name_a, name_b), cards.len());
            renderer.comparison_section(&title, &tiles)
        })
        .collect();

    format!(
        "{}{}{}",
        renderer.heading(&format!("Deck Comparison: {name_a} vs {name_b}")),
        renderer.summary(&stats),
        renderer.page(&sections)
    )
}
