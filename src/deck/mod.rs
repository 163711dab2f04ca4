//! Decks: loading, per-card counts, resolution and history.
//!
//! ## Key Types
//!
//! - `DeckEntry`, `DeckCardCount`, `aggregate`: main + sideboard merged per card
//! - `Deck`: a validated deck payload
//! - `DeckClient`: fetches decks from the deck API
//! - `ResolvedDeck`: a deck with metadata for every card
//! - `RecentDecks`: bounded history of viewed decks

pub mod aggregate;
pub mod client;
pub mod model;
pub mod recent;
pub mod resolved;

pub use aggregate::{aggregate, DeckCardCount, DeckEntry};
pub use client::{deck_id_from_url, DeckClient};
pub use model::{Deck, DeckCardRef, DeckSummary, UNNAMED_DECK};
pub use recent::{RecentDeck, RecentDecks, DEFAULT_BASE_ASPECT};
pub use resolved::{ResolvedCard, ResolvedDeck};
