//! # swu-deckview
//!
//! Deck viewer and comparator for Star Wars: Unlimited deck lists.
//!
//! ## Design Principles
//!
//! 1. **Always Renderable**: A bad identifier or a missing card never blocks a
//!    deck. Single-card failures become placeholders; only whole-deck failures
//!    surface as errors.
//!
//! 2. **One Fetch Per Set**: The catalog loads each set at most once at a time,
//!    however many lookups wait on it.
//!
//! 3. **Deterministic Output**: Group and card order depend only on the
//!    strategy, the set order and the input, never on fetch completion order
//!    or hash-map iteration.
//!
//! ## Data Flow
//!
//! ```text
//! deck JSON -> Deck -> aggregate -> CardCatalog::resolve_many -> ResolvedDeck
//!     -> GroupingEngine::render      (deck view)
//!     -> DeckComparison::compare     (compare view)
//! ```
//!
//! ## Modules
//!
//! - `cards`: Identifiers, set order and card metadata
//! - `catalog`: Per-set indexes and the shared catalog cache
//! - `deck`: Deck payloads, aggregation, resolution and history
//! - `grouping`: The five sort strategies and the grouping engine
//! - `compare`: Card-by-card deck comparison
//! - `render`: Text and HTML card renderers
//! - `fetch`: JSON fetchers (HTTP with retries and proxies, local files)
//! - `config`: TOML configuration
//! - `error`: Error types

pub mod cards;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod deck;
pub mod error;
pub mod fetch;
pub mod grouping;
pub mod render;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::cards::{CardId, CardMetadata, SetOrder};

pub use crate::catalog::{CardCatalog, CatalogEntry};

pub use crate::deck::{
    aggregate, deck_id_from_url, Deck, DeckCardCount, DeckClient, DeckEntry, RecentDecks,
    ResolvedCard, ResolvedDeck,
};

pub use crate::grouping::{GroupKey, GroupingEngine, SortStrategy};

pub use crate::compare::{ComparisonClass, DeckComparison};

pub use crate::render::{
    comparison_page, deck_page, CardRenderer, CardView, HtmlRenderer, TextRenderer,
};

pub use crate::fetch::{HttpFetcher, JsonFetcher, LocalFetcher, RetryPolicy};

pub use crate::config::ViewerConfig;

pub use crate::error::{
    ConfigError, DeckLoadError, FetchError, IdentifierError, SetLoadError, UnknownSortStrategy,
};
