//! Deck loading and viewing integration tests.
//!
//! These tests verify aggregation, payload validation, the deck client, and
//! the full path from a deck payload to grouped card tiles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value};

use swu_deckview::cards::{CardId, SetOrder};
use swu_deckview::catalog::clear_set_files;
use swu_deckview::compare::DeckComparison;
use swu_deckview::deck::{aggregate, Deck, DeckClient, DeckEntry, RecentDeck, RecentDecks, ResolvedDeck};
use swu_deckview::error::{DeckLoadError, FetchError};
use swu_deckview::fetch::JsonFetcher;
use swu_deckview::render::{comparison_page, deck_page, HtmlRenderer, TextRenderer};
use swu_deckview::{CardCatalog, GroupingEngine};

/// Serves canned documents by exact location and records every request.
#[derive(Default)]
struct Canned {
    docs: HashMap<String, Value>,
    requests: Mutex<Vec<String>>,
}

impl Canned {
    fn with(mut self, location: &str, doc: Value) -> Self {
        self.docs.insert(location.to_string(), doc);
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonFetcher for Canned {
    async fn fetch_json(&self, location: &str) -> Result<Value, FetchError> {
        self.requests.lock().unwrap().push(location.to_string());
        self.docs.get(location).cloned().ok_or_else(|| FetchError::Status {
            status: 404,
            url: location.to_string(),
        })
    }
}

fn sample_deck() -> Value {
    json!({
        "metadata": {"name": "Krennic <Control>"},
        "leader": {"id": "SOR_001"},
        "base": {"id": "SOR_020"},
        "deck": [
            {"id": "SOR_010", "count": 3},
            {"id": "SHD_005", "count": 2},
            {"id": "SOR_011", "count": 1},
            {"id": "bogus"},
            {"id": "TWI_099", "count": 2}
        ],
        "sideboard": [
            {"id": "SOR_010", "count": 1}
        ]
    })
}

fn rival_deck() -> Value {
    json!({
        "metadata": {"name": "Vader & Friends"},
        "leader": {"id": "SOR_001"},
        "deck": [
            {"id": "SOR_010", "count": 3},
            {"id": "SOR_011", "count": 3},
            {"id": "SHD_005", "count": 2}
        ]
    })
}

async fn resolve(payload: &Value) -> ResolvedDeck {
    let deck = Deck::from_payload("abc", payload).unwrap();
    let catalog = CardCatalog::new(Arc::new(sample_sets()), "data");
    ResolvedDeck::resolve(&catalog, &deck).await
}

fn sample_sets() -> Canned {
    Canned::default()
        .with(
            "data/sor.json",
            json!({"data": [
                {"Number": "001", "Name": "Director Krennic", "Type": "Leader", "Aspects": ["Aggression", "Villainy"]},
                {"Number": "010", "Name": "Darth Vader", "Type": "Unit", "Cost": 7, "Arenas": ["Ground"], "Aspects": ["Villainy"]},
                {"Number": "011", "Name": "TIE Fighter", "Type": "Unit", "Cost": 1, "Arenas": "Space"},
                {"Number": "020", "Name": "Dagobah Swamp", "Type": "Base", "Aspects": ["Vigilance"]}
            ]}),
        )
        .with(
            "data/shd.json",
            json!({"data": [
                {"Number": "005", "Name": "Bossk", "Type": "Unit", "Cost": "3", "Arenas": ["Ground"]}
            ]}),
        )
}

// =============================================================================
// Aggregation Tests
// =============================================================================

/// Main deck and sideboard copies of one card merge into one record.
#[test]
fn test_aggregate_merges_lists() {
    let counts = aggregate(&[DeckEntry::new("SOR_001", 2)], &[DeckEntry::new("SOR_001", 1)]);

    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].id, CardId::new("SOR", 1));
    assert_eq!((counts[0].main, counts[0].sideboard), (2, 1));
}

/// Rows with missing or malformed ids are skipped; the rest still count.
#[test]
fn test_aggregate_skips_bad_rows() {
    let main = [
        DeckEntry::default(),
        DeckEntry::new("SOR_", 2),
        DeckEntry::new("SOR_abc", 2),
        DeckEntry::new("SHD_007", 2),
    ];
    let counts = aggregate(&main, &[DeckEntry::new("nounderscore", 1)]);

    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].id.canonical(), "SHD_007");
}

/// Padding differences do not split a card into two records.
#[test]
fn test_aggregate_normalizes_padding() {
    let counts = aggregate(&[DeckEntry::new("SOR_1", 1), DeckEntry::new("SOR_001", 2)], &[]);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].main, 3);
}

// =============================================================================
// Payload Tests
// =============================================================================

/// Empty, error and shapeless payloads are rejected with distinct errors.
#[test]
fn test_payload_errors() {
    assert!(matches!(Deck::from_payload("x", &Value::Null), Err(DeckLoadError::Empty)));
    assert!(matches!(Deck::from_payload("x", &json!({})), Err(DeckLoadError::Empty)));
    assert!(matches!(
        Deck::from_payload("x", &json!({"error": "Deck not found"})),
        Err(DeckLoadError::Api(message)) if message == "Deck not found"
    ));
    assert!(matches!(
        Deck::from_payload("x", &json!({"metadata": {}})),
        Err(DeckLoadError::InvalidFormat)
    ));
}

/// A deck without a name is shown as "Unnamed Deck".
#[test]
fn test_unnamed_deck() {
    let deck = Deck::from_payload("x", &json!({"deck": []})).unwrap();
    assert_eq!(deck.name(), "Unnamed Deck");
    assert!(deck.card_counts().is_empty());
}

// =============================================================================
// Deck Client Tests
// =============================================================================

/// The client extracts the id from a page URL and requests `<base>/<id>`.
#[tokio::test]
async fn test_client_loads_from_page_url() {
    let fetcher = Arc::new(Canned::default().with("https://api.example/decks/AbC123", sample_deck()));
    let client = DeckClient::new(fetcher.clone(), "https://api.example/decks/");

    let deck = client.load("https://swudb.com/deck/AbC123").await.unwrap();
    assert_eq!(deck.id, "AbC123");
    assert_eq!(deck.name(), "Krennic <Control>");
    assert_eq!(deck.summary().main_entries, 5);
    assert_eq!(fetcher.requests(), ["https://api.example/decks/AbC123"]);
}

/// Blank input fails before any request is made.
#[tokio::test]
async fn test_client_rejects_missing_id() {
    let fetcher = Arc::new(Canned::default());
    let client = DeckClient::new(fetcher.clone(), "https://api.example/decks");

    assert!(matches!(client.load("   ").await, Err(DeckLoadError::MissingDeckId)));
    assert!(fetcher.requests().is_empty());
}

/// Transport failures surface as fetch errors.
#[tokio::test]
async fn test_client_surfaces_fetch_errors() {
    let client = DeckClient::new(Arc::new(Canned::default()), "https://api.example/decks");
    let err = client.load("missing").await.unwrap_err();
    assert!(matches!(err, DeckLoadError::Fetch(FetchError::Status { status: 404, .. })));
}

// =============================================================================
// End-to-End Tests
// =============================================================================

/// A loaded deck resolves every card, with placeholders for unknown ones.
#[tokio::test]
async fn test_resolve_deck() {
    let deck = Deck::from_payload("abc", &sample_deck()).unwrap();
    let catalog = CardCatalog::new(Arc::new(sample_sets()), "data");
    let resolved = ResolvedDeck::resolve(&catalog, &deck).await;

    assert_eq!(resolved.leaders.len(), 1);
    assert_eq!(resolved.leaders[0].metadata.name, "Director Krennic");
    assert_eq!(resolved.base.as_ref().unwrap().metadata.name, "Dagobah Swamp");

    let names: Vec<_> = resolved.cards.iter().map(|c| c.metadata.name.as_str()).collect();
    assert_eq!(names, ["Darth Vader", "Bossk", "TIE Fighter", "TWI_099"]);
    assert!(resolved.cards[3].metadata.is_unknown());

    let vader = &resolved.cards[0].counts;
    assert_eq!((vader.main, vader.sideboard), (3, 1));
}

/// Resolved cards group by type and render as escaped HTML tiles.
#[tokio::test]
async fn test_view_deck_as_html() {
    let deck = Deck::from_payload("abc", &sample_deck()).unwrap();
    let catalog = CardCatalog::new(Arc::new(sample_sets()), "data");
    let resolved = ResolvedDeck::resolve(&catalog, &deck).await;
    let engine = GroupingEngine::default();

    let groups = engine.render("type", &resolved.cards, &HtmlRenderer);
    let labels: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(labels, ["Ground Unit", "Space Unit", "Unknown"]);

    let vader = &groups[0].cards[0];
    assert!(vader.contains("data-card-id=\"SOR 010\""));
    assert!(vader.contains("Deck: 3 | Side: 1"));
    assert!(groups[2].cards[0].contains("<div class=\"card-placeholder\">TWI_099</div>"));

    let sections = engine.render_sections("cost", &resolved.cards, &HtmlRenderer);
    let page = HtmlRenderer.grid(&sections);
    assert!(page.starts_with("<div class=\"cards-grid\">"));
    assert!(page.contains("Cost: 1"));
}

/// Rendering the same deck twice gives byte-identical output.
#[tokio::test]
async fn test_render_is_deterministic() {
    let deck = Deck::from_payload("abc", &sample_deck()).unwrap();
    let catalog = CardCatalog::new(Arc::new(sample_sets()), "data");
    let resolved = ResolvedDeck::resolve(&catalog, &deck).await;
    let engine = GroupingEngine::default();

    for sort in ["set", "cost", "aspect", "type", "trait"] {
        assert_eq!(
            engine.render_sections(sort, &resolved.cards, &TextRenderer),
            engine.render_sections(sort, &resolved.cards, &TextRenderer)
        );
    }
}

// =============================================================================
// Page Tests
// =============================================================================

/// The HTML deck page is markup from the title down, with escaped names.
#[tokio::test]
async fn test_deck_page_html() {
    let resolved = resolve(&sample_deck()).await;
    let page = deck_page(&HtmlRenderer, &GroupingEngine::default(), "type", &resolved);

    assert!(page.starts_with("<h2>Krennic &lt;Control&gt;</h2><div class=\"summary-stats\">"));
    assert!(page.contains("<div class=\"stat-number\">5</div><div class=\"stat-label\">Main deck entries</div>"));
    assert!(page.contains("<div class=\"cards-grid\"><div class=\"set-section\"><div class=\"set-title\">Leaders &amp; Base</div>"));
    assert!(page.contains("Ground Unit"));
    assert!(!page.contains("== "));
    assert!(!page.contains('\n'));
}

/// The text deck page keeps the title and counts on their own lines.
#[tokio::test]
async fn test_deck_page_text() {
    let resolved = resolve(&sample_deck()).await;
    let page = deck_page(&TextRenderer, &GroupingEngine::default(), "set", &resolved);

    assert!(page.starts_with("Krennic <Control>\nMain deck entries: 5 | Sideboard entries: 1\n\n== Leaders & Base"));
}

/// The HTML comparison page sends the title, counts and every bucket through the renderer.
#[tokio::test]
async fn test_comparison_page_html() {
    let (deck_a, deck_b) = (sample_deck(), rival_deck());
    let (a, b) = tokio::join!(resolve(&deck_a), resolve(&deck_b));
    let comparison = DeckComparison::compare(&a.counts(), &b.counts()).sorted(&SetOrder::default());
    let page = comparison_page(&HtmlRenderer, &comparison, &a, &b);

    assert!(page.starts_with(
        "<h2>Deck Comparison: Krennic &lt;Control&gt; vs Vader &amp; Friends</h2><div class=\"summary-stats\">"
    ));
    assert!(page.contains("<div class=\"stat-label\">Only in Vader &amp; Friends</div>"));
    assert!(page.contains("<div class=\"cards-grid\"><div class=\"comparison-section\">"));
    assert!(page.contains("<div class=\"comparison-header\">Only in Krennic &lt;Control&gt; (1 cards)</div>"));
    assert!(page.contains("<div class=\"comparison-header\">Different Counts (2 cards)</div>"));
    assert!(page.contains("<div class=\"comparison-header\">Same Cards (1 cards)</div>"));
    assert!(page.contains("<div class=\"card-placeholder\">TWI_099</div>"));
    assert!(!page.contains("== "));
    assert!(!page.contains('\n'));
}

/// The text comparison page lists bucket sizes under the title.
#[tokio::test]
async fn test_comparison_page_text() {
    let (deck_a, deck_b) = (sample_deck(), rival_deck());
    let (a, b) = tokio::join!(resolve(&deck_a), resolve(&deck_b));
    let comparison = DeckComparison::compare(&a.counts(), &b.counts());
    let page = comparison_page(&TextRenderer, &comparison, &a, &b);

    assert!(page.starts_with(
        "Deck Comparison: Krennic <Control> vs Vader & Friends\n\
Only in Krennic <Control>: 1 | Only in Vader & Friends: 0 | Different Counts: 2 | Same Cards: 1\n"
    ));
    assert!(page.contains("== Same Cards (1 cards)"));
}

// =============================================================================
// Recent Decks Tests
// =============================================================================

/// The recent list keeps the newest entries first and survives a save/load.
#[tokio::test]
async fn test_recent_decks_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recent.json");
    let deck = Deck::from_payload("abc", &sample_deck()).unwrap();
    let catalog = CardCatalog::new(Arc::new(sample_sets()), "data");
    let resolved = ResolvedDeck::resolve(&catalog, &deck).await;

    let mut recent = RecentDecks::new(2);
    for url in ["https://swudb.com/deck/one", "https://swudb.com/deck/two"] {
        recent.record(RecentDeck::describe(url, &deck, None));
    }
    recent.record(RecentDeck::describe(
        "https://swudb.com/deck/abc",
        &deck,
        resolved.base.as_ref().map(|b| &b.metadata),
    ));
    recent.save(&path).unwrap();

    let loaded = RecentDecks::load(&path, 2);
    let urls: Vec<_> = loaded.entries().iter().map(|d| d.url.as_str()).collect();
    assert_eq!(urls, ["https://swudb.com/deck/abc", "https://swudb.com/deck/two"]);
    assert_eq!(loaded.entries()[0].base_aspect, "Vigilance");
    assert_eq!(loaded.entries()[1].base_aspect, "Command");
    assert_eq!(
        loaded.entries()[0].leader_art.as_deref(),
        Some("https://cdn.swu-db.com/images/cards/SOR/001.png")
    );
}

/// Removing by id or URL and clearing both persist.
#[test]
fn test_recent_decks_remove_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recent.json");
    let deck = Deck::from_payload("abc", &sample_deck()).unwrap();

    let mut recent = RecentDecks::default();
    for url in ["https://swudb.com/deck/one", "https://swudb.com/deck/two", "https://swudb.com/deck/three"] {
        recent.record(RecentDeck::describe(url, &deck, None));
    }
    assert!(recent.remove("two"));
    assert!(recent.remove("https://swudb.com/deck/one"));
    assert!(!recent.remove("missing"));
    recent.save(&path).unwrap();

    let mut loaded = RecentDecks::load(&path, 8);
    let urls: Vec<_> = loaded.entries().iter().map(|d| d.url.as_str()).collect();
    assert_eq!(urls, ["https://swudb.com/deck/three"]);

    loaded.clear();
    loaded.save(&path).unwrap();
    assert!(RecentDecks::load(&path, 8).is_empty());
}

/// Clearing the cache drops the set files and an emptied recent list stays empty.
#[tokio::test]
async fn test_clear_cache_drops_sets_and_recent_decks() {
    let dir = tempfile::tempdir().unwrap();
    let recent_path = dir.path().join("recent.json");
    std::fs::write(dir.path().join("sor.json"), "{}").unwrap();
    std::fs::write(dir.path().join("shd.json"), "{}").unwrap();

    let deck = Deck::from_payload("abc", &sample_deck()).unwrap();
    let mut recent = RecentDecks::default();
    recent.record(RecentDeck::describe("https://swudb.com/deck/abc", &deck, None));
    recent.save(&recent_path).unwrap();

    let removed = clear_set_files(&SetOrder::default(), dir.path()).await.unwrap();
    RecentDecks::default().save(&recent_path).unwrap();

    assert_eq!(removed, 2);
    assert!(!dir.path().join("sor.json").exists());
    assert!(recent_path.exists());
    assert!(RecentDecks::load(&recent_path, 8).is_empty());
}

// =============================================================================
// Identifier Property Tests
// =============================================================================

proptest! {
    /// Parsing ignores zero-padding width and formatting restores the canonical form.
    #[test]
    fn prop_identifier_round_trip(set in "[A-Z]{3}", number in 0u32..10_000, pad in 0usize..6) {
        let input = format!("{set}_{number:0pad$}");
        let id = CardId::parse(&input).unwrap();

        prop_assert_eq!(id.set(), set.as_str());
        prop_assert_eq!(id.number(), number);
        let reparsed = CardId::parse(&id.canonical()).unwrap();
        prop_assert_eq!(reparsed, id);
    }
}
