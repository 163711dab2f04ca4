//! Process-wide card catalog with single-flight set loading.
//!
//! ## Lifecycle
//!
//! - `CardCatalog::new`: empty cache bound to a fetcher and a data root
//! - `preload_all`: start loading every known set concurrently
//! - `resolve`: look a card up, loading its set on first use
//! - `clear`: drop cached sets and forget in-flight loads
//!
//! ## Load registry
//!
//! The first caller for an uncached set installs a watch channel in the
//! in-flight map and spawns the load. Later callers subscribe to the same
//! channel, so at most one fetch per set is outstanding. The load task removes
//! the registry entry and caches a success under the same lock, then publishes
//! the outcome to every subscriber. Failures are never cached.
//!
//! Set codes are case-insensitive: `"sor"` and `"SOR"` share one cache entry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::entry::CatalogEntry;
use crate::cards::{CardId, CardMetadata};
use crate::error::SetLoadError;
use crate::fetch::JsonFetcher;

type LoadOutcome = Result<CatalogEntry, SetLoadError>;
type LoadWatch = watch::Receiver<Option<LoadOutcome>>;

/// Shared, lazily populated index of card metadata.
///
/// Cloning is cheap; clones share the same cache and load registry.
#[derive(Clone)]
pub struct CardCatalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    fetcher: Arc<dyn JsonFetcher>,
    root: String,
    state: Mutex<CatalogState>,
    fetches: AtomicUsize,
}

#[derive(Default)]
struct CatalogState {
    sets: FxHashMap<String, CatalogEntry>,
    inflight: FxHashMap<String, LoadWatch>,
    /// Bumped by `clear` so that loads started before it do not repopulate the cache.
    generation: u64,
}

enum Subscription {
    Ready(CatalogEntry),
    Pending(LoadWatch),
}

impl CardCatalog {
    /// Create an empty catalog reading `<root>/<set>.json` through `fetcher`.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, root: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                fetcher,
                root: root.into(),
                state: Mutex::new(CatalogState::default()),
                fetches: AtomicUsize::new(0),
            }),
        }
    }

    /// Location of a set's data file: the lower-cased set code under the root.
    #[must_use]
    pub fn location(&self, set: &str) -> String {
        let file = format!("{}.json", set.to_lowercase());
        let root = self.inner.root.trim_end_matches('/');
        if root.is_empty() {
            file
        } else {
            format!("{root}/{file}")
        }
    }

    /// Number of set fetches issued since creation.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::Relaxed)
    }

    /// Load a set, or return it from the cache.
    ///
    /// Concurrent calls for the same uncached set share one fetch; a failure
    /// is delivered to all of them and is not cached.
    pub async fn ensure_set_loaded(&self, set: &str) -> Result<CatalogEntry, SetLoadError> {
        let set = set_key(set);
        match self.subscribe(&set).await {
            Subscription::Ready(entry) => Ok(entry),
            Subscription::Pending(watch) => wait_for(&set, watch).await,
        }
    }

    /// Start loading every set in `sets` and wait for all of them.
    ///
    /// Returns the failures; sets that loaded are cached either way.
    pub async fn preload_all<I, S>(&self, sets: I) -> Vec<SetLoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pending = Vec::new();
        for set in sets {
            let set = set_key(set.as_ref());
            if let Subscription::Pending(watch) = self.subscribe(&set).await {
                pending.push((set, watch));
            }
        }

        let mut failures = Vec::new();
        for (set, watch) in pending {
            if let Err(err) = wait_for(&set, watch).await {
                warn!(set = %set, error = %err, "preload failed");
                failures.push(err);
            }
        }
        failures
    }

    /// Metadata for `id`, or a placeholder when it cannot be found.
    ///
    /// Never fails: a set that fails to load and a number missing from a
    /// loaded set both yield `CardMetadata::placeholder`.
    pub async fn resolve(&self, id: &CardId) -> CardMetadata {
        match self.ensure_set_loaded(id.set()).await {
            Ok(entry) => match entry.get(id.number()) {
                Some(card) => card.clone(),
                None => {
                    warn!(card = %id, "card not found in set");
                    CardMetadata::placeholder(id)
                }
            },
            Err(err) => {
                warn!(card = %id, error = %err, "using placeholder for card");
                CardMetadata::placeholder(id)
            }
        }
    }

    /// Resolve several identifiers concurrently.
    ///
    /// Output order matches `ids`, whatever order the lookups finish in.
    pub async fn resolve_many(&self, ids: &[CardId]) -> Vec<CardMetadata> {
        let mut tasks = JoinSet::new();
        for (slot, id) in ids.iter().enumerate() {
            let catalog = self.clone();
            let id = id.clone();
            tasks.spawn(async move { (slot, catalog.resolve(&id).await) });
        }

        let mut resolved: Vec<Option<CardMetadata>> = vec![None; ids.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, card)) => resolved[slot] = Some(card),
                Err(err) => warn!(error = %err, "card lookup task failed"),
            }
        }
        resolved
            .into_iter()
            .zip(ids)
            .map(|(card, id)| card.unwrap_or_else(|| CardMetadata::placeholder(id)))
            .collect()
    }

    /// Check whether a set is cached.
    pub async fn is_loaded(&self, set: &str) -> bool {
        self.inner.state.lock().await.sets.contains_key(&set_key(set))
    }

    /// Set codes currently cached, sorted.
    pub async fn loaded_sets(&self) -> Vec<String> {
        let state = self.inner.state.lock().await;
        let mut sets: Vec<_> = state.sets.keys().cloned().collect();
        sets.sort();
        sets
    }

    /// Drop every cached set and forget in-flight loads.
    ///
    /// Callers already waiting on a load still receive its outcome, but that
    /// outcome is not cached.
    pub async fn clear(&self) {
        let mut state = self.inner.state.lock().await;
        state.sets.clear();
        state.inflight.clear();
        state.generation += 1;
        debug!(generation = state.generation, "catalog cleared");
    }

    /// `set` must already be normalized with `set_key`.
    async fn subscribe(&self, set: &str) -> Subscription {
        let mut state = self.inner.state.lock().await;
        if let Some(entry) = state.sets.get(set) {
            debug!(set, "catalog hit");
            return Subscription::Ready(entry.clone());
        }
        if let Some(watch) = state.inflight.get(set) {
            // A dropped sender means the load task died without publishing.
            if watch.has_changed().is_ok() {
                debug!(set, "joining in-flight load");
                return Subscription::Pending(watch.clone());
            }
            warn!(set, "discarding abandoned load");
        }

        let (tx, rx) = watch::channel(None);
        state.inflight.insert(set.to_string(), rx.clone());
        let generation = state.generation;
        drop(state);

        let inner = Arc::clone(&self.inner);
        let location = self.location(set);
        let set = set.to_string();
        tokio::spawn(async move {
            let outcome = inner.load(&set, &location, generation).await;
            // Every subscriber may already be gone.
            let _ = tx.send(Some(outcome));
        });
        Subscription::Pending(rx)
    }
}

impl CatalogInner {
    async fn load(&self, set: &str, location: &str, generation: u64) -> LoadOutcome {
        info!(set, location, "loading set");
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let outcome = match self.fetcher.fetch_json(location).await {
            Ok(document) => CatalogEntry::from_document(set, &document),
            Err(err) => Err(SetLoadError::new(set, err.to_string())),
        };

        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.inflight.remove(set);
            if let Ok(entry) = &outcome {
                state.sets.insert(set.to_string(), entry.clone());
            }
        }
        drop(state);

        match &outcome {
            Ok(entry) => info!(set, cards = entry.len(), "loaded set"),
            Err(err) => warn!(set, error = %err, "set load failed"),
        }
        outcome
    }
}

/// Cache key of a set code.
fn set_key(set: &str) -> String {
    set.trim().to_ascii_uppercase()
}

async fn wait_for(set: &str, mut watch: LoadWatch) -> LoadOutcome {
    let published = match watch.wait_for(Option::is_some).await {
        Ok(outcome) => (*outcome).clone(),
        Err(_) => None,
    };
    published.unwrap_or_else(|| Err(SetLoadError::new(set, "load was abandoned")))
}
