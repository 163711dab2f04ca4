//! Error taxonomy.
//!
//! Failures are split by blast radius:
//!
//! - `IdentifierError` and `SetLoadError` affect a single card. Callers absorb
//!   them (skip the row, or render a placeholder).
//! - `DeckLoadError` affects a whole deck and is surfaced to the caller.
//! - `UnknownSortStrategy` is only produced by strict parsing; rendering falls
//!   back to the set strategy instead.

use thiserror::Error;

/// A card identifier that does not follow the `SET_NUMBER` scheme.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier could not be split or its number could not be parsed.
    #[error("malformed card identifier {input:?}: {reason}")]
    Malformed { input: String, reason: &'static str },
}

/// Errors raised by a [`JsonFetcher`](crate::fetch::JsonFetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed.
    #[error("invalid url {0:?}")]
    InvalidUrl(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The body could not be read.
    #[error("failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },

    /// The body was not valid JSON.
    #[error("response from {url} was not JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Local file access failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Every attempt on every route failed.
    #[error("all attempts to fetch {url} failed: {last}")]
    Exhausted { url: String, last: String },
}

/// A set's catalog file could not be loaded.
///
/// Cloneable so that a single failed load can be handed to every caller
/// that was waiting on it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("failed to load set {set}: {reason}")]
pub struct SetLoadError {
    pub set: String,
    pub reason: String,
}

impl SetLoadError {
    pub fn new(set: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            set: set.into(),
            reason: reason.into(),
        }
    }
}

/// A requested deck could not be loaded.
#[derive(Debug, Error)]
pub enum DeckLoadError {
    /// No deck id could be extracted from the input.
    #[error("No deck ID provided")]
    MissingDeckId,

    /// The deck source could not be reached.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The deck source answered with nothing usable.
    #[error("Failed to load deck data - Server returned empty response")]
    Empty,

    /// The deck source answered with an `error` payload.
    #[error("API Error: {0}")]
    Api(String),

    /// The payload has no `deck` list.
    #[error("Invalid deck data format received from server")]
    InvalidFormat,
}

/// A grouping strategy name that is not one of the built-in strategies.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown sort strategy {0:?}")]
pub struct UnknownSortStrategy(pub String);

/// Configuration could not be read or written.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
