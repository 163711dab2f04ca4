//! Card identifiers and canonical set ordering.
//!
//! Every card is named by `SET_NUMBER` (for example `SOR_001`). The number is
//! zero-padded in source data, but all comparisons use the parsed integer.

use std::cmp::Ordering;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Width of the zero-padded number in canonical identifiers.
const NUMBER_WIDTH: usize = 3;

/// Identifier of a physical card: a set code plus a card number.
///
/// ## Example
///
/// ```
/// use swu_deckview::cards::CardId;
///
/// let id: CardId = "SOR_7".parse().unwrap();
/// assert_eq!(id.set(), "SOR");
/// assert_eq!(id.number(), 7);
/// assert_eq!(id.canonical(), "SOR_007");
/// assert_eq!(id.display(), "SOR 007");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId {
    set: String,
    number: u32,
}

impl CardId {
    /// Create an identifier from its parts.
    #[must_use]
    pub fn new(set: impl Into<String>, number: u32) -> Self {
        Self {
            set: set.into(),
            number,
        }
    }

    /// Parse a `SET_NUMBER` identifier.
    ///
    /// Splits on the first `_`. Both halves must be non-empty and the number
    /// must consist of ASCII digits only.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let malformed = |reason| IdentifierError::Malformed {
            input: input.to_string(),
            reason,
        };

        let (set, number) = input
            .split_once('_')
            .ok_or_else(|| malformed("missing '_' separator"))?;
        if set.is_empty() {
            return Err(malformed("empty set code"));
        }
        if number.is_empty() {
            return Err(malformed("empty card number"));
        }
        if !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("card number is not a non-negative integer"));
        }
        let number = number
            .parse::<u32>()
            .map_err(|_| malformed("card number out of range"))?;

        Ok(Self::new(set, number))
    }

    /// Set code (e.g. `"SOR"`).
    #[must_use]
    pub fn set(&self) -> &str {
        &self.set
    }

    /// Card number within the set.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Canonical API form: `SOR_001`.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}_{:0width$}", self.set, self.number, width = NUMBER_WIDTH)
    }

    /// Human-readable form used on card tiles: `SOR 001`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:0width$}", self.set, self.number, width = NUMBER_WIDTH)
    }

    /// Path fragment used by the card image CDN: `SOR/001`.
    #[must_use]
    pub fn art_path(&self) -> String {
        format!("{}/{:0width$}", self.set, self.number, width = NUMBER_WIDTH)
    }
}

impl FromStr for CardId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CardId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CardId> for String {
    fn from(id: CardId) -> Self {
        id.canonical()
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{:0width$}", self.set, self.number, width = NUMBER_WIDTH)
    }
}

/// The canonical release order of sets.
///
/// Supplied by configuration. Set codes missing from the list are tolerated
/// and sort after every known set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetOrder(Vec<String>);

impl Default for SetOrder {
    fn default() -> Self {
        Self::new(["SOR", "SHD", "TWI", "JTL", "LOF", "IBH", "SEC"])
    }
}

impl SetOrder {
    /// Create an order from set codes, earliest release first.
    pub fn new<I, S>(sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(sets.into_iter().map(Into::into).collect())
    }

    /// Position of `set` in the order, if known.
    #[must_use]
    pub fn index_of(&self, set: &str) -> Option<usize> {
        self.0.iter().position(|s| s == set)
    }

    /// Check whether `set` is a known set code.
    #[must_use]
    pub fn contains(&self, set: &str) -> bool {
        self.index_of(set).is_some()
    }

    /// Known set codes in order.
    #[must_use]
    pub fn sets(&self) -> &[String] {
        &self.0
    }

    /// Number of known sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no sets are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a ranker for one pass over `sets`.
    ///
    /// Unknown set codes are ranked after the known ones in the order they
    /// first appear in `sets`.
    pub fn ranker<'a, I>(&self, sets: I) -> SetRanker
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ranks = FxHashMap::default();
        let mut unknown = 0;
        for set in sets {
            if ranks.contains_key(set) {
                continue;
            }
            let rank = match self.index_of(set) {
                Some(index) => index,
                None => {
                    unknown += 1;
                    self.0.len() + unknown - 1
                }
            };
            ranks.insert(set.to_string(), rank);
        }
        SetRanker { ranks }
    }

    /// Stable-sort `items` in canonical identifier order.
    ///
    /// Items with identical identifiers keep their relative order.
    pub fn sort_by_id<T, F>(&self, items: &mut [T], id: F)
    where
        F: Fn(&T) -> &CardId,
    {
        let ranker = self.ranker(items.iter().map(|item| id(item).set()));
        items.sort_by(|a, b| ranker.compare(id(a), id(b)));
    }
}

/// Rank table for the set codes seen in one grouping or comparison pass.
#[derive(Clone, Debug, Default)]
pub struct SetRanker {
    ranks: FxHashMap<String, usize>,
}

impl SetRanker {
    /// Rank of a set code. Codes never seen by this ranker sort last.
    #[must_use]
    pub fn rank(&self, set: &str) -> usize {
        self.ranks.get(set).copied().unwrap_or(usize::MAX)
    }

    /// Sort key of an identifier: set rank, then number.
    #[must_use]
    pub fn key(&self, id: &CardId) -> (usize, u32) {
        (self.rank(id.set()), id.number())
    }

    /// Compare two identifiers in canonical order.
    #[must_use]
    pub fn compare(&self, a: &CardId, b: &CardId) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }
}
