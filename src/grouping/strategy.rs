//! The five built-in sort strategies.
//!
//! | Strategy | Group key                                   | Group order                                   | Within group        |
//! |----------|---------------------------------------------|-----------------------------------------------|---------------------|
//! | `Set`    | set code                                    | canonical set order, unknown sets first-seen  | number              |
//! | `Cost`   | `Cost: <cost>` / `Cost: Unknown`            | numeric, other, `X`, `Unknown`                | canonical id order  |
//! | `Aspect` | first aspect / `Unknown`                    | alphabetical, `Unknown` last                  | canonical id order  |
//! | `Type`   | type, units split into Ground/Space Unit    | preferred list, then alphabetical, `Unknown`  | canonical id order  |
//! | `Trait`  | first trait / `No Traits`                   | alphabetical, `No Traits` last                | canonical id order  |
//!
//! Every within-group sort is stable.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{CardId, CardMetadata, SetOrder, UNKNOWN_TYPE};
use crate::error::UnknownSortStrategy;

const COST_PREFIX: &str = "Cost: ";
const UNKNOWN_COST: &str = "Cost: Unknown";
const X_COST: &str = "Cost: X";
const UNKNOWN_ASPECT: &str = "Unknown";
const NO_TRAITS: &str = "No Traits";
const GROUND_UNIT: &str = "Ground Unit";
const SPACE_UNIT: &str = "Space Unit";

/// Type groups shown before all others, in this order.
const PREFERRED_TYPES: [&str; 4] = [GROUND_UNIT, SPACE_UNIT, "Event", "Upgrade"];

/// Label of one group within a single grouping pass.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// How cards are partitioned and ordered for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    #[default]
    Set,
    Cost,
    Aspect,
    Type,
    Trait,
}

impl SortStrategy {
    pub const ALL: [SortStrategy; 5] = [
        SortStrategy::Set,
        SortStrategy::Cost,
        SortStrategy::Aspect,
        SortStrategy::Type,
        SortStrategy::Trait,
    ];

    /// Registry name of the strategy.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Cost => "cost",
            Self::Aspect => "aspect",
            Self::Type => "type",
            Self::Trait => "trait",
        }
    }

    /// Look a strategy up by name, falling back to `Set` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: UnknownSortStrategy| {
            debug!(error = %err, "falling back to set strategy");
            Self::Set
        })
    }

    /// Group a card belongs to.
    #[must_use]
    pub fn group_key(self, id: &CardId, metadata: &CardMetadata) -> GroupKey {
        match self {
            Self::Set => GroupKey::new(id.set()),
            Self::Cost => match metadata.cost.as_deref().map(str::trim) {
                Some(cost) if !cost.is_empty() => GroupKey::new(format!("{COST_PREFIX}{cost}")),
                _ => GroupKey::from(UNKNOWN_COST),
            },
            Self::Aspect => GroupKey::new(metadata.primary_aspect().unwrap_or(UNKNOWN_ASPECT)),
            Self::Type => {
                if metadata.card_type == "Unit" {
                    GroupKey::from(if metadata.in_space() { SPACE_UNIT } else { GROUND_UNIT })
                } else {
                    GroupKey::new(metadata.card_type.as_str())
                }
            }
            Self::Trait => GroupKey::new(metadata.primary_trait().unwrap_or(NO_TRAITS)),
        }
    }

    /// Order distinct group keys for display.
    ///
    /// `keys` must be in first-seen order; `Set` uses it to place unknown
    /// set codes.
    #[must_use]
    pub fn order_groups(self, keys: &[GroupKey], order: &SetOrder) -> Vec<GroupKey> {
        let mut ordered = keys.to_vec();
        match self {
            Self::Set => {
                let ranker = order.ranker(keys.iter().map(GroupKey::as_str));
                ordered.sort_by_key(|key| ranker.rank(key.as_str()));
            }
            Self::Cost => ordered.sort_by(|a, b| cost_rank(a).cmp(&cost_rank(b))),
            Self::Aspect => ordered.sort_by(|a, b| last_then_alpha(a, b, UNKNOWN_ASPECT)),
            Self::Type => ordered.sort_by(|a, b| type_rank(a).cmp(&type_rank(b))),
            Self::Trait => ordered.sort_by(|a, b| last_then_alpha(a, b, NO_TRAITS)),
        }
        ordered
    }

    /// Stable-sort the cards of one group.
    pub fn order_within<T, F>(self, cards: &mut [T], order: &SetOrder, id: F)
    where
        F: Fn(&T) -> &CardId,
    {
        match self {
            Self::Set => cards.sort_by_key(|card| id(card).number()),
            _ => order.sort_by_id(cards, id),
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortStrategy {
    type Err = UnknownSortStrategy;

    /// Strict lookup; names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownSortStrategy(s.to_string()))
    }
}

/// Cost groups: numeric ascending, then other values, then `X`, then `Unknown`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum CostRank<'a> {
    Numeric(u64),
    Other(&'a str),
    X,
    Unknown,
}

fn cost_rank(key: &GroupKey) -> CostRank<'_> {
    match key.as_str() {
        UNKNOWN_COST => CostRank::Unknown,
        X_COST => CostRank::X,
        other => {
            let value = other.strip_prefix(COST_PREFIX).unwrap_or(other);
            value
                .parse()
                .map_or(CostRank::Other(value), CostRank::Numeric)
        }
    }
}

/// Type groups: preferred list, then alphabetical, then `Unknown`.
fn type_rank(key: &GroupKey) -> (usize, &str) {
    let key = key.as_str();
    if key == UNKNOWN_TYPE {
        return (PREFERRED_TYPES.len() + 1, key);
    }
    match PREFERRED_TYPES.iter().position(|t| *t == key) {
        Some(index) => (index, ""),
        None => (PREFERRED_TYPES.len(), key),
    }
}

fn last_then_alpha(a: &GroupKey, b: &GroupKey, last: &str) -> Ordering {
    (a.as_str() == last, a.as_str()).cmp(&(b.as_str() == last, b.as_str()))
}
