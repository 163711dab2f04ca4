//! Card metadata - the static printed data of one card.
//!
//! Per-set data files store one `RawCard` per card with loosely typed fields.
//! `CardMetadata::from_raw` normalizes those into a fixed shape:
//!
//! - `Aspects`, `Traits` and `Arenas` may be absent, `null`, a list, or a
//!   comma-separated string. All become an ordered list of strings.
//! - `Cost`, `Power` and `HP` may be numbers or strings. All become strings.
//! - `Number` may be a string or a number.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use tracing::debug;

use super::identifier::CardId;

/// Card type of placeholder records and of records without a type.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Ordered list of short labels (aspects, traits, arenas).
pub type Labels = SmallVec<[String; 2]>;

/// One card record as it appears in a set data file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawCard {
    #[serde(rename = "Number", default, deserialize_with = "loose_text")]
    pub number: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "loose_text")]
    pub card_type: Option<String>,
    #[serde(rename = "Aspects", default, deserialize_with = "label_list")]
    pub aspects: Vec<String>,
    #[serde(rename = "Traits", default, deserialize_with = "label_list")]
    pub traits: Vec<String>,
    #[serde(rename = "Arenas", default, deserialize_with = "label_list")]
    pub arenas: Vec<String>,
    #[serde(rename = "Cost", default, deserialize_with = "loose_text")]
    pub cost: Option<String>,
    #[serde(rename = "Power", default, deserialize_with = "loose_text")]
    pub power: Option<String>,
    #[serde(rename = "HP", default, deserialize_with = "loose_text")]
    pub hp: Option<String>,
    #[serde(rename = "FrontArt", default, deserialize_with = "loose_text")]
    pub front_art: Option<String>,
    #[serde(rename = "BackArt", default, deserialize_with = "loose_text")]
    pub back_art: Option<String>,
    #[serde(rename = "DoubleSided", default, deserialize_with = "loose_bool")]
    pub double_sided: bool,
}

/// Normalized, immutable metadata for one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    /// Set code the card was loaded from.
    pub set: String,
    /// Card number within the set.
    pub number: u32,
    pub name: String,
    /// "Unit", "Event", "Upgrade", "Leader", "Base", ... or "Unknown".
    pub card_type: String,
    pub aspects: Labels,
    pub traits: Labels,
    /// Only meaningful for units: "Ground" or "Space".
    pub arenas: Labels,
    /// Numeric string or the sentinel "X". `None` when the card has no cost.
    pub cost: Option<String>,
    pub power: Option<String>,
    pub hp: Option<String>,
    pub front_art: Option<String>,
    pub back_art: Option<String>,
    pub double_sided: bool,
}

impl CardMetadata {
    /// Build metadata from a raw record belonging to `set`.
    ///
    /// Returns `None` when the record has no usable card number.
    #[must_use]
    pub fn from_raw(set: &str, raw: RawCard) -> Option<Self> {
        let number = raw.number.as_deref()?.trim().parse::<u32>().ok()?;
        let name = raw
            .name
            .unwrap_or_else(|| CardId::new(set, number).canonical());
        let card_type = raw
            .card_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string());

        Some(Self {
            set: set.to_string(),
            number,
            name,
            card_type,
            aspects: raw.aspects.into_iter().collect(),
            traits: raw.traits.into_iter().collect(),
            arenas: raw.arenas.into_iter().collect(),
            cost: raw.cost,
            power: raw.power,
            hp: raw.hp,
            front_art: raw.front_art,
            back_art: raw.back_art,
            double_sided: raw.double_sided,
        })
    }

    /// Stand-in record for a card whose data is unavailable.
    ///
    /// Named after the identifier and typed `"Unknown"` so that it can always
    /// be rendered.
    #[must_use]
    pub fn placeholder(id: &CardId) -> Self {
        Self {
            set: id.set().to_string(),
            number: id.number(),
            name: id.canonical(),
            card_type: UNKNOWN_TYPE.to_string(),
            aspects: Labels::new(),
            traits: Labels::new(),
            arenas: Labels::new(),
            cost: None,
            power: None,
            hp: None,
            front_art: None,
            back_art: None,
            double_sided: false,
        }
    }

    /// Identifier of this card.
    #[must_use]
    pub fn id(&self) -> CardId {
        CardId::new(self.set.clone(), self.number)
    }

    /// Whether this record is unknown-typed (placeholders always are).
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.card_type == UNKNOWN_TYPE
    }

    /// First aspect, if any.
    #[must_use]
    pub fn primary_aspect(&self) -> Option<&str> {
        self.aspects.first().map(String::as_str)
    }

    /// First trait, if any.
    #[must_use]
    pub fn primary_trait(&self) -> Option<&str> {
        self.traits.first().map(String::as_str)
    }

    /// Whether the card fights in the space arena.
    #[must_use]
    pub fn in_space(&self) -> bool {
        self.arenas.iter().any(|a| a == "Space")
    }
}

/// Accept a string, a number or a bool; anything else (including `null`) is `None`.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Accept a list of strings, a comma-separated string, or nothing.
///
/// Any other shape reads as no labels, so one odd field never drops a card.
fn label_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(split_labels(&s)),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect()),
        Some(other) => {
            debug!(kind = value_kind(&other), "ignoring label field of unexpected shape");
            Ok(Vec::new())
        }
    }
}

fn split_labels(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
