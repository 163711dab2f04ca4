//! Card system: identifiers, set order and metadata.
//!
//! ## Key Types
//!
//! - `CardId`: `SET_NUMBER` identifier, parsed and formatted
//! - `SetOrder`: canonical release order of sets (configuration)
//! - `SetRanker`: per-pass ranking that places unknown sets last, first-seen first
//! - `CardMetadata`: normalized printed data of one card
//! - `RawCard`: a record as stored in a set data file

pub mod identifier;
pub mod metadata;

pub use identifier::{CardId, SetOrder, SetRanker};
pub use metadata::{CardMetadata, Labels, RawCard, UNKNOWN_TYPE};
