//! Grouping engine: partition cards into labelled groups and order them.
//!
//! A strategy answers three questions for a list of cards: which group a
//! card belongs to, in which order groups are shown, and in which order
//! cards appear inside a group. The set of strategies is closed.
//!
//! ## Key Types
//!
//! - `SortStrategy`: set, cost, aspect, type or trait
//! - `GroupKey`: label of one group
//! - `GroupingEngine`: runs a strategy over resolved cards and renders them
//! - `CardGroup` / `RenderedGroup`: grouping output before and after rendering

pub mod engine;
pub mod strategy;

pub use engine::{CardGroup, GroupingEngine, RenderedGroup};
pub use strategy::{GroupKey, SortStrategy};
