//! Python bindings for swu-deckview.
//!
//! Exposes the pure parts of the viewer (identifiers, aggregation, comparison
//! and grouping) for analysis scripts.
//!
//! # Quick Start
//!
//! ```python
//! import swu_deckview as sv
//!
//! counts = sv.aggregate([("SOR_001", 2)], [("SOR_001", 1)])
//! # [("SOR_001", 2, 1)]
//!
//! diff = sv.compare(counts, [("SOR_001", 1, 0)])
//! # diff["different"] == [("SOR_001", 2, 1, 1, 0)]
//! ```

use pyo3::prelude::*;

mod py_cards;
mod py_deck;

pub use py_cards::*;
pub use py_deck::*;

/// swu_deckview: deck aggregation, comparison and grouping.
#[pymodule]
fn swu_deckview(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCardId>()?;

    m.add_function(wrap_pyfunction!(aggregate, m)?)?;
    m.add_function(wrap_pyfunction!(compare, m)?)?;
    m.add_function(wrap_pyfunction!(group_keys, m)?)?;

    Ok(())
}
