//! Card identifier bindings for Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::cards::CardId;

/// Python wrapper for CardId.
#[pyclass(name = "CardId")]
#[derive(Clone, Debug)]
pub struct PyCardId(pub CardId);

#[pymethods]
impl PyCardId {
    #[new]
    fn new(set: String, number: u32) -> Self {
        Self(CardId::new(set, number))
    }

    /// Parse a `SET_NUMBER` identifier. Raises ValueError when malformed.
    #[staticmethod]
    fn parse(input: &str) -> PyResult<Self> {
        CardId::parse(input)
            .map(Self)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn set(&self) -> &str {
        self.0.set()
    }

    #[getter]
    fn number(&self) -> u32 {
        self.0.number()
    }

    /// `SOR_001` form.
    fn canonical(&self) -> String {
        self.0.canonical()
    }

    /// `SOR 001` form.
    fn display(&self) -> String {
        self.0.display()
    }

    fn __str__(&self) -> String {
        self.0.canonical()
    }

    fn __repr__(&self) -> String {
        format!("CardId('{}')", self.0.canonical())
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish()
    }
}
