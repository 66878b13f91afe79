//! Deterministic JSON serialization for the store file.
//!
//! Keeps the file stable between writes by:
//! - Sorting object keys alphabetically (via `BTreeMap`)
//! - Using 2-space indentation
//! - Adding trailing newline

mod json;

pub use json::*;
