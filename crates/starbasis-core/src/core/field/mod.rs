//! Reciprocal-space field containers and comparison utilities.

mod comparison;
mod dft;

pub use comparison::{ComparisonError, FieldComparison};
pub use dft::DftField;
