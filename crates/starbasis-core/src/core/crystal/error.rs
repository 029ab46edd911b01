use super::lattice::Lattice;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrystalError {
    #[error("Unknown lattice system '{name}' for dimension {dimension}")]
    UnknownLattice { name: String, dimension: usize },

    #[error(
        "Lattice system '{lattice}' is {lattice_dimension}-dimensional, but the unit cell is {dimension}-dimensional"
    )]
    LatticeDimension {
        lattice: Lattice,
        lattice_dimension: usize,
        dimension: usize,
    },

    #[error("Lattice system '{lattice}' expects {expected} parameter(s), found {found}")]
    ParameterCount {
        lattice: Lattice,
        expected: usize,
        found: usize,
    },

    #[error("Unit cell lattice system is not set")]
    LatticeUnset,

    #[error("Unit cell parameters {parameters:?} describe a degenerate cell")]
    DegenerateCell { parameters: Vec<f64> },

    #[error("Unknown space group '{name}' in dimension {dimension}")]
    UnknownGroup { name: String, dimension: usize },

    #[error("Invalid symmetry operation '{text}': {reason}")]
    InvalidSymmetry { text: String, reason: String },

    #[error("Generators of '{name}' do not close into a finite group within {limit} operations")]
    GroupClosure { name: String, limit: usize },
}
