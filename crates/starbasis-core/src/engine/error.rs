use crate::core::crystal::{CrystalError, Lattice};
use crate::core::mesh::MeshError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BasisError {
    #[error("Basis has not been initialized")]
    Uninitialized,

    #[error("Invalid space group name '{name}' for dimension {dimension}")]
    InvalidGroupName { name: String, dimension: usize },

    #[error("Invalid space group definition: {0}")]
    InvalidGroup(String),

    #[error("Degenerate mesh: {0}")]
    DegenerateMesh(String),

    #[error("{kind} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Metric inconsistency: {0}")]
    MetricInconsistency(String),

    #[error("Mesh {dimensions:?} is not invariant under symmetry operation '{symmetry}'")]
    IncompatibleMesh {
        dimensions: Vec<usize>,
        symmetry: String,
    },

    #[error("DFT violates the declared symmetry at star {star}: residual imaginary part {residual:e}")]
    SymmetryViolation { star: usize, residual: f64 },

    #[error("Expected {expected} {what}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Lattice system changed from '{expected}' to '{found}'; the basis must be rebuilt")]
    LatticeMismatch { expected: Lattice, found: Lattice },

    #[error("Inconsistent basis: {0}")]
    Inconsistent(String),
}

impl From<CrystalError> for BasisError {
    fn from(error: CrystalError) -> Self {
        match error {
            CrystalError::UnknownGroup { name, dimension } => {
                BasisError::InvalidGroupName { name, dimension }
            }
            CrystalError::InvalidSymmetry { .. } | CrystalError::GroupClosure { .. } => {
                BasisError::InvalidGroup(error.to_string())
            }
            other => BasisError::MetricInconsistency(other.to_string()),
        }
    }
}

impl From<MeshError> for BasisError {
    fn from(error: MeshError) -> Self {
        BasisError::DegenerateMesh(error.to_string())
    }
}
