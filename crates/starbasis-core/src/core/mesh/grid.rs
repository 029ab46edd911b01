use crate::core::IntVec;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Unsupported dimensionality {0}; expected 1, 2 or 3")]
    Dimensionality(usize),

    #[error("Mesh dimension {axis} is zero (dimensions {dimensions:?})")]
    ZeroDimension { axis: usize, dimensions: Vec<usize> },

    #[error("Expected {expected} mesh dimension(s), found {found}")]
    DimensionCount { expected: usize, found: usize },

    #[error("Expected {expected} DFT value(s), found {found}")]
    DataLength { expected: usize, found: usize },
}

/// Regular `N_0 × … × N_{D-1}` mesh of a periodic unit cell.
///
/// Grid points are ranked row-major (last index fastest). The half-complex DFT
/// of a real field on this mesh stores `N_{D-1}/2 + 1` entries along the last
/// axis; the remaining coefficients follow from Hermitian symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mesh<const D: usize> {
    dimensions: [usize; D],
}

impl<const D: usize> Mesh<D> {
    pub fn new(dimensions: [usize; D]) -> Result<Self, MeshError> {
        if !(1..=3).contains(&D) {
            return Err(MeshError::Dimensionality(D));
        }
        if let Some(axis) = dimensions.iter().position(|&n| n == 0) {
            return Err(MeshError::ZeroDimension {
                axis,
                dimensions: dimensions.to_vec(),
            });
        }
        Ok(Self { dimensions })
    }

    pub fn from_slice(dimensions: &[usize]) -> Result<Self, MeshError> {
        let dimensions: [usize; D] =
            dimensions
                .try_into()
                .map_err(|_| MeshError::DimensionCount {
                    expected: D,
                    found: dimensions.len(),
                })?;
        Self::new(dimensions)
    }

    pub fn dimensions(&self) -> &[usize; D] {
        &self.dimensions
    }

    pub fn dimension(&self, axis: usize) -> usize {
        self.dimensions[axis]
    }

    pub fn size(&self) -> usize {
        self.dimensions.iter().product()
    }

    pub fn rank(&self, position: &[usize; D]) -> usize {
        position
            .iter()
            .zip(self.dimensions.iter())
            .fold(0, |rank, (&p, &n)| rank * n + p)
    }

    pub fn position(&self, mut rank: usize) -> [usize; D] {
        let mut position = [0; D];
        for axis in (0..D).rev() {
            position[axis] = rank % self.dimensions[axis];
            rank /= self.dimensions[axis];
        }
        position
    }

    /// Reduces arbitrary integer indices into the mesh, `0 <= p_i < N_i`.
    pub fn wrap(&self, wave: &IntVec<D>) -> [usize; D] {
        let mut position = [0; D];
        for axis in 0..D {
            position[axis] = i64::from(wave[axis]).rem_euclid(self.dimensions[axis] as i64) as usize;
        }
        position
    }

    pub fn wrapped_rank(&self, wave: &IntVec<D>) -> usize {
        self.rank(&self.wrap(wave))
    }

    pub fn positions(&self) -> impl Iterator<Item = [usize; D]> + '_ {
        (0..self.size()).map(|rank| self.position(rank))
    }

    pub fn dft_dimensions(&self) -> [usize; D] {
        let mut dimensions = self.dimensions;
        dimensions[D - 1] = dimensions[D - 1] / 2 + 1;
        dimensions
    }

    pub fn dft_size(&self) -> usize {
        self.dft_dimensions().iter().product()
    }

    /// True for grid points whose DFT coefficient is not stored explicitly.
    pub fn is_implicit(&self, position: &[usize; D]) -> bool {
        position[D - 1] > self.dimensions[D - 1] / 2
    }

    /// Rank of a grid point in the half-complex layout, if stored there.
    pub fn dft_rank(&self, position: &[usize; D]) -> Option<usize> {
        if self.is_implicit(position) {
            return None;
        }
        let dft = self.dft_dimensions();
        Some(
            position
                .iter()
                .zip(dft.iter())
                .fold(0, |rank, (&p, &n)| rank * n + p),
        )
    }

    pub fn dft_position(&self, mut rank: usize) -> [usize; D] {
        let dft = self.dft_dimensions();
        let mut position = [0; D];
        for axis in (0..D).rev() {
            position[axis] = rank % dft[axis];
            rank /= dft[axis];
        }
        position
    }
}
