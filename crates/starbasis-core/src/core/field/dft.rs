use crate::core::mesh::{Mesh, MeshError};
use num_complex::Complex64;
use std::ops::{Index, IndexMut};

/// Half-complex DFT of a real field on a `D`-dimensional mesh.
///
/// Stores `N_0 × … × N_{D-2} × (N_{D-1}/2 + 1)` coefficients in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DftField<const D: usize> {
    mesh: Mesh<D>,
    data: Vec<Complex64>,
}

impl<const D: usize> DftField<D> {
    /// A zero field on `mesh`.
    pub fn new(mesh: &Mesh<D>) -> Self {
        Self {
            mesh: *mesh,
            data: vec![Complex64::new(0.0, 0.0); mesh.dft_size()],
        }
    }

    pub fn from_data(mesh: &Mesh<D>, data: Vec<Complex64>) -> Result<Self, MeshError> {
        if data.len() != mesh.dft_size() {
            return Err(MeshError::DataLength {
                expected: mesh.dft_size(),
                found: data.len(),
            });
        }
        Ok(Self { mesh: *mesh, data })
    }

    pub fn mesh(&self) -> &Mesh<D> {
        &self.mesh
    }

    pub fn mesh_dimensions(&self) -> &[usize; D] {
        self.mesh.dimensions()
    }

    pub fn dft_dimensions(&self) -> [usize; D] {
        self.mesh.dft_dimensions()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Complex64> {
        self.data.iter()
    }

    pub fn into_inner(self) -> Vec<Complex64> {
        self.data
    }

    /// Largest coefficient modulus, zero for an empty field.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().map(|c| c.norm()).fold(0.0, f64::max)
    }
}

impl<const D: usize> Index<usize> for DftField<D> {
    type Output = Complex64;

    fn index(&self, index: usize) -> &Complex64 {
        &self.data[index]
    }
}

impl<const D: usize> IndexMut<usize> for DftField<D> {
    fn index_mut(&mut self, index: usize) -> &mut Complex64 {
        &mut self.data[index]
    }
}
