use super::grid::Mesh;
use crate::core::IntVec;
use crate::core::crystal::UnitCell;
use itertools::Itertools;

/// Relative improvement a lattice shift must achieve to replace the current
/// image. Ties keep the centered representative.
const IMAGE_EPSILON: f64 = 1.0e-10;

/// Per-grid-point reciprocal data: minimum images, `|G|²` and implicit flags.
///
/// Indexed by mesh rank.
#[derive(Debug, Clone)]
pub struct WaveList<const D: usize> {
    mesh: Mesh<D>,
    minimum_images: Vec<IntVec<D>>,
    ksq: Vec<f64>,
    implicit: Vec<bool>,
}

impl<const D: usize> WaveList<D> {
    pub fn new(mesh: &Mesh<D>, unit_cell: &UnitCell<D>) -> Self {
        let (minimum_images, ksq): (Vec<_>, Vec<_>) = mesh
            .positions()
            .map(|position| {
                let raw = position.map(|p| p as i32);
                let image = shift_to_minimum(&raw, mesh.dimensions(), unit_cell);
                (image, unit_cell.ksq(&image))
            })
            .unzip();
        let implicit = mesh.positions().map(|p| mesh.is_implicit(&p)).collect();
        Self {
            mesh: *mesh,
            minimum_images,
            ksq,
            implicit,
        }
    }

    pub fn mesh(&self) -> &Mesh<D> {
        &self.mesh
    }

    pub fn len(&self) -> usize {
        self.minimum_images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minimum_images.is_empty()
    }

    pub fn minimum_image(&self, rank: usize) -> &IntVec<D> {
        &self.minimum_images[rank]
    }

    pub fn minimum_images(&self) -> &[IntVec<D>] {
        &self.minimum_images
    }

    pub fn ksq(&self, rank: usize) -> f64 {
        self.ksq[rank]
    }

    pub fn is_implicit(&self, rank: usize) -> bool {
        self.implicit[rank]
    }

    /// Refreshes `|G|²` after a change of cell parameters.
    ///
    /// Minimum images are kept, since the basis indexes waves by them.
    pub fn compute_ksq(&mut self, unit_cell: &UnitCell<D>) {
        for (value, image) in self.ksq.iter_mut().zip(self.minimum_images.iter()) {
            *value = unit_cell.ksq(image);
        }
    }

    /// `d|G|²/dθ_k` for every parameter `k` (outer index) and grid point.
    pub fn compute_dksq(&self, unit_cell: &UnitCell<D>) -> Vec<Vec<f64>> {
        (0..unit_cell.n_parameters())
            .map(|k| {
                self.minimum_images
                    .iter()
                    .map(|image| unit_cell.dksq(image, k))
                    .collect()
            })
            .collect()
    }
}

/// Returns the image of `wave` under lattice translations `G + m ∘ N` with the
/// smallest `|G|²`.
///
/// Components are first centered into `(-N/2, N/2]`; neighbouring images are
/// then searched until no shift strictly shortens the vector, which handles
/// strongly oblique cells. With an unset cell the centered image is returned.
pub fn shift_to_minimum<const D: usize>(
    wave: &IntVec<D>,
    dimensions: &[usize; D],
    unit_cell: &UnitCell<D>,
) -> IntVec<D> {
    let mut best = [0; D];
    for axis in 0..D {
        let n = dimensions[axis] as i32;
        let mut value = wave[axis].rem_euclid(n);
        if value > n / 2 {
            value -= n;
        }
        best[axis] = value;
    }
    if !unit_cell.is_set() {
        return best;
    }

    let shifts: Vec<Vec<i32>> = (0..D)
        .map(|_| -1..=1)
        .multi_cartesian_product()
        .filter(|shift: &Vec<i32>| shift.iter().any(|&s| s != 0))
        .collect();

    let mut best_norm = unit_cell.ksq(&best);
    loop {
        let mut improved = false;
        for shift in &shifts {
            let mut candidate = best;
            for axis in 0..D {
                candidate[axis] += shift[axis] * dimensions[axis] as i32;
            }
            let norm = unit_cell.ksq(&candidate);
            if norm < best_norm - IMAGE_EPSILON * best_norm.max(1.0) {
                best = candidate;
                best_norm = norm;
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }
    best
}
