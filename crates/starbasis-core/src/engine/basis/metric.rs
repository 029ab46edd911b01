use super::{Basis, Star, Wave};
use crate::core::crystal::{Lattice, UnitCell};
use crate::engine::error::BasisError;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

/// `d|G|²/dθ_k` of each star's characteristic wave, indexed `[k][star]`.
pub(super) fn star_dksq<const D: usize>(
    waves: &[Wave<D>],
    stars: &[Star<D>],
    unit_cell: &UnitCell<D>,
) -> Vec<Vec<f64>> {
    (0..unit_cell.n_parameters())
        .map(|k| {
            stars
                .iter()
                .map(|star| unit_cell.dksq(&waves[star.characteristic_id()].indices_bz, k))
                .collect()
        })
        .collect()
}

impl<const D: usize> Basis<D> {
    /// Refreshes `|G|²` of every wave for new cell parameters.
    ///
    /// The lattice system must be the one the basis was built with; stars
    /// and their order are left untouched.
    pub fn update(&mut self, unit_cell: &UnitCell<D>) -> Result<(), BasisError> {
        self.check_cell(unit_cell)?;

        #[cfg(feature = "parallel")]
        let waves = self.waves.par_iter_mut();
        #[cfg(not(feature = "parallel"))]
        let waves = self.waves.iter_mut();

        waves.for_each(|wave| wave.sq_norm = unit_cell.ksq(&wave.indices_bz));
        self.build_metric = false;
        debug!(parameters = ?unit_cell.parameters(), "Updated wave norms.");
        Ok(())
    }

    /// Recomputes the per-star metric derivatives.
    pub fn make_dksq(&mut self, unit_cell: &UnitCell<D>) -> Result<(), BasisError> {
        self.check_cell(unit_cell)?;
        self.dksq = star_dksq(&self.waves, &self.stars, unit_cell);
        Ok(())
    }

    /// Derivative of `|G|²` of star `star` with respect to cell parameter
    /// `parameter`.
    pub fn dksq(&self, parameter: usize, star: usize) -> Result<f64, BasisError> {
        if !self.is_initialized() {
            return Err(BasisError::Uninitialized);
        }
        let row = self.dksq.get(parameter).ok_or(BasisError::IndexOutOfRange {
            kind: "cell parameter",
            index: parameter,
            len: self.dksq.len(),
        })?;
        row.get(star).copied().ok_or(BasisError::IndexOutOfRange {
            kind: "star",
            index: star,
            len: row.len(),
        })
    }

    /// The full derivative table, indexed `[parameter][star]`.
    pub fn dksq_table(&self) -> &[Vec<f64>] {
        &self.dksq
    }

    fn check_cell(&self, unit_cell: &UnitCell<D>) -> Result<Lattice, BasisError> {
        let expected = self.lattice.ok_or(BasisError::Uninitialized)?;
        let found = unit_cell.lattice().ok_or_else(|| {
            BasisError::MetricInconsistency("unit cell lattice is not set".to_string())
        })?;
        if found != expected {
            return Err(BasisError::LatticeMismatch { expected, found });
        }
        if unit_cell.n_parameters() != found.n_parameters() {
            return Err(BasisError::MetricInconsistency(format!(
                "lattice '{found}' expects {} parameter(s), the cell has {}",
                found.n_parameters(),
                unit_cell.n_parameters()
            )));
        }
        Ok(found)
    }
}
