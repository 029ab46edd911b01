use super::error::CrystalError;
use super::lattice::Lattice;
use crate::core::IntVec;
use nalgebra::DMatrix;
use std::f64::consts::TAU;

/// Periodic unit cell of a `D`-dimensional crystal.
///
/// Stores the Bravais basis `A` (rows are lattice vectors), the reciprocal
/// basis `B = 2π (A⁻¹)ᵀ` with `A Bᵀ = 2π I`, the reciprocal metric
/// `g* = B Bᵀ`, and the derivative of `g*` with respect to every independent
/// cell parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCell<const D: usize> {
    lattice: Option<Lattice>,
    parameters: Vec<f64>,
    r_basis: DMatrix<f64>,
    k_basis: DMatrix<f64>,
    k_metric: DMatrix<f64>,
    dk_metric: Vec<DMatrix<f64>>,
}

impl<const D: usize> Default for UnitCell<D> {
    fn default() -> Self {
        Self {
            lattice: None,
            parameters: Vec::new(),
            r_basis: DMatrix::zeros(D, D),
            k_basis: DMatrix::zeros(D, D),
            k_metric: DMatrix::zeros(D, D),
            dk_metric: Vec::new(),
        }
    }
}

impl<const D: usize> UnitCell<D> {
    pub fn new(lattice: Lattice, parameters: &[f64]) -> Result<Self, CrystalError> {
        if lattice.dimension() != D {
            return Err(CrystalError::LatticeDimension {
                lattice,
                lattice_dimension: lattice.dimension(),
                dimension: D,
            });
        }
        let mut cell = Self {
            lattice: Some(lattice),
            ..Self::default()
        };
        cell.set_parameters(parameters)?;
        Ok(cell)
    }

    pub fn from_name(name: &str, parameters: &[f64]) -> Result<Self, CrystalError> {
        Self::new(Lattice::from_name(name, D)?, parameters)
    }

    /// Replaces the cell parameters, keeping the lattice system.
    ///
    /// On error the cell is left unchanged.
    pub fn set_parameters(&mut self, parameters: &[f64]) -> Result<(), CrystalError> {
        let lattice = self.lattice.ok_or(CrystalError::LatticeUnset)?;
        let r_basis = lattice.bravais(parameters)?;
        let degenerate = || CrystalError::DegenerateCell {
            parameters: parameters.to_vec(),
        };
        if r_basis.determinant().abs() < 1.0e-12 {
            return Err(degenerate());
        }
        let inverse = r_basis.clone().try_inverse().ok_or_else(degenerate)?;
        let k_basis = inverse.transpose() * TAU;
        let k_metric = &k_basis * k_basis.transpose();

        let dk_metric = (0..lattice.n_parameters())
            .map(|k| {
                let d_r = lattice.bravais_derivative(parameters, k)?;
                let d_k = -(&k_basis * d_r.transpose() * &k_basis) / TAU;
                Ok(&d_k * k_basis.transpose() + &k_basis * d_k.transpose())
            })
            .collect::<Result<Vec<_>, CrystalError>>()?;

        self.parameters = parameters.to_vec();
        self.r_basis = r_basis;
        self.k_basis = k_basis;
        self.k_metric = k_metric;
        self.dk_metric = dk_metric;
        Ok(())
    }

    pub fn lattice(&self) -> Option<Lattice> {
        self.lattice
    }

    pub fn is_set(&self) -> bool {
        self.lattice.is_some()
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn n_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn r_basis(&self) -> &DMatrix<f64> {
        &self.r_basis
    }

    pub fn k_basis(&self) -> &DMatrix<f64> {
        &self.k_basis
    }

    pub fn k_metric(&self) -> &DMatrix<f64> {
        &self.k_metric
    }

    /// Cell volume (area in 2D, length in 1D).
    pub fn volume(&self) -> f64 {
        self.r_basis.determinant().abs()
    }

    /// Squared magnitude `|Σ_i G_i b_i|²` of a wavevector.
    pub fn ksq(&self, wave: &IntVec<D>) -> f64 {
        quadratic_form(&self.k_metric, wave)
    }

    /// Derivative of [`Self::ksq`] with respect to cell parameter `parameter`.
    ///
    /// Returns zero for an index past the parameter count.
    pub fn dksq(&self, wave: &IntVec<D>, parameter: usize) -> f64 {
        self.dk_metric
            .get(parameter)
            .map_or(0.0, |metric| quadratic_form(metric, wave))
    }
}

fn quadratic_form<const D: usize>(metric: &DMatrix<f64>, wave: &IntVec<D>) -> f64 {
    let mut sum = 0.0;
    for i in 0..D {
        for j in 0..D {
            sum += f64::from(wave[i]) * f64::from(wave[j]) * metric[(i, j)];
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn reciprocal_basis_satisfies_orthogonality() {
        let cell = UnitCell::<3>::new(Lattice::Monoclinic, &[1.1, 1.4, 1.8, 1.9]).unwrap();
        let product = cell.r_basis() * cell.k_basis().transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { TAU } else { 0.0 };
                assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn cubic_ksq_scales_with_cell_size() {
        let cell = UnitCell::<3>::new(Lattice::Cubic, &[2.0]).unwrap();
        assert_relative_eq!(cell.ksq(&[1, 1, 0]), 2.0 * PI * PI, epsilon = 1e-12);
        assert_relative_eq!(cell.dksq(&[1, 1, 0], 0), -2.0 * PI * PI, epsilon = 1e-10);
    }

    #[test]
    fn hexagonal_first_shell_is_degenerate() {
        let cell = UnitCell::<2>::new(Lattice::Hexagonal2D, &[1.0]).unwrap();
        let reference = cell.ksq(&[1, 0]);
        assert_relative_eq!(cell.ksq(&[0, 1]), reference, epsilon = 1e-12);
        assert_relative_eq!(cell.ksq(&[1, -1]), reference, epsilon = 1e-12);
        assert_relative_eq!(cell.ksq(&[1, 1]), 3.0 * reference, epsilon = 1e-10);
        assert_relative_eq!(reference, 16.0 * PI * PI / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn metric_derivatives_match_finite_differences() {
        let params = [1.2, 1.5, 1.9, 1.3, 1.4, 1.7];
        let wave = [1, -2, 3];
        let cell = UnitCell::<3>::new(Lattice::Triclinic, &params).unwrap();
        let h = 1.0e-6;
        for k in 0..6 {
            let mut plus = params;
            let mut minus = params;
            plus[k] += h;
            minus[k] -= h;
            let numeric = (UnitCell::<3>::new(Lattice::Triclinic, &plus).unwrap().ksq(&wave)
                - UnitCell::<3>::new(Lattice::Triclinic, &minus).unwrap().ksq(&wave))
                / (2.0 * h);
            assert_relative_eq!(cell.dksq(&wave, k), numeric, max_relative = 1e-5);
        }
    }

    #[test]
    fn lattice_of_wrong_dimension_is_rejected() {
        let err = UnitCell::<2>::new(Lattice::Cubic, &[1.0]).unwrap_err();
        assert!(matches!(err, CrystalError::LatticeDimension { dimension: 2, .. }));
    }

    #[test]
    fn failed_update_keeps_previous_parameters() {
        let mut cell = UnitCell::<1>::new(Lattice::Lamellar, &[3.0]).unwrap();
        assert!(cell.set_parameters(&[0.0]).is_err());
        assert_eq!(cell.parameters(), &[3.0]);
    }

    #[test]
    fn default_cell_is_unset() {
        let cell = UnitCell::<2>::default();
        assert!(!cell.is_set());
        assert_eq!(cell.ksq(&[1, 1]), 0.0);
    }
}
