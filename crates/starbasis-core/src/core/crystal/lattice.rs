use super::error::CrystalError;
use nalgebra::DMatrix;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};
use std::fmt;

const RIGHT_ANGLE: f64 = FRAC_PI_2;
const HEXAGONAL_ANGLE: f64 = 2.0 * FRAC_PI_3;

/// Source of one entry of the full (oblique or triclinic) parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Param(usize),
    Fixed(f64),
}

use Slot::{Fixed, Param};

const LAMELLAR: &[Slot] = &[Param(0)];
const SQUARE: &[Slot] = &[Param(0), Param(0), Fixed(RIGHT_ANGLE)];
const RECTANGULAR: &[Slot] = &[Param(0), Param(1), Fixed(RIGHT_ANGLE)];
const RHOMBIC: &[Slot] = &[Param(0), Param(0), Param(1)];
const HEXAGONAL_2D: &[Slot] = &[Param(0), Param(0), Fixed(HEXAGONAL_ANGLE)];
const OBLIQUE: &[Slot] = &[Param(0), Param(1), Param(2)];
const CUBIC: &[Slot] = &[
    Param(0),
    Param(0),
    Param(0),
    Fixed(RIGHT_ANGLE),
    Fixed(RIGHT_ANGLE),
    Fixed(RIGHT_ANGLE),
];
const TETRAGONAL: &[Slot] = &[
    Param(0),
    Param(0),
    Param(1),
    Fixed(RIGHT_ANGLE),
    Fixed(RIGHT_ANGLE),
    Fixed(RIGHT_ANGLE),
];
const ORTHORHOMBIC: &[Slot] = &[
    Param(0),
    Param(1),
    Param(2),
    Fixed(RIGHT_ANGLE),
    Fixed(RIGHT_ANGLE),
    Fixed(RIGHT_ANGLE),
];
const MONOCLINIC: &[Slot] = &[
    Param(0),
    Param(1),
    Param(2),
    Fixed(RIGHT_ANGLE),
    Param(3),
    Fixed(RIGHT_ANGLE),
];
const TRICLINIC: &[Slot] = &[
    Param(0),
    Param(1),
    Param(2),
    Param(3),
    Param(4),
    Param(5),
];
const RHOMBOHEDRAL: &[Slot] = &[
    Param(0),
    Param(0),
    Param(0),
    Param(1),
    Param(1),
    Param(1),
];
const HEXAGONAL: &[Slot] = &[
    Param(0),
    Param(0),
    Param(1),
    Fixed(RIGHT_ANGLE),
    Fixed(RIGHT_ANGLE),
    Fixed(HEXAGONAL_ANGLE),
];

/// Crystal (lattice) system of a unit cell.
///
/// Every system is expressed through the most general lattice of its
/// dimension: an oblique cell `(a, b, gamma)` in 2D and a triclinic cell
/// `(a, b, c, alpha, beta, gamma)` in 3D. Each variant only declares which of
/// those general parameters it owns and which are fixed. Angles are radians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lattice {
    Lamellar,
    Square,
    Rectangular,
    Rhombic,
    Hexagonal2D,
    Oblique,
    Cubic,
    Tetragonal,
    Orthorhombic,
    Monoclinic,
    Triclinic,
    Rhombohedral,
    Hexagonal,
}

impl Lattice {
    pub const ALL: [Lattice; 13] = [
        Lattice::Lamellar,
        Lattice::Square,
        Lattice::Rectangular,
        Lattice::Rhombic,
        Lattice::Hexagonal2D,
        Lattice::Oblique,
        Lattice::Cubic,
        Lattice::Tetragonal,
        Lattice::Orthorhombic,
        Lattice::Monoclinic,
        Lattice::Triclinic,
        Lattice::Rhombohedral,
        Lattice::Hexagonal,
    ];

    /// Resolves a lattice system name for a given dimensionality.
    ///
    /// Matching is case-insensitive. `"hexagonal"` names the 2D or 3D system
    /// depending on `dimension`.
    pub fn from_name(name: &str, dimension: usize) -> Result<Self, CrystalError> {
        let key = name.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|lattice| lattice.dimension() == dimension && lattice.name() == key)
            .ok_or_else(|| CrystalError::UnknownLattice {
                name: name.to_string(),
                dimension,
            })
    }

    pub fn name(self) -> &'static str {
        match self {
            Lattice::Lamellar => "lamellar",
            Lattice::Square => "square",
            Lattice::Rectangular => "rectangular",
            Lattice::Rhombic => "rhombic",
            Lattice::Hexagonal2D | Lattice::Hexagonal => "hexagonal",
            Lattice::Oblique => "oblique",
            Lattice::Cubic => "cubic",
            Lattice::Tetragonal => "tetragonal",
            Lattice::Orthorhombic => "orthorhombic",
            Lattice::Monoclinic => "monoclinic",
            Lattice::Triclinic => "triclinic",
            Lattice::Rhombohedral => "rhombohedral",
        }
    }

    pub fn dimension(self) -> usize {
        match self {
            Lattice::Lamellar => 1,
            Lattice::Square
            | Lattice::Rectangular
            | Lattice::Rhombic
            | Lattice::Hexagonal2D
            | Lattice::Oblique => 2,
            _ => 3,
        }
    }

    /// Number of independent cell parameters owned by this system.
    pub fn n_parameters(self) -> usize {
        self.slots()
            .iter()
            .filter_map(|slot| match slot {
                Param(index) => Some(index + 1),
                Fixed(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    fn slots(self) -> &'static [Slot] {
        match self {
            Lattice::Lamellar => LAMELLAR,
            Lattice::Square => SQUARE,
            Lattice::Rectangular => RECTANGULAR,
            Lattice::Rhombic => RHOMBIC,
            Lattice::Hexagonal2D => HEXAGONAL_2D,
            Lattice::Oblique => OBLIQUE,
            Lattice::Cubic => CUBIC,
            Lattice::Tetragonal => TETRAGONAL,
            Lattice::Orthorhombic => ORTHORHOMBIC,
            Lattice::Monoclinic => MONOCLINIC,
            Lattice::Triclinic => TRICLINIC,
            Lattice::Rhombohedral => RHOMBOHEDRAL,
            Lattice::Hexagonal => HEXAGONAL,
        }
    }

    /// Expands the independent parameters into the general parameter set.
    pub(crate) fn general_parameters(self, parameters: &[f64]) -> Result<Vec<f64>, CrystalError> {
        let expected = self.n_parameters();
        if parameters.len() != expected {
            return Err(CrystalError::ParameterCount {
                lattice: self,
                expected,
                found: parameters.len(),
            });
        }
        Ok(self
            .slots()
            .iter()
            .map(|slot| match *slot {
                Param(index) => parameters[index],
                Fixed(value) => value,
            })
            .collect())
    }

    /// Bravais matrix (rows are lattice vectors) for the given parameters.
    pub(crate) fn bravais(self, parameters: &[f64]) -> Result<DMatrix<f64>, CrystalError> {
        let general = self.general_parameters(parameters)?;
        general_bravais(self.dimension(), &general)
            .ok_or_else(|| CrystalError::DegenerateCell { parameters: parameters.to_vec() })
    }

    /// Derivative of the Bravais matrix with respect to independent parameter
    /// `index`, summing the contributions of every general slot it feeds.
    pub(crate) fn bravais_derivative(
        self,
        parameters: &[f64],
        index: usize,
    ) -> Result<DMatrix<f64>, CrystalError> {
        let general = self.general_parameters(parameters)?;
        let dimension = self.dimension();
        let mut derivative = DMatrix::zeros(dimension, dimension);
        for (slot_index, slot) in self.slots().iter().enumerate() {
            if *slot == Param(index) {
                let partial = general_bravais_derivative(dimension, &general, slot_index)
                    .ok_or_else(|| CrystalError::DegenerateCell {
                        parameters: parameters.to_vec(),
                    })?;
                derivative += partial;
            }
        }
        Ok(derivative)
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Height components `(u, w)` of the third triclinic vector, in units of `c`.
fn triclinic_heights(alpha: f64, beta: f64, gamma: f64) -> Option<(f64, f64)> {
    let sin_gamma = gamma.sin();
    if sin_gamma.abs() < 1.0e-12 {
        return None;
    }
    let u = (alpha.cos() - beta.cos() * gamma.cos()) / sin_gamma;
    let w_sq = 1.0 - beta.cos().powi(2) - u * u;
    if w_sq <= 1.0e-14 {
        return None;
    }
    Some((u, w_sq.sqrt()))
}

fn general_bravais(dimension: usize, p: &[f64]) -> Option<DMatrix<f64>> {
    match dimension {
        1 => Some(DMatrix::from_row_slice(1, 1, &[p[0]])),
        2 => {
            let (a, b, gamma) = (p[0], p[1], p[2]);
            Some(DMatrix::from_row_slice(
                2,
                2,
                &[a, 0.0, b * gamma.cos(), b * gamma.sin()],
            ))
        }
        3 => {
            let (a, b, c) = (p[0], p[1], p[2]);
            let (alpha, beta, gamma) = (p[3], p[4], p[5]);
            let (u, w) = triclinic_heights(alpha, beta, gamma)?;
            Some(DMatrix::from_row_slice(
                3,
                3,
                &[
                    a,
                    0.0,
                    0.0,
                    b * gamma.cos(),
                    b * gamma.sin(),
                    0.0,
                    c * beta.cos(),
                    c * u,
                    c * w,
                ],
            ))
        }
        _ => None,
    }
}

fn general_bravais_derivative(dimension: usize, p: &[f64], slot: usize) -> Option<DMatrix<f64>> {
    let mut d = DMatrix::zeros(dimension, dimension);
    match dimension {
        1 => d[(0, 0)] = 1.0,
        2 => {
            let (b, gamma) = (p[1], p[2]);
            match slot {
                0 => d[(0, 0)] = 1.0,
                1 => {
                    d[(1, 0)] = gamma.cos();
                    d[(1, 1)] = gamma.sin();
                }
                _ => {
                    d[(1, 0)] = -b * gamma.sin();
                    d[(1, 1)] = b * gamma.cos();
                }
            }
        }
        3 => {
            let (b, c) = (p[1], p[2]);
            let (alpha, beta, gamma) = (p[3], p[4], p[5]);
            let (u, w) = triclinic_heights(alpha, beta, gamma)?;
            let sin_gamma = gamma.sin();
            match slot {
                0 => d[(0, 0)] = 1.0,
                1 => {
                    d[(1, 0)] = gamma.cos();
                    d[(1, 1)] = sin_gamma;
                }
                2 => {
                    d[(2, 0)] = beta.cos();
                    d[(2, 1)] = u;
                    d[(2, 2)] = w;
                }
                3 => {
                    let du = -alpha.sin() / sin_gamma;
                    d[(2, 1)] = c * du;
                    d[(2, 2)] = -c * u * du / w;
                }
                4 => {
                    let du = beta.sin() * gamma.cos() / sin_gamma;
                    d[(2, 0)] = -c * beta.sin();
                    d[(2, 1)] = c * du;
                    d[(2, 2)] = c * (beta.cos() * beta.sin() - u * du) / w;
                }
                _ => {
                    let du = (beta.cos() - alpha.cos() * gamma.cos()) / (sin_gamma * sin_gamma);
                    d[(1, 0)] = -b * sin_gamma;
                    d[(1, 1)] = b * gamma.cos();
                    d[(2, 1)] = c * du;
                    d[(2, 2)] = -c * u * du / w;
                }
            }
        }
        _ => return None,
    }
    Some(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn hexagonal_name_resolves_by_dimension() {
        assert_eq!(Lattice::from_name("hexagonal", 2).unwrap(), Lattice::Hexagonal2D);
        assert_eq!(Lattice::from_name("Hexagonal", 3).unwrap(), Lattice::Hexagonal);
        assert!(Lattice::from_name("cubic", 2).is_err());
    }

    #[test]
    fn parameter_counts_match_crystal_systems() {
        let expected = [
            (Lattice::Lamellar, 1),
            (Lattice::Square, 1),
            (Lattice::Rectangular, 2),
            (Lattice::Rhombic, 2),
            (Lattice::Hexagonal2D, 1),
            (Lattice::Oblique, 3),
            (Lattice::Cubic, 1),
            (Lattice::Tetragonal, 2),
            (Lattice::Orthorhombic, 3),
            (Lattice::Monoclinic, 4),
            (Lattice::Triclinic, 6),
            (Lattice::Rhombohedral, 2),
            (Lattice::Hexagonal, 2),
        ];
        for (lattice, count) in expected {
            assert_eq!(lattice.n_parameters(), count, "{lattice}");
        }
    }

    #[test]
    fn wrong_parameter_count_is_rejected() {
        let err = Lattice::Rectangular.bravais(&[1.0]).unwrap_err();
        assert!(matches!(err, CrystalError::ParameterCount { expected: 2, found: 1, .. }));
    }

    #[test]
    fn cubic_bravais_is_diagonal() {
        let matrix = Lattice::Cubic.bravais(&[2.5]).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 2.5 } else { 0.0 };
                assert_abs_diff_eq!(matrix[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn triclinic_derivatives_match_finite_differences() {
        let params = [1.2, 1.5, 1.9, 1.3, 1.4, 1.7];
        let h = 1.0e-6;
        for k in 0..6 {
            let analytic = Lattice::Triclinic.bravais_derivative(&params, k).unwrap();
            let mut plus = params;
            let mut minus = params;
            plus[k] += h;
            minus[k] -= h;
            let numeric = (Lattice::Triclinic.bravais(&plus).unwrap()
                - Lattice::Triclinic.bravais(&minus).unwrap())
                / (2.0 * h);
            for (a, n) in analytic.iter().zip(numeric.iter()) {
                assert_abs_diff_eq!(a, n, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn collapsed_triclinic_cell_is_degenerate() {
        let err = Lattice::Triclinic
            .bravais(&[1.0, 1.0, 1.0, 0.1, 0.1, 2.0])
            .unwrap_err();
        assert!(matches!(err, CrystalError::DegenerateCell { .. }));
    }
}
