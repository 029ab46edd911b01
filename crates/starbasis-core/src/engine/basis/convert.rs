use super::tables::ConversionTables;
use super::{Basis, InvertFlag};
use crate::core::field::DftField;
use crate::engine::error::BasisError;
use num_complex::Complex64;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::instrument;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

impl ConversionTables {
    /// Writes the half-complex DFT of the field with the given basis
    /// coefficients. Every slot is overwritten; cancelled stars give zero.
    pub fn components_to_dft(
        &self,
        components: &[f64],
        dft: &mut [Complex64],
    ) -> Result<(), BasisError> {
        self.check_lengths(components.len(), dft.len())?;

        #[cfg(feature = "parallel")]
        let slots = dft.par_iter_mut();
        #[cfg(not(feature = "parallel"))]
        let slots = dft.iter_mut();

        slots
            .enumerate()
            .for_each(|(slot, value)| *value = self.slot_value(slot, components));
        Ok(())
    }

    /// Projects a half-complex DFT onto the basis.
    ///
    /// With `tolerance = Some(tol)`, a closed star whose reduced amplitude has
    /// an imaginary part above `tol * (1 + |z|)` is reported as a symmetry
    /// violation. With `None` the imaginary residual is discarded.
    pub fn dft_to_components(
        &self,
        dft: &[Complex64],
        components: &mut [f64],
        tolerance: Option<f64>,
    ) -> Result<(), BasisError> {
        self.check_lengths(components.len(), dft.len())?;

        #[cfg(feature = "parallel")]
        let values: Vec<Result<f64, BasisError>> = (0..components.len())
            .into_par_iter()
            .map(|basis_id| self.basis_value(basis_id, dft, tolerance))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let values: Vec<Result<f64, BasisError>> = (0..components.len())
            .map(|basis_id| self.basis_value(basis_id, dft, tolerance))
            .collect();

        for (component, value) in components.iter_mut().zip(values) {
            *component = value?;
        }
        Ok(())
    }

    fn check_lengths(&self, n_components: usize, n_dft: usize) -> Result<(), BasisError> {
        if n_components != self.n_basis() {
            return Err(BasisError::LengthMismatch {
                what: "basis components",
                expected: self.n_basis(),
                found: n_components,
            });
        }
        if n_dft != self.dft_size() {
            return Err(BasisError::LengthMismatch {
                what: "DFT coefficients",
                expected: self.dft_size(),
                found: n_dft,
            });
        }
        Ok(())
    }

    fn slot_value(&self, slot: usize, components: &[f64]) -> Complex64 {
        let wave = self.slot_wave[slot];
        let star = self.star_of_wave(wave);
        let Some(basis_id) = self.star_basis(star) else {
            return ZERO;
        };
        let coeff = self.coeff_unchecked(wave);
        match self.invert_flag(star) {
            InvertFlag::Closed => coeff * components[basis_id],
            InvertFlag::First => {
                coeff * Complex64::new(components[basis_id], -components[basis_id + 1])
            }
            InvertFlag::Second => {
                coeff * Complex64::new(components[basis_id - 1], components[basis_id])
            }
        }
    }

    /// Weighted sum `Σ C(G) conj(c(G))` over the explicit waves of a star,
    /// and the weight `Σ |c(G)|²` of those waves.
    fn reduce(&self, star: usize, dft: &[Complex64]) -> (Complex64, f64) {
        self.star_waves(star)
            .filter_map(|wave| self.slot_of(wave).map(|slot| (wave, slot)))
            .fold((ZERO, 0.0), |(sum, weight), (wave, slot)| {
                let coeff = self.coeff_unchecked(wave);
                (sum + dft[slot] * coeff.conj(), weight + coeff.norm_sqr())
            })
    }

    /// Amplitude `u` of a pair with `C = u c` on the first star and
    /// `C = conj(u) c` on the second.
    fn reduce_pair(&self, first: usize, dft: &[Complex64]) -> Complex64 {
        let (sum_first, weight_first) = self.reduce(first, dft);
        let (sum_second, weight_second) = self.reduce(first + 1, dft);
        let weight = weight_first + weight_second;
        if weight > 0.0 {
            (sum_first + sum_second.conj()) / weight
        } else {
            ZERO
        }
    }

    fn basis_value(
        &self,
        basis_id: usize,
        dft: &[Complex64],
        tolerance: Option<f64>,
    ) -> Result<f64, BasisError> {
        let star = self.basis_star[basis_id];
        match self.invert_flag(star) {
            InvertFlag::Closed => {
                let (sum, weight) = self.reduce(star, dft);
                let z = if weight > 0.0 { sum / weight } else { ZERO };
                if let Some(tol) = tolerance {
                    if z.im.abs() > tol * (1.0 + z.norm()) {
                        return Err(BasisError::SymmetryViolation {
                            star,
                            residual: z.im,
                        });
                    }
                }
                Ok(z.re)
            }
            // u = a - ib
            InvertFlag::First => Ok(self.reduce_pair(star, dft).re),
            InvertFlag::Second => Ok(-self.reduce_pair(star - 1, dft).im),
        }
    }
}

impl<const D: usize> Basis<D> {
    /// Synthesizes the half-complex DFT of the field with coefficients
    /// `components` (length `n_basis`).
    #[instrument(level = "trace", skip_all, name = "components_to_dft")]
    pub fn convert_components_to_dft(
        &self,
        components: &[f64],
        dft: &mut DftField<D>,
    ) -> Result<(), BasisError> {
        let tables = self.tables()?;
        self.check_mesh(dft)?;
        tables.components_to_dft(components, dft.as_mut_slice())
    }

    /// Reduces a half-complex DFT to basis coefficients, rejecting input that
    /// breaks the symmetry beyond the configured tolerance.
    #[instrument(level = "trace", skip_all, name = "dft_to_components")]
    pub fn convert_dft_to_components(
        &self,
        dft: &DftField<D>,
        components: &mut [f64],
    ) -> Result<(), BasisError> {
        let tables = self.tables()?;
        self.check_mesh(dft)?;
        tables.dft_to_components(
            dft.as_slice(),
            components,
            Some(self.config().symmetry_tolerance),
        )
    }

    /// Least-squares projection of an arbitrary DFT onto the basis.
    ///
    /// Unlike [`Self::convert_dft_to_components`] this never fails on
    /// asymmetric input; it returns the symmetrized part of the field.
    pub fn project_dft_to_components(
        &self,
        dft: &DftField<D>,
        components: &mut [f64],
    ) -> Result<(), BasisError> {
        let tables = self.tables()?;
        self.check_mesh(dft)?;
        tables.dft_to_components(dft.as_slice(), components, None)
    }

    /// Allocating variant of [`Self::convert_components_to_dft`].
    pub fn components_to_dft(&self, components: &[f64]) -> Result<DftField<D>, BasisError> {
        let mesh = self.mesh().ok_or(BasisError::Uninitialized)?;
        let mut dft = DftField::new(mesh);
        self.convert_components_to_dft(components, &mut dft)?;
        Ok(dft)
    }

    /// Allocating variant of [`Self::convert_dft_to_components`].
    pub fn dft_to_components(&self, dft: &DftField<D>) -> Result<Vec<f64>, BasisError> {
        let mut components = vec![0.0; self.n_basis()];
        self.convert_dft_to_components(dft, &mut components)?;
        Ok(components)
    }

    /// True if `dft` is invariant under the group within `tolerance`,
    /// relative to the largest coefficient.
    ///
    /// Checks that the coefficients of every star follow the basis function
    /// shape and that cancelled stars vanish.
    pub fn has_symmetry(&self, dft: &DftField<D>, tolerance: f64) -> Result<bool, BasisError> {
        let mut components = vec![0.0; self.n_basis()];
        self.project_dft_to_components(dft, &mut components)?;
        let projected = self.components_to_dft(&components)?;
        let scale = dft.max_abs().max(1.0);
        Ok(dft
            .iter()
            .zip(projected.iter())
            .all(|(a, b)| (a - b).norm() <= tolerance * scale))
    }

    fn check_mesh(&self, dft: &DftField<D>) -> Result<(), BasisError> {
        let mesh = self.mesh().ok_or(BasisError::Uninitialized)?;
        if dft.mesh() != mesh {
            return Err(BasisError::DegenerateMesh(format!(
                "field mesh {:?} does not match basis mesh {:?}",
                dft.mesh_dimensions(),
                mesh.dimensions()
            )));
        }
        Ok(())
    }
}
