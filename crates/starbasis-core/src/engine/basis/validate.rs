use super::{Basis, InvertFlag};
use crate::engine::error::BasisError;

const COEFF_EPSILON: f64 = 1.0e-8;

impl<const D: usize> Basis<D> {
    /// Checks the internal consistency of the star and wave tables.
    ///
    /// Verifies contiguity of star ranges, wave ordering within stars, a
    /// common `|G|²` per star, non-increasing star norms, basis numbering,
    /// inversion partners, coefficient normalization and the Hermitian
    /// relation `c(-G) = conj(c(G))`.
    ///
    /// Star norms are only required to be non-increasing under the metric
    /// the basis was built with; after [`Basis::update`] the order is kept
    /// but not re-checked.
    pub fn validate(&self) -> Result<(), BasisError> {
        let tables = self.tables()?;
        let fail = |message: String| Err(BasisError::Inconsistent(message));

        let tolerance = self.config.norm_tolerance;
        let mut next_wave = 0;
        let mut next_basis = 0;
        let mut previous_norm = f64::INFINITY;
        for (id, star) in self.stars.iter().enumerate() {
            if star.begin_id != next_wave || star.end_id + 1 - star.begin_id != star.size {
                return fail(format!("star {id} does not continue at wave {next_wave}"));
            }
            next_wave = star.end_id + 1;

            let waves = &self.waves[star.begin_id..=star.end_id];
            if waves.iter().any(|wave| wave.star_id != id) {
                return fail(format!("star {id} contains a wave of another star"));
            }
            if waves
                .windows(2)
                .any(|pair| pair[0].indices_bz <= pair[1].indices_bz)
            {
                return fail(format!("waves of star {id} are not in descending order"));
            }
            if star.wave_bz != self.waves[star.characteristic_id()].indices_bz {
                return fail(format!("star {id} has a stale characteristic wave"));
            }

            let star_norm = self.waves[star.characteristic_id()].sq_norm;
            let width = tolerance * star_norm.abs().max(1.0);
            if let Some(wave) = waves
                .iter()
                .find(|wave| (wave.sq_norm - star_norm).abs() > width)
            {
                return fail(format!(
                    "star {id} mixes |G|² {star_norm:e} and {:e} (wave {:?})",
                    wave.sq_norm, wave.indices_bz
                ));
            }
            if self.build_metric && star_norm > previous_norm + width {
                return fail(format!(
                    "star {id} has |G|² {star_norm:e}, above the preceding {previous_norm:e}"
                ));
            }
            previous_norm = star_norm;

            match (star.cancel, star.basis_id) {
                (true, None) => {}
                (false, Some(basis_id)) if basis_id == next_basis => next_basis += 1,
                _ => return fail(format!("star {id} has an inconsistent basis id")),
            }

            let partner_star = |wave_id: usize| {
                tables
                    .partner(wave_id)
                    .map(|partner| self.waves[partner].star_id)
            };
            let expected_partner = match star.invert_flag {
                InvertFlag::Closed => Some(id),
                InvertFlag::First => Some(id + 1),
                InvertFlag::Second => id.checked_sub(1),
            };
            for wave_id in star.wave_ids() {
                if partner_star(wave_id) != expected_partner {
                    return fail(format!("wave {wave_id} has its inverse outside the partner star"));
                }
                let Some(partner) = tables.partner(wave_id) else {
                    return fail(format!("wave {wave_id} has no inverse"));
                };
                let c = self.waves[wave_id].coeff;
                let c_inverse = self.waves[partner].coeff;
                if (c_inverse - c.conj()).norm() > COEFF_EPSILON {
                    return fail(format!("wave {wave_id} breaks c(-G) = conj(c(G))"));
                }
            }

            let norm: f64 = waves.iter().map(|wave| wave.coeff.norm_sqr()).sum();
            let expected_norm = match (star.cancel, star.invert_flag) {
                (true, _) => 0.0,
                (false, InvertFlag::Closed) => 1.0,
                (false, _) => 0.5,
            };
            if (norm - expected_norm).abs() > COEFF_EPSILON {
                return fail(format!("star {id} has coefficient norm {norm}, expected {expected_norm}"));
            }
        }
        if next_wave != self.waves.len() {
            return fail(format!(
                "stars cover {next_wave} of {} waves",
                self.waves.len()
            ));
        }
        if next_basis != self.n_basis {
            return fail(format!(
                "{next_basis} basis functions numbered, {} recorded",
                self.n_basis
            ));
        }
        for (rank, &wave_id) in self.wave_ids.iter().enumerate() {
            let position = self.mesh.map(|mesh| mesh.position(rank).map(|p| p as i32));
            if position != Some(self.waves[wave_id].indices_dft) {
                return fail(format!("mesh point {rank} maps to the wrong wave"));
            }
        }
        Ok(())
    }
}
