use super::{InvertFlag, Star, Wave};
use crate::core::mesh::Mesh;
use num_complex::Complex64;

/// Flat, read-only lookup arrays for field conversions.
///
/// Built once per basis and shared behind an `Arc`; every conversion reads
/// from it without locking.
#[derive(Debug, Clone)]
pub struct ConversionTables {
    /// Wave id stored at each half-complex DFT slot.
    pub(super) slot_wave: Vec<usize>,
    /// DFT slot of each wave, `None` for implicit waves.
    pub(super) wave_slot: Vec<Option<usize>>,
    /// Wave id of `-G` for each wave.
    pub(super) partner: Vec<usize>,
    pub(super) coeff: Vec<Complex64>,
    pub(super) star_of_wave: Vec<usize>,
    pub(super) star_begin: Vec<usize>,
    /// One past the last wave id of each star.
    pub(super) star_end: Vec<usize>,
    pub(super) invert_flag: Vec<InvertFlag>,
    pub(super) star_basis: Vec<Option<usize>>,
    pub(super) basis_star: Vec<usize>,
}

impl ConversionTables {
    pub(super) fn build<const D: usize>(
        mesh: &Mesh<D>,
        waves: &[Wave<D>],
        stars: &[Star<D>],
        wave_ids: &[usize],
    ) -> Self {
        let mut slot_wave = vec![0; mesh.dft_size()];
        let mut wave_slot = vec![None; waves.len()];
        let mut partner = Vec::with_capacity(waves.len());
        for (id, wave) in waves.iter().enumerate() {
            let position = mesh.wrap(&wave.indices_dft);
            if let Some(slot) = mesh.dft_rank(&position) {
                slot_wave[slot] = id;
                wave_slot[id] = Some(slot);
            }
            partner.push(wave_ids[mesh.wrapped_rank(&wave.indices_dft.map(|g| -g))]);
        }
        let mut basis_star = Vec::new();
        for (id, star) in stars.iter().enumerate() {
            if star.basis_id.is_some() {
                basis_star.push(id);
            }
        }
        Self {
            slot_wave,
            wave_slot,
            partner,
            coeff: waves.iter().map(|wave| wave.coeff).collect(),
            star_of_wave: waves.iter().map(|wave| wave.star_id).collect(),
            star_begin: stars.iter().map(|star| star.begin_id).collect(),
            star_end: stars.iter().map(|star| star.end_id + 1).collect(),
            invert_flag: stars.iter().map(|star| star.invert_flag).collect(),
            star_basis: stars.iter().map(|star| star.basis_id).collect(),
            basis_star,
        }
    }

    pub fn n_wave(&self) -> usize {
        self.coeff.len()
    }

    pub fn n_star(&self) -> usize {
        self.star_begin.len()
    }

    pub fn n_basis(&self) -> usize {
        self.basis_star.len()
    }

    pub fn dft_size(&self) -> usize {
        self.slot_wave.len()
    }

    pub fn slot_wave(&self, slot: usize) -> Option<usize> {
        self.slot_wave.get(slot).copied()
    }

    pub fn wave_slot(&self, wave: usize) -> Option<usize> {
        self.wave_slot.get(wave).copied().flatten()
    }

    pub fn partner(&self, wave: usize) -> Option<usize> {
        self.partner.get(wave).copied()
    }

    pub fn coeff(&self, wave: usize) -> Option<Complex64> {
        self.coeff.get(wave).copied()
    }

    pub fn basis_star(&self, basis_id: usize) -> Option<usize> {
        self.basis_star.get(basis_id).copied()
    }

    pub(super) fn star_of_wave(&self, wave: usize) -> usize {
        self.star_of_wave[wave]
    }

    pub(super) fn star_waves(&self, star: usize) -> std::ops::Range<usize> {
        self.star_begin[star]..self.star_end[star]
    }

    pub(super) fn invert_flag(&self, star: usize) -> InvertFlag {
        self.invert_flag[star]
    }

    pub(super) fn star_basis(&self, star: usize) -> Option<usize> {
        self.star_basis[star]
    }

    pub(super) fn coeff_unchecked(&self, wave: usize) -> Complex64 {
        self.coeff[wave]
    }

    pub(super) fn slot_of(&self, wave: usize) -> Option<usize> {
        self.wave_slot[wave]
    }
}
