use crate::engine::basis::InvertFlag;
use crate::engine::domain::Domain;
use crate::io::FieldIoError;
use crate::io::tables::{write_star_table, write_wave_table};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Counts describing a constructed basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisSummary {
    pub group: String,
    pub group_order: usize,
    pub mesh: Vec<usize>,
    pub n_wave: usize,
    pub n_star: usize,
    pub n_basis: usize,
    pub n_cancelled: usize,
    pub n_closed: usize,
    /// Number of stars belonging to inversion pairs (twice the number of pairs).
    pub n_paired: usize,
}

impl BasisSummary {
    pub fn from_domain<const D: usize>(domain: &Domain<D>) -> Self {
        let basis = domain.basis();
        let stars = basis.stars();
        Self {
            group: domain.group().name().to_string(),
            group_order: domain.group().order(),
            mesh: domain.mesh().dimensions().to_vec(),
            n_wave: basis.n_wave(),
            n_star: basis.n_star(),
            n_basis: basis.n_basis(),
            n_cancelled: stars.iter().filter(|s| s.cancel).count(),
            n_closed: stars
                .iter()
                .filter(|s| s.invert_flag == InvertFlag::Closed)
                .count(),
            n_paired: stars
                .iter()
                .filter(|s| s.invert_flag != InvertFlag::Closed)
                .count(),
        }
    }
}

pub fn write_star_table_to_path<const D: usize>(
    domain: &Domain<D>,
    path: &Path,
) -> Result<(), FieldIoError> {
    write_star_table(domain.basis(), BufWriter::new(File::create(path)?))
}

pub fn write_wave_table_to_path<const D: usize>(
    domain: &Domain<D>,
    path: &Path,
) -> Result<(), FieldIoError> {
    write_wave_table(domain.basis(), BufWriter::new(File::create(path)?))
}
