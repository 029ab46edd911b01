use crate::core::field::FieldComparison;
use crate::engine::domain::Domain;
use crate::io::{BasisFile, FieldFile, FieldIoError, KGridFile};
use std::path::Path;
use tracing::{info, instrument};

/// Compares two symmetry-adapted field files coefficient by coefficient.
///
/// Both files are read into the same domain, so the second file's cell
/// parameters are the ones left applied.
#[instrument(skip_all, name = "compare_basis_workflow")]
pub fn compare_basis_files<const D: usize>(
    domain: &mut Domain<D>,
    left: &Path,
    right: &Path,
) -> Result<FieldComparison, FieldIoError> {
    let (_, left_fields) = BasisFile::read_from_path(left, domain)?;
    let (_, right_fields) = BasisFile::read_from_path(right, domain)?;
    let comparison = FieldComparison::compare_components(&left_fields, &right_fields)?;
    info!(
        max = comparison.max_diff,
        rms = comparison.rms_diff,
        "Compared basis fields."
    );
    Ok(comparison)
}

#[instrument(skip_all, name = "compare_kgrid_workflow")]
pub fn compare_kgrid_files<const D: usize>(
    domain: &mut Domain<D>,
    left: &Path,
    right: &Path,
) -> Result<FieldComparison, FieldIoError> {
    let (_, left_fields) = KGridFile::read_from_path(left, domain)?;
    let (_, right_fields) = KGridFile::read_from_path(right, domain)?;
    let comparison = FieldComparison::compare_dft(&left_fields, &right_fields)?;
    info!(
        max = comparison.max_diff,
        rms = comparison.rms_diff,
        "Compared k-grid fields."
    );
    Ok(comparison)
}
