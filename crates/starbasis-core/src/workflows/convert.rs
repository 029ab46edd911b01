use crate::core::field::DftField;
use crate::engine::domain::Domain;
use crate::engine::error::BasisError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::io::{BasisFile, FieldFile, FieldIoError, KGridFile};
use std::path::Path;
use tracing::{info, instrument, warn};

/// How a k-grid field that breaks the space-group symmetry is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymmetryMode {
    /// Fail with a symmetry violation.
    #[default]
    Strict,
    /// Keep the symmetric part of the field and warn.
    Project,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub n_monomer: usize,
    pub n_basis: usize,
    pub dft_size: usize,
    /// False if any input field had to be projected onto the symmetric subspace.
    pub symmetric: bool,
}

#[instrument(skip_all, name = "basis_to_kgrid_workflow")]
pub fn basis_to_kgrid<const D: usize>(
    domain: &mut Domain<D>,
    input: &Path,
    output: &Path,
    reporter: &ProgressReporter,
) -> Result<ConversionReport, FieldIoError> {
    let (header, components) =
        reporter.phase("Reading basis field", || BasisFile::read_from_path(input, domain))?;
    let domain: &Domain<D> = domain;

    reporter.report(Progress::PhaseStart {
        name: "Synthesizing DFT",
    });
    reporter.report(Progress::TaskStart {
        total_steps: components.len() as u64,
    });
    let basis = domain.basis();
    let fields = components
        .iter()
        .map(|field| {
            let dft = basis.components_to_dft(field);
            reporter.report(Progress::TaskAdvance { steps: 1 });
            dft
        })
        .collect::<Result<Vec<DftField<D>>, BasisError>>()?;
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    reporter.phase("Writing k-grid field", || {
        KGridFile::write_to_path(domain, &fields, output)
    })?;

    let report = ConversionReport {
        n_monomer: header.n_monomer,
        n_basis: basis.n_basis(),
        dft_size: domain.mesh().dft_size(),
        symmetric: true,
    };
    info!(
        n_monomer = report.n_monomer,
        output = %output.display(),
        "Converted basis field to k-grid."
    );
    Ok(report)
}

#[instrument(skip_all, name = "kgrid_to_basis_workflow")]
pub fn kgrid_to_basis<const D: usize>(
    domain: &mut Domain<D>,
    input: &Path,
    output: &Path,
    mode: SymmetryMode,
    reporter: &ProgressReporter,
) -> Result<ConversionReport, FieldIoError> {
    let (header, fields) =
        reporter.phase("Reading k-grid field", || KGridFile::read_from_path(input, domain))?;
    let domain: &Domain<D> = domain;

    reporter.report(Progress::PhaseStart {
        name: "Reducing to basis",
    });
    reporter.report(Progress::TaskStart {
        total_steps: fields.len() as u64,
    });
    let basis = domain.basis();
    let tolerance = basis.config().symmetry_tolerance;
    let mut symmetric = true;
    let mut components = Vec::with_capacity(fields.len());
    for (monomer, field) in fields.iter().enumerate() {
        let mut values = vec![0.0; basis.n_basis()];
        match mode {
            SymmetryMode::Strict => basis.convert_dft_to_components(field, &mut values)?,
            SymmetryMode::Project => {
                if !basis.has_symmetry(field, tolerance)? {
                    warn!(monomer, "Field breaks the space-group symmetry; projecting.");
                    symmetric = false;
                }
                basis.project_dft_to_components(field, &mut values)?;
            }
        }
        components.push(values);
        reporter.report(Progress::TaskAdvance { steps: 1 });
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    reporter.phase("Writing basis field", || {
        BasisFile::write_to_path(domain, &components, output)
    })?;

    let report = ConversionReport {
        n_monomer: header.n_monomer,
        n_basis: basis.n_basis(),
        dft_size: domain.mesh().dft_size(),
        symmetric,
    };
    info!(
        n_monomer = report.n_monomer,
        symmetric,
        output = %output.display(),
        "Converted k-grid field to basis."
    );
    Ok(report)
}
