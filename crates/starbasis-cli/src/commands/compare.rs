use super::{resolve_domain_config, with_domain};
use crate::cli::{CompareArgs, FieldFormat};
use crate::error::{CliError, Result};
use starbasis::core::field::FieldComparison;
use starbasis::engine::domain::Domain;
use starbasis::workflows::compare::{compare_basis_files, compare_kgrid_files};
use tracing::info;

pub fn run(args: CompareArgs) -> Result<()> {
    let config = resolve_domain_config(&args.domain)?;
    let comparison = with_domain!(config, |domain| compare(&mut domain, &args))?;

    println!("Compared {} values", comparison.count);
    println!("  max |difference| : {:.6e}", comparison.max_diff);
    println!("  rms difference   : {:.6e}", comparison.rms_diff);

    check_tolerance(&comparison, args.tolerance)
}

fn compare<const D: usize>(domain: &mut Domain<D>, args: &CompareArgs) -> Result<FieldComparison> {
    info!("Comparing {:?} with {:?}", &args.left, &args.right);
    let comparison = match args.format {
        FieldFormat::Basis => compare_basis_files(domain, &args.left, &args.right)?,
        FieldFormat::Kgrid => compare_kgrid_files(domain, &args.left, &args.right)?,
    };
    Ok(comparison)
}

fn check_tolerance(comparison: &FieldComparison, tolerance: Option<f64>) -> Result<()> {
    match tolerance {
        Some(tolerance) if comparison.max_diff > tolerance => Err(CliError::FieldsDiffer {
            max_diff: comparison.max_diff,
            tolerance,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_enforced_only_when_given() {
        let comparison = FieldComparison {
            max_diff: 1e-3,
            rms_diff: 1e-4,
            count: 10,
        };
        assert!(check_tolerance(&comparison, None).is_ok());
        assert!(check_tolerance(&comparison, Some(1e-2)).is_ok());
        assert!(matches!(
            check_tolerance(&comparison, Some(1e-6)),
            Err(CliError::FieldsDiffer { .. })
        ));
    }
}
