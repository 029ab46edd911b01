use super::{resolve_domain_config, with_domain};
use crate::cli::{ConvertArgs, FieldFormat};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use starbasis::engine::domain::Domain;
use starbasis::engine::progress::ProgressReporter;
use starbasis::workflows::convert::{SymmetryMode, basis_to_kgrid, kgrid_to_basis};
use tracing::{info, warn};

pub fn run(args: ConvertArgs) -> Result<()> {
    let config = resolve_domain_config(&args.domain)?;
    with_domain!(config, |domain| convert(&mut domain, &args))
}

fn convert<const D: usize>(domain: &mut Domain<D>, args: &ConvertArgs) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Loading input field from {:?}", &args.input);
    let report = match args.to {
        FieldFormat::Kgrid => {
            if args.project {
                warn!("--project only applies to k-grid input and is ignored.");
            }
            basis_to_kgrid(domain, &args.input, &args.output, &reporter)?
        }
        FieldFormat::Basis => {
            let mode = if args.project {
                SymmetryMode::Project
            } else {
                SymmetryMode::Strict
            };
            kgrid_to_basis(domain, &args.input, &args.output, mode, &reporter)?
        }
    };

    if !report.symmetric {
        println!("Warning: input broke the space-group symmetry and was projected.");
    }
    println!(
        "✓ {} field(s) with {} basis functions written to: {}",
        report.n_monomer,
        report.n_basis,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DomainArgs;
    use starbasis::engine::config::DomainConfigBuilder;
    use starbasis::io::{BasisFile, FieldFile};
    use tempfile::tempdir;

    #[test]
    fn basis_file_converts_to_kgrid_and_back() {
        let dir = tempdir().unwrap();
        let basis_path = dir.path().join("w.bf");
        let kgrid_path = dir.path().join("w.kf");
        let back_path = dir.path().join("back.bf");

        let config = DomainConfigBuilder::new()
            .mesh(vec![12, 12])
            .lattice("hexagonal")
            .parameters(vec![1.7])
            .group("p_6_m_m")
            .build()
            .unwrap();
        let domain = Domain::<2>::from_config(&config, &ProgressReporter::new()).unwrap();
        let fields: Vec<Vec<f64>> =
            vec![(0..domain.basis().n_basis()).map(|i| 1.0 / (1.0 + i as f64)).collect()];
        BasisFile::write_to_path(&domain, &fields, &basis_path).unwrap();

        let domain_args = DomainArgs {
            mesh: Some(vec![12, 12]),
            lattice: Some("hexagonal".to_string()),
            cell_parameters: Some(vec![1.7]),
            group: Some("p 6 m m".to_string()),
            ..DomainArgs::default()
        };
        run(ConvertArgs {
            domain: domain_args.clone(),
            input: basis_path,
            output: kgrid_path.clone(),
            to: FieldFormat::Kgrid,
            project: false,
        })
        .unwrap();
        run(ConvertArgs {
            domain: domain_args,
            input: kgrid_path,
            output: back_path.clone(),
            to: FieldFormat::Basis,
            project: false,
        })
        .unwrap();

        let mut domain = domain;
        let (_, back) = BasisFile::read_from_path(&back_path, &mut domain).unwrap();
        for (a, b) in fields[0].iter().zip(back[0].iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }
}
