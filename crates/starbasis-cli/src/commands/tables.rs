use super::{resolve_domain_config, with_domain};
use crate::cli::TableArgs;
use crate::error::Result;
use starbasis::engine::domain::Domain;
use starbasis::io::tables::{write_star_table, write_wave_table};
use starbasis::workflows::describe::{write_star_table_to_path, write_wave_table_to_path};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Stars,
    Waves,
}

pub fn run(args: TableArgs, kind: TableKind) -> Result<()> {
    let config = resolve_domain_config(&args.domain)?;
    with_domain!(config, |domain| write_table(&domain, kind, args.output.as_deref()))
}

fn write_table<const D: usize>(
    domain: &Domain<D>,
    kind: TableKind,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing {:?} table to {:?}", kind, path);
            match kind {
                TableKind::Stars => write_star_table_to_path(domain, path)?,
                TableKind::Waves => write_wave_table_to_path(domain, path)?,
            }
            println!("✓ Table written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout().lock();
            match kind {
                TableKind::Stars => write_star_table(domain.basis(), stdout)?,
                TableKind::Waves => write_wave_table(domain.basis(), stdout)?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DomainArgs;
    use tempfile::tempdir;

    fn lamellar_args() -> DomainArgs {
        DomainArgs {
            mesh: Some(vec![8]),
            lattice: Some("lamellar".to_string()),
            cell_parameters: Some(vec![2.0]),
            group: Some("-1".to_string()),
            ..DomainArgs::default()
        }
    }

    #[test]
    fn wave_table_lists_every_mesh_point() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("waves.csv");
        let args = TableArgs {
            domain: lamellar_args(),
            output: Some(path.clone()),
        };
        run(args, TableKind::Waves).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("wave,star,implicit"));
        assert_eq!(lines.count(), 8);
    }

    #[test]
    fn star_table_for_centrosymmetric_lamellae() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stars.csv");
        let args = TableArgs {
            domain: lamellar_args(),
            output: Some(path.clone()),
        };
        run(args, TableKind::Stars).unwrap();

        // Stars {4}, {±3}, {±2}, {±1}, {0}; 4 and -4 coincide on the mesh.
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1 + 5);
    }
}
