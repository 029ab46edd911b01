use super::{resolve_domain_config, with_domain};
use crate::cli::DomainArgs;
use crate::error::Result;
use starbasis::workflows::describe::BasisSummary;

pub fn run(args: DomainArgs) -> Result<()> {
    let config = resolve_domain_config(&args)?;
    let summary = with_domain!(config, |domain| Ok(BasisSummary::from_domain(&domain)))?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &BasisSummary) {
    println!("Space group      : {} (order {})", summary.group, summary.group_order);
    println!("Mesh             : {:?}", summary.mesh);
    println!("Waves            : {}", summary.n_wave);
    println!("Stars            : {}", summary.n_star);
    println!("  closed         : {}", summary.n_closed);
    println!("  in pairs       : {}", summary.n_paired);
    println!("  cancelled      : {}", summary.n_cancelled);
    println!("Basis functions  : {}", summary.n_basis);
}
