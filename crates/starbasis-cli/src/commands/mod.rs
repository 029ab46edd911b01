pub mod compare;
pub mod convert;
pub mod groups;
pub mod info;
pub mod tables;

use crate::cli::DomainArgs;
use crate::config::PartialDomainConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use starbasis::engine::config::DomainConfig;
use starbasis::engine::domain::Domain;
use starbasis::engine::progress::ProgressReporter;
use tracing::info;

pub fn resolve_domain_config(args: &DomainArgs) -> Result<DomainConfig> {
    let partial = PartialDomainConfig::load(args)?;
    info!("Merging domain configuration from file and CLI arguments...");
    partial.merge_with_cli(args)
}

pub fn build_domain<const D: usize>(config: &DomainConfig) -> Result<Domain<D>> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    Ok(Domain::from_config(config, &reporter)?)
}

/// Builds the domain at the configured dimension and evaluates `$body` with
/// it bound to `$domain`.
macro_rules! with_domain {
    ($config:expr, |$domain:ident| $body:expr) => {
        match $config.dimension {
            1 => {
                #[allow(unused_mut)]
                let mut $domain = $crate::commands::build_domain::<1>(&$config)?;
                $body
            }
            2 => {
                #[allow(unused_mut)]
                let mut $domain = $crate::commands::build_domain::<2>(&$config)?;
                $body
            }
            3 => {
                #[allow(unused_mut)]
                let mut $domain = $crate::commands::build_domain::<3>(&$config)?;
                $body
            }
            other => Err($crate::error::CliError::Argument(format!(
                "Unsupported dimension: {other}"
            ))),
        }
    };
}

pub(crate) use with_domain;
