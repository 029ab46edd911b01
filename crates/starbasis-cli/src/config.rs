use crate::cli::DomainArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use starbasis::engine::config::{BasisConfig, DomainConfig, DomainConfigBuilder};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialDomainSection {
    dimension: Option<usize>,
    mesh: Option<Vec<usize>>,
    lattice: Option<String>,
    #[serde(rename = "cell-param")]
    cell_parameters: Option<Vec<f64>>,
    group: Option<String>,
}

/// Domain description as read from a TOML file:
///
/// ```toml
/// [domain]
/// mesh = [32, 32, 32]
/// lattice = "cubic"
/// cell-param = [3.6]
/// group = "I_a_-3_d"
///
/// [basis]
/// symmetry-tolerance = 1e-8
/// ```
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialDomainConfig {
    domain: Option<PartialDomainSection>,
    basis: Option<BasisConfig>,
}

impl PartialDomainConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads the file named by `--config`, or starts empty.
    pub fn load(args: &DomainArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies `--set` values, then explicit options, on top of the file.
    pub fn merge_with_cli(mut self, args: &DomainArgs) -> Result<DomainConfig> {
        self.apply_set_values(&args.set_values)?;

        let domain = self.domain.take().unwrap_or_default();
        let basis_config = self.basis.take().unwrap_or_default();

        let require = |value: Option<String>, key: &str| {
            value.ok_or_else(|| {
                CliError::Config(format!(
                    "A value for 'domain.{key}' is required either in the config file or via CLI argument."
                ))
            })
        };

        let mesh = args
            .mesh
            .clone()
            .or(domain.mesh)
            .ok_or_else(|| CliError::Config("`domain.mesh` is required.".to_string()))?;
        let parameters = args
            .cell_parameters
            .clone()
            .or(domain.cell_parameters)
            .ok_or_else(|| CliError::Config("`domain.cell-param` is required.".to_string()))?;

        let mut builder = DomainConfigBuilder::new()
            .mesh(mesh)
            .lattice(require(args.lattice.clone().or(domain.lattice), "lattice")?)
            .parameters(parameters)
            .group(require(args.group.clone().or(domain.group), "group")?)
            .basis(basis_config);
        if let Some(dimension) = domain.dimension {
            builder = builder.dimension(dimension);
        }
        Ok(builder.build()?)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "domain.dimension" => {
                    self.domain.get_or_insert_with(Default::default).dimension =
                        Some(parse_value(key, value_str)?);
                }
                "domain.mesh" => {
                    self.domain.get_or_insert_with(Default::default).mesh = Some(parse_list(key, value_str)?);
                }
                "domain.lattice" => {
                    self.domain.get_or_insert_with(Default::default).lattice = Some(value_str.to_string());
                }
                "domain.cell-param" => {
                    self.domain.get_or_insert_with(Default::default).cell_parameters =
                        Some(parse_list(key, value_str)?);
                }
                "domain.group" => {
                    self.domain.get_or_insert_with(Default::default).group = Some(value_str.to_string());
                }
                "basis.symmetry-tolerance" => {
                    self.basis.get_or_insert_with(Default::default).symmetry_tolerance =
                        parse_value(key, value_str)?;
                }
                "basis.phase-tolerance" => {
                    self.basis.get_or_insert_with(Default::default).phase_tolerance =
                        parse_value(key, value_str)?;
                }
                "basis.norm-tolerance" => {
                    self.basis.get_or_insert_with(Default::default).norm_tolerance =
                        parse_value(key, value_str)?;
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn parse_list<T: FromStr>(key: &str, value: &str) -> Result<Vec<T>> {
    value
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|item| parse_value(key, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const GYROID: &str = r#"
[domain]
mesh = [32, 32, 32]
lattice = "cubic"
cell-param = [3.6]
group = "I_a_-3_d"

[basis]
symmetry-tolerance = 1e-6
"#;

    #[test]
    fn file_values_fill_the_domain_config() {
        let config = PartialDomainConfig::from_toml(GYROID)
            .unwrap()
            .merge_with_cli(&DomainArgs::default())
            .unwrap();
        assert_eq!(config.dimension, 3);
        assert_eq!(config.mesh, vec![32, 32, 32]);
        assert_eq!(config.lattice, "cubic");
        assert_eq!(config.parameters, vec![3.6]);
        assert_eq!(config.group, "I_a_-3_d");
        assert_eq!(config.basis.symmetry_tolerance, 1e-6);
        assert_eq!(config.basis.norm_tolerance, BasisConfig::default().norm_tolerance);
    }

    #[test]
    fn command_line_overrides_file_and_set_values_override_file() {
        let args = DomainArgs {
            cell_parameters: Some(vec![4.0]),
            set_values: vec![
                "domain.mesh=16,16,16".to_string(),
                "basis.phase-tolerance=1e-5".to_string(),
            ],
            ..DomainArgs::default()
        };
        let config = PartialDomainConfig::from_toml(GYROID)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();
        assert_eq!(config.parameters, vec![4.0]);
        assert_eq!(config.mesh, vec![16, 16, 16]);
        assert_eq!(config.basis.phase_tolerance, 1e-5);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PartialDomainConfig::from_toml("[domain]\nshape = 3\n").is_err());
        assert!(PartialDomainConfig::from_toml("[solver]\n").is_err());
    }

    #[test]
    fn missing_group_is_reported() {
        let args = DomainArgs {
            mesh: Some(vec![8, 8]),
            lattice: Some("square".to_string()),
            cell_parameters: Some(vec![1.0]),
            ..DomainArgs::default()
        };
        let err = PartialDomainConfig::default().merge_with_cli(&args).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("domain.group")));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        let mut config = PartialDomainConfig::default();
        assert!(config.apply_set_values(&["domain.mesh".to_string()]).is_err());
        assert!(config.apply_set_values(&["domain.mesh=8,x".to_string()]).is_err());
        assert!(config.apply_set_values(&["solver.iterations=3".to_string()]).is_err());
        config
            .apply_set_values(&["domain.cell-param=[1.0, 2.0]".to_string()])
            .unwrap();
        assert_eq!(
            config.domain.unwrap().cell_parameters,
            Some(vec![1.0, 2.0])
        );
    }

    #[test]
    fn config_file_is_loaded_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("domain.toml");
        fs::write(&path, GYROID).unwrap();
        let args = DomainArgs {
            config: Some(path),
            ..DomainArgs::default()
        };
        let partial = PartialDomainConfig::load(&args).unwrap();
        assert!(partial.domain.is_some());

        let missing = DomainArgs {
            config: Some(PathBuf::from("/nonexistent/domain.toml")),
            ..DomainArgs::default()
        };
        assert!(matches!(
            PartialDomainConfig::load(&missing),
            Err(CliError::Io(_))
        ));
    }
}
