use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Numerical tolerances used while building and applying a basis.
///
/// Deserializes from kebab-case keys; missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BasisConfig {
    /// Relative bound on the imaginary residual of a closed-star reduction.
    pub symmetry_tolerance: f64,
    /// Tolerance on phase factors (cancellation and the `θ ≈ ±π` decision).
    pub phase_tolerance: f64,
    /// Relative tolerance under which two `|G|²` belong to the same shell.
    pub norm_tolerance: f64,
}

impl Default for BasisConfig {
    fn default() -> Self {
        Self {
            symmetry_tolerance: 1.0e-8,
            phase_tolerance: 1.0e-8,
            norm_tolerance: 1.0e-10,
        }
    }
}

impl BasisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("symmetry_tolerance", self.symmetry_tolerance),
            ("phase_tolerance", self.phase_tolerance),
            ("norm_tolerance", self.norm_tolerance),
        ];
        for (parameter, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    parameter,
                    reason: format!("must be a positive finite number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Everything needed to construct a [`crate::engine::domain::Domain`].
#[derive(Debug, Clone, PartialEq)]
pub struct DomainConfig {
    pub dimension: usize,
    pub mesh: Vec<usize>,
    pub lattice: String,
    pub parameters: Vec<f64>,
    pub group: String,
    pub basis: BasisConfig,
}

#[derive(Default)]
pub struct DomainConfigBuilder {
    dimension: Option<usize>,
    mesh: Option<Vec<usize>>,
    lattice: Option<String>,
    parameters: Option<Vec<f64>>,
    group: Option<String>,
    basis: Option<BasisConfig>,
}

impl DomainConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }
    pub fn mesh(mut self, mesh: Vec<usize>) -> Self {
        self.mesh = Some(mesh);
        self
    }
    pub fn lattice(mut self, lattice: impl Into<String>) -> Self {
        self.lattice = Some(lattice.into());
        self
    }
    pub fn parameters(mut self, parameters: Vec<f64>) -> Self {
        self.parameters = Some(parameters);
        self
    }
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
    pub fn basis(mut self, basis: BasisConfig) -> Self {
        self.basis = Some(basis);
        self
    }

    /// Builds the configuration. The dimension defaults to the mesh rank.
    pub fn build(self) -> Result<DomainConfig, ConfigError> {
        let mesh = self.mesh.ok_or(ConfigError::MissingParameter("mesh"))?;
        let dimension = self.dimension.unwrap_or(mesh.len());
        if !(1..=3).contains(&dimension) {
            return Err(ConfigError::InvalidValue {
                parameter: "dimension",
                reason: format!("expected 1, 2 or 3, got {dimension}"),
            });
        }
        if mesh.len() != dimension {
            return Err(ConfigError::InvalidValue {
                parameter: "mesh",
                reason: format!("expected {dimension} entries, got {}", mesh.len()),
            });
        }
        let basis = self.basis.unwrap_or_default();
        basis.validate()?;
        Ok(DomainConfig {
            dimension,
            mesh,
            lattice: self.lattice.ok_or(ConfigError::MissingParameter("lattice"))?,
            parameters: self
                .parameters
                .ok_or(ConfigError::MissingParameter("parameters"))?,
            group: self.group.ok_or(ConfigError::MissingParameter("group"))?,
            basis,
        })
    }
}
