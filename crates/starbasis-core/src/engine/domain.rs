use super::basis::Basis;
use super::config::{BasisConfig, DomainConfig};
use super::error::BasisError;
use super::progress::ProgressReporter;
use crate::core::crystal::{Lattice, SpaceGroup, UnitCell};
use crate::core::mesh::{Mesh, WaveList};
use tracing::{info, instrument};

/// Spatial discretization of one periodic system: mesh, unit cell, space
/// group, wave list and symmetry-adapted basis.
///
/// The basis is rebuilt whenever the lattice system changes and refreshed in
/// place when only the cell parameters do.
#[derive(Debug, Clone)]
pub struct Domain<const D: usize> {
    mesh: Mesh<D>,
    unit_cell: UnitCell<D>,
    group: SpaceGroup<D>,
    wave_list: WaveList<D>,
    basis: Basis<D>,
}

impl<const D: usize> Domain<D> {
    pub fn new(
        mesh: Mesh<D>,
        unit_cell: UnitCell<D>,
        group: SpaceGroup<D>,
        config: BasisConfig,
    ) -> Result<Self, BasisError> {
        Self::with_progress(mesh, unit_cell, group, config, &ProgressReporter::new())
    }

    pub fn with_progress(
        mesh: Mesh<D>,
        unit_cell: UnitCell<D>,
        group: SpaceGroup<D>,
        config: BasisConfig,
        reporter: &ProgressReporter,
    ) -> Result<Self, BasisError> {
        let mut basis = Basis::new(config);
        basis.make_basis_with_progress(&mesh, &unit_cell, &group, reporter)?;
        let wave_list = WaveList::new(&mesh, &unit_cell);
        Ok(Self {
            mesh,
            unit_cell,
            group,
            wave_list,
            basis,
        })
    }

    /// Builds a domain from a textual description.
    ///
    /// The configured dimension must equal `D`.
    #[instrument(skip_all, name = "domain_setup")]
    pub fn from_config(
        config: &DomainConfig,
        reporter: &ProgressReporter,
    ) -> Result<Self, BasisError> {
        if config.dimension != D {
            return Err(BasisError::DegenerateMesh(format!(
                "configuration is {}-dimensional, expected {D}",
                config.dimension
            )));
        }
        let mesh = Mesh::from_slice(&config.mesh)?;
        let lattice = Lattice::from_name(&config.lattice, D)?;
        let unit_cell = UnitCell::new(lattice, &config.parameters)?;
        let group = SpaceGroup::from_name(&config.group)?;
        info!(
            mesh = ?mesh.dimensions(),
            lattice = %lattice,
            group = group.name(),
            order = group.order(),
            "Setting up domain."
        );
        Self::with_progress(mesh, unit_cell, group, config.basis, reporter)
    }

    pub fn mesh(&self) -> &Mesh<D> {
        &self.mesh
    }

    pub fn unit_cell(&self) -> &UnitCell<D> {
        &self.unit_cell
    }

    pub fn group(&self) -> &SpaceGroup<D> {
        &self.group
    }

    pub fn wave_list(&self) -> &WaveList<D> {
        &self.wave_list
    }

    pub fn basis(&self) -> &Basis<D> {
        &self.basis
    }

    pub fn lattice(&self) -> Option<Lattice> {
        self.unit_cell.lattice()
    }

    /// Installs a new unit cell.
    ///
    /// A different lattice system rebuilds the basis; otherwise norms and
    /// metric derivatives are refreshed. On error the domain is unchanged.
    pub fn set_unit_cell(&mut self, unit_cell: UnitCell<D>) -> Result<(), BasisError> {
        if unit_cell.lattice() != self.unit_cell.lattice() {
            let mut basis = Basis::new(*self.basis.config());
            basis.make_basis(&self.mesh, &unit_cell, &self.group)?;
            self.wave_list = WaveList::new(&self.mesh, &unit_cell);
            self.basis = basis;
        } else {
            let mut basis = self.basis.clone();
            basis.update(&unit_cell)?;
            basis.make_dksq(&unit_cell)?;
            self.wave_list.compute_ksq(&unit_cell);
            self.basis = basis;
        }
        self.unit_cell = unit_cell;
        Ok(())
    }

    /// Changes the cell parameters, keeping the lattice system.
    pub fn set_parameters(&mut self, parameters: &[f64]) -> Result<(), BasisError> {
        let mut unit_cell = self.unit_cell.clone();
        unit_cell.set_parameters(parameters)?;
        self.set_unit_cell(unit_cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::DomainConfigBuilder;
    use approx::assert_relative_eq;

    fn hexagonal_config() -> DomainConfig {
        DomainConfigBuilder::new()
            .mesh(vec![12, 12])
            .lattice("hexagonal")
            .parameters(vec![1.5])
            .group("p_6_m_m")
            .build()
            .unwrap()
    }

    #[test]
    fn from_config_builds_basis() {
        let domain = Domain::<2>::from_config(&hexagonal_config(), &ProgressReporter::new()).unwrap();
        assert_eq!(domain.lattice(), Some(Lattice::Hexagonal2D));
        assert_eq!(domain.group().order(), 12);
        assert!(domain.basis().is_initialized());
        assert_eq!(domain.basis().n_wave(), 144);
    }

    #[test]
    fn from_config_checks_dimension() {
        let err = Domain::<3>::from_config(&hexagonal_config(), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, BasisError::DegenerateMesh(_)));
    }

    #[test]
    fn set_parameters_refreshes_norms() {
        let mut domain =
            Domain::<2>::from_config(&hexagonal_config(), &ProgressReporter::new()).unwrap();
        let n_star = domain.basis().n_star();
        let before = domain.basis().waves()[0].sq_norm;
        domain.set_parameters(&[3.0]).unwrap();
        assert_eq!(domain.basis().n_star(), n_star);
        assert_relative_eq!(domain.basis().waves()[0].sq_norm, before / 4.0, epsilon = 1e-9);
        assert_eq!(domain.unit_cell().parameters(), &[3.0]);
    }

    #[test]
    fn lattice_change_rebuilds_basis() {
        let mesh = Mesh::new([8, 8]).unwrap();
        let cell = UnitCell::new(Lattice::Square, &[1.0]).unwrap();
        let group = SpaceGroup::from_name("p 2 m m").unwrap();
        let mut domain = Domain::new(mesh, cell, group, BasisConfig::default()).unwrap();
        let rectangular = UnitCell::new(Lattice::Rectangular, &[1.0, 2.0]).unwrap();
        domain.set_unit_cell(rectangular).unwrap();
        assert_eq!(domain.basis().lattice(), Some(Lattice::Rectangular));
        assert_eq!(domain.basis().dksq_table().len(), 2);
    }

    #[test]
    fn failed_rebuild_leaves_domain_untouched() {
        let mesh = Mesh::new([8, 4]).unwrap();
        let cell = UnitCell::new(Lattice::Rectangular, &[1.0, 2.0]).unwrap();
        let group = SpaceGroup::from_name("p 2 m m").unwrap();
        let mut domain = Domain::new(mesh, cell, group, BasisConfig::default()).unwrap();
        let err = domain.set_parameters(&[1.0]).unwrap_err();
        assert!(matches!(err, BasisError::MetricInconsistency(_)));
        assert_eq!(domain.unit_cell().parameters(), &[1.0, 2.0]);
    }
}
