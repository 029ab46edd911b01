//! # Basis Module
//!
//! The symmetry-adapted reciprocal-space basis of a periodic structure.
//!
//! ## Overview
//!
//! Every wavevector of the mesh (a *wave*) belongs to exactly one *star*: the
//! orbit of a representative under the point operations of the space group.
//! Within a star, the Fourier coefficients of an invariant field are fixed up to
//! one complex amplitude by the phase relation `c(G R) = c(G) exp(2πi G·t)`.
//! Stars whose phases are inconsistent *cancel* (their amplitude must be zero).
//!
//! A star is *closed* if it contains `-G` for its waves, and otherwise forms a
//! *pair* with its inverse star. A closed star contributes one real degree of
//! freedom; a pair contributes two (a cosine-like and a sine-like function).
//! Non-cancelled stars are numbered consecutively; that number is their
//! *basis id*, the index into the reduced coefficient array.
//!
//! ## Ordering
//!
//! Stars are sorted by decreasing `|G|²`. Stars whose norms agree within the
//! configured tolerance form a shell and are ordered by their characteristic
//! wave, lexicographically descending. Waves within a star are likewise in
//! descending index order, and the two stars of a pair are adjacent with the
//! `+1` star first.
//!
//! ## Concurrency
//!
//! After construction the basis is immutable apart from the metric refresh in
//! [`Basis::update`]. Conversions only read a shared [`ConversionTables`]
//! snapshot and may run on any number of threads.

mod coefficients;
mod convert;
mod metric;
mod orbits;
mod tables;
mod validate;

pub use tables::ConversionTables;

use super::config::BasisConfig;
use super::error::BasisError;
use super::progress::ProgressReporter;
use crate::core::IntVec;
use crate::core::crystal::{Lattice, SpaceGroup, UnitCell};
use crate::core::mesh::{Mesh, WaveList};
use num_complex::Complex64;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{info, instrument};

/// Relation between a star and its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvertFlag {
    /// The star contains the inverse of each of its waves.
    Closed,
    /// First star of an inversion pair (cosine-like).
    First,
    /// Second star of an inversion pair (sine-like).
    Second,
}

impl InvertFlag {
    pub fn value(self) -> i32 {
        match self {
            InvertFlag::Closed => 0,
            InvertFlag::First => 1,
            InvertFlag::Second => -1,
        }
    }
}

impl fmt::Display for InvertFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Parity of the real basis function under inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignFlag {
    Even,
    Odd,
}

impl SignFlag {
    pub fn value(self) -> i32 {
        match self {
            SignFlag::Even => 1,
            SignFlag::Odd => -1,
        }
    }
}

impl fmt::Display for SignFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// One wavevector of the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave<const D: usize> {
    /// Coefficient of this wave in its star's basis function.
    pub coeff: Complex64,
    /// `|G|²` at the current cell parameters.
    pub sq_norm: f64,
    /// Indices on the mesh, `0 <= G_i < N_i`.
    pub indices_dft: IntVec<D>,
    /// Minimum-image indices.
    pub indices_bz: IntVec<D>,
    pub star_id: usize,
    /// True if the coefficient is not stored in the half-complex DFT.
    pub implicit: bool,
}

/// A symmetry orbit of waves, stored as a contiguous range of wave ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Star<const D: usize> {
    pub size: usize,
    pub begin_id: usize,
    /// Last wave id of the star (inclusive).
    pub end_id: usize,
    pub invert_flag: InvertFlag,
    pub sign_flag: SignFlag,
    /// Minimum-image indices of the characteristic wave.
    pub wave_bz: IntVec<D>,
    pub cancel: bool,
    /// Index into the reduced coefficient array, `None` for cancelled stars.
    pub basis_id: Option<usize>,
}

impl<const D: usize> Star<D> {
    pub fn wave_ids(&self) -> RangeInclusive<usize> {
        self.begin_id..=self.end_id
    }

    /// The first wave for closed and `+1` stars, the last one for `-1` stars.
    pub fn characteristic_id(&self) -> usize {
        match self.invert_flag {
            InvertFlag::Second => self.end_id,
            _ => self.begin_id,
        }
    }
}

/// Symmetry-adapted basis for fields on one mesh, cell and space group.
#[derive(Debug, Clone)]
pub struct Basis<const D: usize> {
    config: BasisConfig,
    mesh: Option<Mesh<D>>,
    lattice: Option<Lattice>,
    group_name: String,
    waves: Vec<Wave<D>>,
    stars: Vec<Star<D>>,
    wave_ids: Vec<usize>,
    n_basis: usize,
    /// True while `sq_norm` still holds the metric the stars were ordered by.
    build_metric: bool,
    dksq: Vec<Vec<f64>>,
    tables: Option<Arc<ConversionTables>>,
}

impl<const D: usize> Default for Basis<D> {
    fn default() -> Self {
        Self::new(BasisConfig::default())
    }
}

impl<const D: usize> Basis<D> {
    pub fn new(config: BasisConfig) -> Self {
        Self {
            config,
            mesh: None,
            lattice: None,
            group_name: String::new(),
            waves: Vec::new(),
            stars: Vec::new(),
            wave_ids: Vec::new(),
            n_basis: 0,
            build_metric: false,
            dksq: Vec::new(),
            tables: None,
        }
    }

    /// Convenience constructor: a new basis built with `config`.
    pub fn build(
        mesh: &Mesh<D>,
        unit_cell: &UnitCell<D>,
        group: &SpaceGroup<D>,
        config: BasisConfig,
    ) -> Result<Self, BasisError> {
        let mut basis = Self::new(config);
        basis.make_basis(mesh, unit_cell, group)?;
        Ok(basis)
    }

    pub fn make_basis(
        &mut self,
        mesh: &Mesh<D>,
        unit_cell: &UnitCell<D>,
        group: &SpaceGroup<D>,
    ) -> Result<(), BasisError> {
        self.make_basis_with_progress(mesh, unit_cell, group, &ProgressReporter::new())
    }

    /// Builds the basis for a group given by name.
    pub fn make_basis_from_name(
        &mut self,
        mesh: &Mesh<D>,
        unit_cell: &UnitCell<D>,
        group_name: &str,
    ) -> Result<(), BasisError> {
        let group = SpaceGroup::from_name(group_name)?;
        self.make_basis(mesh, unit_cell, &group)
    }

    /// Constructs waves, stars and conversion tables.
    ///
    /// Fails without modifying `self` if the cell is unset or inconsistent,
    /// if the mesh is not invariant under the group, or if a group operation
    /// changes `|G|²` under the cell's metric.
    #[instrument(skip_all, name = "make_basis", fields(group = group.name(), mesh = ?mesh.dimensions()))]
    pub fn make_basis_with_progress(
        &mut self,
        mesh: &Mesh<D>,
        unit_cell: &UnitCell<D>,
        group: &SpaceGroup<D>,
        reporter: &ProgressReporter,
    ) -> Result<(), BasisError> {
        if mesh.size() == 0 {
            return Err(BasisError::DegenerateMesh(format!(
                "mesh {:?} has no points",
                mesh.dimensions()
            )));
        }
        let lattice = unit_cell.lattice().ok_or_else(|| {
            BasisError::MetricInconsistency("unit cell lattice is not set".to_string())
        })?;
        if unit_cell.n_parameters() != lattice.n_parameters() {
            return Err(BasisError::MetricInconsistency(format!(
                "lattice '{lattice}' expects {} parameter(s), the cell has {}",
                lattice.n_parameters(),
                unit_cell.n_parameters()
            )));
        }
        if let Some(symmetry) = group.incompatible_symmetry(mesh.dimensions()) {
            return Err(BasisError::IncompatibleMesh {
                dimensions: mesh.dimensions().to_vec(),
                symmetry: symmetry.to_string(),
            });
        }

        let list = reporter.phase("Wave list", || WaveList::new(mesh, unit_cell));
        let layout = reporter.phase("Star construction", || {
            orbits::build_layout(&list, group, &self.config, reporter)
        })?;
        let tables = ConversionTables::build(mesh, &layout.waves, &layout.stars, &layout.wave_ids);

        self.mesh = Some(*mesh);
        self.lattice = Some(lattice);
        self.group_name = group.name().to_string();
        self.waves = layout.waves;
        self.stars = layout.stars;
        self.wave_ids = layout.wave_ids;
        self.n_basis = layout.n_basis;
        self.build_metric = true;
        self.tables = Some(Arc::new(tables));
        self.dksq = metric::star_dksq(&self.waves, &self.stars, unit_cell);

        info!(
            n_wave = self.waves.len(),
            n_star = self.stars.len(),
            n_basis = self.n_basis,
            "Constructed symmetry-adapted basis."
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.tables.is_some()
    }

    pub fn config(&self) -> &BasisConfig {
        &self.config
    }

    pub fn n_wave(&self) -> usize {
        self.waves.len()
    }

    pub fn n_star(&self) -> usize {
        self.stars.len()
    }

    pub fn n_basis(&self) -> usize {
        self.n_basis
    }

    pub fn mesh(&self) -> Option<&Mesh<D>> {
        self.mesh.as_ref()
    }

    pub fn lattice(&self) -> Option<Lattice> {
        self.lattice
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn waves(&self) -> &[Wave<D>] {
        &self.waves
    }

    pub fn stars(&self) -> &[Star<D>] {
        &self.stars
    }

    pub fn wave(&self, id: usize) -> Result<&Wave<D>, BasisError> {
        self.waves.get(id).ok_or(BasisError::IndexOutOfRange {
            kind: "wave",
            index: id,
            len: self.waves.len(),
        })
    }

    pub fn star(&self, id: usize) -> Result<&Star<D>, BasisError> {
        self.stars.get(id).ok_or(BasisError::IndexOutOfRange {
            kind: "star",
            index: id,
            len: self.stars.len(),
        })
    }

    /// Wave id of arbitrary integer indices, reduced modulo the mesh.
    pub fn wave_id(&self, indices: &IntVec<D>) -> Result<usize, BasisError> {
        let mesh = self.mesh.as_ref().ok_or(BasisError::Uninitialized)?;
        Ok(self.wave_ids[mesh.wrapped_rank(indices)])
    }

    pub fn wave_by_indices(&self, indices: &IntVec<D>) -> Result<&Wave<D>, BasisError> {
        self.wave(self.wave_id(indices)?)
    }

    /// Star holding basis function `basis_id`.
    pub fn star_of_basis(&self, basis_id: usize) -> Result<&Star<D>, BasisError> {
        let tables = self.tables()?;
        let star_id = tables.basis_star(basis_id).ok_or(BasisError::IndexOutOfRange {
            kind: "basis",
            index: basis_id,
            len: self.n_basis,
        })?;
        self.star(star_id)
    }

    /// Shared handle to the read-only conversion tables.
    pub fn tables(&self) -> Result<Arc<ConversionTables>, BasisError> {
        self.tables.clone().ok_or(BasisError::Uninitialized)
    }
}

#[cfg(test)]
mod tests;
