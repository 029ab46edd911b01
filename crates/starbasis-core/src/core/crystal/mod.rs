//! Lattice systems, unit cells and space groups.

mod error;
mod groups;
mod lattice;
mod space_group;
mod symmetry;
mod unit_cell;

pub use error::CrystalError;
pub use groups::{group_names, normalize_group_name};
pub use lattice::Lattice;
pub use space_group::SpaceGroup;
pub use symmetry::SpaceSymmetry;
pub use unit_cell::UnitCell;
