//! # Core Module
//!
//! Stateless building blocks shared by the basis engine and the field I/O layer.
//!
//! - **Crystallography** ([`crystal`]) - lattice systems, unit cells and their
//!   reciprocal metric, space-group operations and the group database
//! - **Discretization** ([`mesh`]) - the computational mesh, its half-complex DFT
//!   layout and the minimum-image wave list
//! - **Fields** ([`field`]) - the DFT container and field comparison utilities

pub mod crystal;
pub mod field;
pub mod mesh;

/// Integer indices of a wavevector (or grid point) in `D` dimensions.
pub type IntVec<const D: usize> = [i32; D];
