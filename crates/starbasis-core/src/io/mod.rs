//! # I/O Module
//!
//! Reading and writing periodic fields and basis tables.
//!
//! - **Field files** ([`basis_file`], [`kgrid_file`]) share a keyword header
//!   ([`header`]) describing dimension, crystal system, cell parameters, group
//!   and number of monomer species, followed by either symmetry-adapted
//!   coefficients or the half-complex DFT.
//! - **Tables** ([`tables`]) dump the star and wave lists as CSV for inspection.
//!
//! Readers apply the cell parameters found in the header to the domain, which
//! refreshes (or, for a new lattice system, rebuilds) its basis. The domain is
//! only changed once the whole file has been read successfully.

pub mod basis_file;
pub mod error;
pub mod header;
pub mod kgrid_file;
mod lines;
pub mod tables;
pub mod traits;

pub use basis_file::BasisFile;
pub use error::{FieldIoError, ParseErrorKind};
pub use header::FieldHeader;
pub use kgrid_file::KGridFile;
pub use traits::FieldFile;
