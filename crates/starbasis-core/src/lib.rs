//! # starbasis
//!
//! Symmetry-adapted reciprocal-space basis functions for pseudo-spectral
//! self-consistent field theory (SCFT) of periodic polymer phases.
//!
//! A periodic field sampled on a regular mesh is usually stored as the discrete
//! Fourier transform (DFT) of a real array. When the structure has a known space
//! group, most of those Fourier coefficients are tied together: wavevectors
//! related by a symmetry operation (a *star*) share one amplitude up to a phase,
//! and some stars are forced to vanish altogether. This crate discovers the
//! stars, builds one real basis function per independent degree of freedom, and
//! converts fields between the full DFT and the reduced coefficient array.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: lattice systems and
//!   unit cells, space-group operations and the group database, the mesh and its
//!   wave list, and the half-complex DFT container.
//!
//! - **[`engine`]: The Logic Core.** The [`engine::basis::Basis`] engine (orbit
//!   construction, sign and cancellation bookkeeping, flat conversion tables,
//!   metric updates) and the [`engine::domain::Domain`] that sequences it.
//!
//! - **[`io`]: Field Files.** Readers and writers for symmetry-adapted and k-grid
//!   field files, plus CSV dumps of the star and wave tables.
//!
//! - **[`workflows`]: The Public API.** File-to-file operations used by the CLI.

pub mod core;
pub mod engine;
pub mod io;
pub mod workflows;
