//! # Engine Module
//!
//! The symmetry-adapted basis engine and the domain object that drives it.
//!
//! ## Overview
//!
//! Given a mesh, a unit cell and a space group, the engine partitions every
//! wavevector of the mesh into stars (orbits under the point operations of the
//! group), assigns each star its phase-consistent coefficients, decides which
//! stars cancel, and numbers the surviving real degrees of freedom. The result
//! is frozen into flat conversion tables that map between the reduced
//! coefficient array and the half-complex DFT.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Domain description and numerical tolerances
//! - **Basis** ([`basis`]) - Orbit construction, coefficients, conversions and metric updates
//! - **Domain** ([`domain`]) - Owns mesh, cell, group and basis; sequences rebuilds and updates
//! - **Progress Monitoring** ([`progress`]) - Callback-based reporting for long builds
//! - **Error Handling** ([`error`]) - Basis error taxonomy
//!
//! ## Key Capabilities
//!
//! - **Deterministic ordering** of stars by decreasing `|G|²` and index order within shells
//! - **Real basis functions** for both closed and inversion-paired stars
//! - **Parallel conversions** over the read-only tables (behind the `parallel` feature)
//! - **Metric derivatives** per star for stress and cell optimization

pub mod basis;
pub mod config;
pub mod domain;
pub mod error;
pub mod progress;
