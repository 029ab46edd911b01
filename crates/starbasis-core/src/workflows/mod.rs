//! # Workflows Module
//!
//! File-to-file operations built on a [`crate::engine::domain::Domain`].
//!
//! ## Overview
//!
//! Each workflow reads its inputs through the field file formats of
//! [`crate::io`], applies the basis engine, writes the results and returns a
//! small report. They are the entry points used by the command-line front end.
//!
//! ## Architecture
//!
//! - **Conversion** ([`convert`]) - Symmetry-adapted coefficients to k-grid and back
//! - **Comparison** ([`compare`]) - Difference statistics between two field files
//! - **Description** ([`describe`]) - Basis summaries and star/wave table dumps

pub mod compare;
pub mod convert;
pub mod describe;
