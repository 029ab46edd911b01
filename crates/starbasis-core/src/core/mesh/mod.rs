//! The computational mesh and its reciprocal-space wave list.

mod grid;
mod wave_list;

pub use grid::{Mesh, MeshError};
pub use wave_list::{WaveList, shift_to_minimum};
