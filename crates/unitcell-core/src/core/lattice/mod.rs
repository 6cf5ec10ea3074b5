//! Lattice parameterization: pure conversions between cell-shape parameters,
//! lattice basis vectors, and simulation-box parameters, plus the tagged
//! lattice-system types that carry per-family defaults.

pub mod geometry;
pub mod systems;
