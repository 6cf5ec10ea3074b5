//! # Core Module
//!
//! Foundation layer: stateless crystallographic building blocks.
//!
//! - **Lattice parameterization** ([`lattice`]) - cell parameters to lattice
//!   vectors, box-parameter conversions, and the seven 3D / four 2D lattice
//!   systems with their free-parameter sets
//! - **Symmetry tables** ([`symmetry`]) - read-only operator tables for the
//!   230 space groups, 17 plane groups, and 32 point groups
//! - **Wyckoff templates** ([`wyckoff`]) - per-space-group site-coordinate
//!   templates, precompiled into evaluable linear expressions
//! - **Coordinate expressions** ([`expr`]) - the shared parser for the
//!   `-x+1/2` style linear forms used by operator triplets and site templates

pub mod expr;
pub mod lattice;
pub mod symmetry;
pub mod wyckoff;
