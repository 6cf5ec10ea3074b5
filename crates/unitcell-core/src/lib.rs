//! # unitcell
//!
//! A library for constructing crystal unit cells from compact crystallographic
//! descriptors: space-group (or plane-group) numbers, occupied Wyckoff sites
//! with free coordinate parameters, and cell-shape parameters.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns:
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: lattice-vector
//!   construction from cell parameters, the read-only symmetry tables
//!   (space-group, plane-group, and point-group operators), and the Wyckoff
//!   coordinate-template store with its precompiled expressions.
//!
//! - **[`engine`]: The Logic Core.** The symmetry-orbit expansion engine:
//!   applies a group's full operator list to a base coordinate set and
//!   produces the deduplicated set of equivalent positions, propagating
//!   particle types and orientations in lock-step.
//!
//! - **[`structures`]: The Public API.** User-facing handles that tie the
//!   tables and the engine together: [`SpaceGroup`], [`PlaneGroup`],
//!   [`PointGroup`], user-defined [`Prototype`]s, and the bundled
//!   [`AflowPrototype`] catalog of 590 known crystal prototypes.
//!
//! All symmetry data is bundled as read-only snapshot assets and loaded at
//! most once per process; no network or filesystem access happens at runtime.

pub mod core;
pub mod engine;
pub mod structures;

pub use nalgebra;

pub use crate::core::lattice::geometry::{
    BoxParameters, LatticeError, area, convert_to_box, convert_to_vectors,
    fractional_to_cartesian, translate_to_vector, translate_to_vector_2d, volume,
};
pub use crate::core::lattice::systems::{
    CellParams2d, CellParams3d, LatticeSystem2d, LatticeSystem3d,
};
pub use crate::core::symmetry::SymmetryError;
pub use crate::core::symmetry::operator::{PlaneOperator, SymmetryOperator};
pub use crate::core::wyckoff::{WyckoffError, WyckoffSite, WyckoffTable};
pub use crate::engine::expand::{
    BasisExpansion, ExpandOptions, PlaneBasisExpansion, expand_basis, expand_basis_2d, wrap,
};
pub use crate::engine::error::ExpandError;
pub use crate::engine::warnings::ExpansionWarning;
pub use crate::structures::catalog::{AflowPrototype, CatalogError, PrototypeCatalog};
pub use crate::structures::groups::{PlaneGroup, PointGroup, SpaceGroup};
pub use crate::structures::prototype::{BasisParams, Prototype, PrototypeError};
