//! Read-only symmetry tables: operator lists for the 230 space groups
//! (identity first, one fixed setting per group), the 17 plane groups, and
//! the 32 point groups with their precomputed quaternions.
//!
//! The backing snapshots are embedded in the binary and parsed exactly once,
//! on first access; concurrent readers share the same immutable tables.

pub mod operator;
pub mod point_group;
pub mod tables;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymmetryError {
    #[error("space group number must be between 1 and 230, got {0}")]
    SpaceGroupOutOfRange(u16),
    #[error("plane group number must be between 1 and 17, got {0}")]
    PlaneGroupOutOfRange(u8),
    #[error("point group number must be between 1 and 32, got {0}")]
    PointGroupOutOfRange(u8),
    #[error("unknown point group name '{0}'")]
    UnknownPointGroupName(String),
}
