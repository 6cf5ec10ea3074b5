//! # Engine Module
//!
//! The symmetry-orbit expansion engine. Given a base set of fractional
//! coordinates and a group's full operator list, it generates every
//! symmetry-equivalent position, wraps each into the canonical unit cell,
//! and deduplicates the result while carrying particle types and (optionally)
//! orientations along in lock-step.
//!
//! The engine keeps no state between calls; it only reads the immutable
//! symmetry tables supplied by the caller.

pub mod error;
pub mod expand;
pub mod warnings;
