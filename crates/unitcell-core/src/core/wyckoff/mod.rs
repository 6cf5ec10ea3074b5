//! Wyckoff coordinate templates for the 230 space groups.
//!
//! Each site is stored as a coordinate triple of precompiled linear
//! expressions over the free parameters `x`, `y`, `z`, so resolving a
//! prototype never re-parses template strings at call time.

mod table;

pub use table::{WyckoffError, WyckoffSite, WyckoffTable};
