use std::fmt;

/// Non-fatal anomalies encountered during orbit expansion. These are
/// returned to the caller alongside the result (and logged), never raised as
/// errors; the expansion completes with the documented fallback behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionWarning {
    /// The group contains improper (reflection) operations, which are
    /// skipped when transporting orientations; affected positions keep the
    /// unrotated base orientation.
    ReflectionIgnoresOrientation,
    /// A duplicate candidate matched more than one accepted position within
    /// tolerance, so the orientation at that position is not well defined;
    /// the first-encountered value is kept.
    AmbiguousOrientation,
}

impl fmt::Display for ExpansionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReflectionIgnoresOrientation => f.write_str(
                "reflection operations are present in this group and are \
                 ignored for orientation propagation",
            ),
            Self::AmbiguousOrientation => f.write_str(
                "orientation is not well defined for at least one position; \
                 only the first occurrence is kept",
            ),
        }
    }
}
