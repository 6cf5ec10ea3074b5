use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("expected {expected} type labels for {expected} base positions, got {got}")]
    TypeCountMismatch { expected: usize, got: usize },
    #[error("orientation propagation requested but no base orientations were supplied")]
    MissingOrientations,
    #[error("expected {expected} base orientations for {expected} base positions, got {got}")]
    OrientationCountMismatch { expected: usize, got: usize },
    #[error(
        "base positions asserted to be a complete orbit, but the symmetry \
         operations generated {generated} positions from {expected}"
    )]
    IncompleteBasis { expected: usize, generated: usize },
}
