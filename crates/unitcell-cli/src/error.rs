use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Symmetry(#[from] unitcell::SymmetryError),
    #[error(transparent)]
    Prototype(#[from] unitcell::PrototypeError),
    #[error(transparent)]
    Catalog(#[from] unitcell::CatalogError),
    #[error("invalid parameter '{0}': expected NAME=VALUE with a numeric value")]
    BadParameter(String),
    #[error("unknown lattice parameter '{0}' (expected one of a, b, c, alpha, beta, gamma)")]
    UnknownLatticeParameter(String),
    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
