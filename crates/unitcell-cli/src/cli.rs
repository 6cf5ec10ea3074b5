use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "unitcell",
    version,
    about = "Build crystal unit cells from space-group symmetry and prototype records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect a symmetry group and its operator table
    Group(GroupArgs),
    /// Search the bundled crystal-prototype catalog
    Catalog(CatalogArgs),
    /// Generate the positions and lattice vectors of a structure
    Build(BuildArgs),
}

#[derive(Debug, Args)]
pub struct GroupArgs {
    /// Space group number (1-230)
    #[arg(long, conflicts_with_all = ["plane", "point"])]
    pub space: Option<u16>,

    /// Plane group number (1-17)
    #[arg(long, conflicts_with = "point")]
    pub plane: Option<u8>,

    /// Point group number (1-32)
    #[arg(long)]
    pub point: Option<u8>,

    /// List the full operator table
    #[arg(long)]
    pub operators: bool,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Look up a single record by catalog index [0, 590)
    #[arg(long)]
    pub index: Option<usize>,

    /// Filter by Pearson symbol, e.g. cF8
    #[arg(long)]
    pub pearson: Option<String>,

    /// Filter by space group number
    #[arg(long)]
    pub space_group: Option<u16>,

    /// Filter by prototype label, e.g. NaCl
    #[arg(long)]
    pub prototype: Option<String>,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Build from a catalog record by index [0, 590)
    #[arg(long, conflicts_with_all = ["space_group", "sites", "types"])]
    pub index: Option<usize>,

    /// Assign distinct type letters to the catalog record's chemical types
    #[arg(long, requires = "index")]
    pub set_type: bool,

    /// Space group number for a user-defined prototype
    #[arg(long, requires = "sites")]
    pub space_group: Option<u16>,

    /// Occupied Wyckoff site letters, e.g. "hh"
    #[arg(long)]
    pub sites: Option<String>,

    /// One type letter per site, e.g. "AC"
    #[arg(long)]
    pub types: Option<String>,

    /// Free basis parameter, e.g. -p x1=0.12 (repeatable)
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Lattice parameter override, e.g. -l a=4.0 (repeatable)
    #[arg(short = 'l', long = "lattice", value_name = "NAME=VALUE")]
    pub lattice: Vec<String>,
}
