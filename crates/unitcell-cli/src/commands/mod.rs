mod build;
mod catalog;
mod group;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Group(args) => group::run(args),
        Commands::Catalog(args) => catalog::run(args),
        Commands::Build(args) => build::run(args),
    }
}

/// Parse a `name=value` pair with a numeric value.
pub(crate) fn parse_assignment(pair: &str) -> Result<(&str, f64)> {
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| CliError::BadParameter(pair.to_string()))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| CliError::BadParameter(pair.to_string()))?;
    Ok((name.trim(), value))
}
