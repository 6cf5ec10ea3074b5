use unitcell::nalgebra::Matrix3;
use unitcell::{AflowPrototype, BasisExpansion, BasisParams, CellParams3d, Prototype};

use crate::cli::BuildArgs;
use crate::commands::parse_assignment;
use crate::error::{CliError, Result};

pub fn run(args: BuildArgs) -> Result<()> {
    let lattice_overrides = parse_lattice(&args.lattice)?;
    let mut basis_overrides = BasisParams::new();
    for pair in &args.params {
        let (name, value) = parse_assignment(pair)?;
        basis_overrides.insert(name, value);
    }

    let (cell, expansion) = if let Some(index) = args.index {
        let prototype = AflowPrototype::new(index, args.set_type)?;
        println!("{prototype}");
        let cell = prototype.lattice_vectors(&lattice_overrides)?;
        let expansion = prototype.basis_vectors(&basis_overrides)?;
        (cell, expansion)
    } else if let Some(space_group) = args.space_group {
        let sites = args.sites.as_deref().unwrap_or_default();
        let prototype = Prototype::new(space_group, sites, args.types.as_deref())?;
        println!("{prototype}");
        let cell = prototype.lattice_vectors(&lattice_overrides)?;
        let expansion = prototype.basis_vectors(&basis_overrides)?;
        (cell, expansion)
    } else {
        return Err(CliError::Usage(
            "either --index or --space-group with --sites is required".to_string(),
        ));
    };

    print_structure(&cell, &expansion);
    Ok(())
}

fn parse_lattice(pairs: &[String]) -> Result<CellParams3d> {
    let mut params = CellParams3d::new();
    for pair in pairs {
        let (name, value) = parse_assignment(pair)?;
        params = match name {
            "a" => params.a(value),
            "b" => params.b(value),
            "c" => params.c(value),
            "alpha" => params.alpha(value),
            "beta" => params.beta(value),
            "gamma" => params.gamma(value),
            other => return Err(CliError::UnknownLatticeParameter(other.to_string())),
        };
    }
    Ok(params)
}

fn print_structure(cell: &Matrix3<f64>, expansion: &BasisExpansion) {
    println!("lattice vectors:");
    for i in 0..3 {
        println!(
            "  a{}  [{:12.8} {:12.8} {:12.8}]",
            i + 1,
            cell[(i, 0)],
            cell[(i, 1)],
            cell[(i, 2)]
        );
    }
    println!("{} positions (fractional):", expansion.positions.len());
    for (p, label) in expansion.positions.iter().zip(&expansion.type_labels) {
        println!("  {:<4} {:10.6} {:10.6} {:10.6}", label, p[0], p[1], p[2]);
    }
    for warning in &expansion.warnings {
        tracing::warn!("{warning}");
    }
}
