mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    if let Err(e) = commands::run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
