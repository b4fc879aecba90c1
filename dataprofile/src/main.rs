//! Connection configuration tool.
//!
//! Resolves a database flavor and a stored connection record into the
//! driver connection string, pre-connection statements, connect args and
//! concat operator the profiling engine uses.
//!
//! # Security Guarantees
//! - Passwords are masked in output unless `--reveal` is passed
//! - No credentials are logged
//! - Sealed passwords are opened in memory only

use clap::Parser;
use dataprofile_cli::{Cli, execute};
use dataprofile_core::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet)?;

    let output = execute(&cli)?;
    println!("{}", output);

    Ok(())
}
