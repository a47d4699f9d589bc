//! fairsync CLI — regenerate the past-fairs listing of a static page.
//!
//! Reads fair records from CSV, finds each fair's photos on disk, and
//! rewrites the `fairs-grid` section of the target HTML document in place.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
