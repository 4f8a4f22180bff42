//! # skaffold-beam CLI
//!
//! Binary entry point for the `skaffold-beam` command-line tool. It parses
//! arguments with `clap`, sets up logging, and dispatches to a command. All
//! generation logic lives in the library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
