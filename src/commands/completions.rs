//! # Completions Command Implementation
//!
//! Prints a shell completion script for `skaffold-beam` to stdout.
//!
//! ```bash
//! skaffold-beam completions bash > ~/.local/share/bash-completion/completions/skaffold-beam
//! skaffold-beam completions zsh > ~/.zfunc/_skaffold-beam
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "skaffold-beam", &mut io::stdout());
    Ok(())
}
