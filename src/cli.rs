//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

/// A blast radius-aware Skaffold config generator for story-driven meta-repos
#[derive(Parser, Debug)]
#[command(name = "skaffold-beam")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every generating command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// GCP project used to build and store images
    #[arg(
        short = 'p',
        long,
        global = true,
        value_name = "ID",
        env = "SKAFFOLD_BEAM_GCP_PROJECT"
    )]
    pub gcp_project: Option<String>,

    /// Image registry prefix (defaults to gcr.io/<gcp-project>)
    #[arg(long, global = true, value_name = "PREFIX")]
    pub registry: Option<String>,

    /// Cluster inventory (project-manifest map) YAML
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Meta-repo descriptor
    #[arg(long, global = true, value_name = "PATH", default_value = ".meta")]
    pub meta: PathBuf,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate Skaffold configs for local manifest templates
    Local(commands::local::LocalArgs),

    /// Generate Skaffold configs for remote manifests on a cluster
    Remote(commands::remote::RemoteArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // a logger may already be installed when running under a test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.global.log_level);

        match self.command {
            Commands::Local(args) => commands::local::execute(&self.global, args),
            Commands::Remote(args) => commands::remote::execute(&self.global, args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
