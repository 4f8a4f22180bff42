//! # CLI Command Implementations
//!
//! Each generating subcommand lives in its own file with an `Args` struct
//! derived with `clap` and an `execute` function. Both generating commands
//! funnel into [`run`], which loads the story, plans the run through the
//! library and reports the outcome.

pub mod completions;
pub mod local;
pub mod remote;

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::Path;

use skaffold_beam::filesystem::DiskFS;
use skaffold_beam::git::GitRefs;
use skaffold_beam::phases::orchestrator::{self, Mode, Plan, RunContext};
use skaffold_beam::story::{self, Story};

use crate::cli::GlobalArgs;

/// Output options shared by the generating commands
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Show what would be written without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// The GCP project, or a user error if it was not given
pub fn require_gcp_project(global: &GlobalArgs) -> Result<&str> {
    match global.gcp_project.as_deref().map(str::trim) {
        Some(project) if !project.is_empty() => Ok(project),
        _ => bail!("a Google Cloud Platform project id is required"),
    }
}

/// Load the story from the meta-repo descriptor under `storage`
pub fn load_story(storage: &DiskFS, meta: &Path) -> Result<Story> {
    story::load(storage, meta)
        .with_context(|| format!("Failed to load meta-repo descriptor {}", meta.display()))
}

/// Plan (and unless dry-running, write) a run, then report it
pub fn run(
    global: &GlobalArgs,
    run_args: &RunArgs,
    storage: &mut DiskFS,
    story: &Story,
    mode: Mode<'_>,
) -> Result<()> {
    let gcp_project = require_gcp_project(global)?;
    let registry = global
        .registry
        .clone()
        .unwrap_or_else(|| format!("gcr.io/{}", gcp_project));

    let ctx = RunContext {
        story,
        gcp_project,
        registry: &registry,
    };

    let plan = if run_args.dry_run {
        let refs = GitRefs::new(&*storage, "");
        orchestrator::plan(&ctx, &mode, &*storage, &refs)?
    } else {
        orchestrator::execute(&ctx, &mode, storage)?
    };

    report(&plan, run_args);
    Ok(())
}

fn report(plan: &Plan, run_args: &RunArgs) {
    for warning in &plan.warnings {
        println!("{}", warning);
    }

    if run_args.quiet {
        return;
    }

    if run_args.dry_run {
        println!("DRY RUN MODE - No changes will be made");
    }
    println!("Story tag: {}", plan.tag);

    let verb = if run_args.dry_run {
        "Would write"
    } else {
        "Wrote"
    };
    for name in plan.documents.keys() {
        println!("{} {}", verb, name);
    }
    if !plan.manifests.is_empty() {
        println!("{} {} rendered manifests", verb, plan.manifests.len());
    }
}
