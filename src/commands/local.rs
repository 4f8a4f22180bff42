//! Local command implementation
//!
//! Renders every project's manifest templates with the story namespace and
//! writes three documents next to the meta-repo descriptor:
//!
//! - `skaffold-master.yaml`: every project's rendered manifests, deploy only
//! - `skaffold-story.yaml`: build and deploy the story's deployable projects
//! - `skaffold-infra.yaml`: shared infrastructure manifests (with `--infra`)

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use skaffold_beam::filesystem::DiskFS;
use skaffold_beam::phases::orchestrator::{LocalOptions, Mode};

use super::RunArgs;
use crate::cli::GlobalArgs;

/// Arguments for the local command
#[derive(Args, Debug)]
pub struct LocalArgs {
    /// Relative path to manifest templates directory
    #[arg(short, long, value_name = "PATH")]
    pub templates: Option<PathBuf>,

    /// Relative path to manifest output directory
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Sub-directory of the templates holding shared infrastructure manifests
    #[arg(long, value_name = "DIR")]
    pub infra: Option<String>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Execute the local command
pub fn execute(global: &GlobalArgs, args: LocalArgs) -> Result<()> {
    super::require_gcp_project(global)?;

    let (templates, output) = match (&args.templates, &args.output) {
        (Some(templates), Some(output)) => (templates, output),
        _ => bail!("local manifest template directory is required"),
    };

    let mut storage = DiskFS::new(".");
    let story = super::load_story(&storage, &global.meta)?;

    let mode = Mode::Local(LocalOptions {
        templates: templates.as_path(),
        output: output.as_path(),
        infra: args.infra.as_deref(),
    });

    super::run(global, &args.run, &mut storage, &story, mode)
}
