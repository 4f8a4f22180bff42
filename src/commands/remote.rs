//! Remote command implementation
//!
//! Points Skaffold at resources already live on a cluster. Without an
//! inventory this writes `skaffold-story.yaml` referencing each deployable
//! project's deployment in the story namespace. With `--config <inventory>`
//! it writes one `skaffold-<cluster>.yaml` per cluster instead.

use anyhow::{Context, Result};
use clap::Args;

use skaffold_beam::filesystem::DiskFS;
use skaffold_beam::inventory;
use skaffold_beam::phases::orchestrator::Mode;

use super::RunArgs;
use crate::cli::GlobalArgs;

/// Arguments for the remote command
#[derive(Args, Debug)]
pub struct RemoteArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Execute the remote command
pub fn execute(global: &GlobalArgs, args: RemoteArgs) -> Result<()> {
    super::require_gcp_project(global)?;

    let mut storage = DiskFS::new(".");
    let story = super::load_story(&storage, &global.meta)?;

    let inventory = match &global.config {
        Some(path) => Some(
            inventory::load(&storage, path)
                .with_context(|| format!("Failed to load inventory {}", path.display()))?,
        ),
        None => None,
    };

    let mode = Mode::Remote {
        inventory: inventory.as_ref(),
    };

    super::run(global, &args.run, &mut storage, &story, mode)
}
