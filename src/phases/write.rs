//! Phase 5: Writing
//!
//! The final phase of a run. It flushes a [`Plan`] through [`Storage`]:
//!
//! 1.  **Create Directories**: every staged output directory, parents first.
//!     Failure here is fatal.
//! 2.  **Write Manifests**: each rendered manifest at its staged path.
//! 3.  **Write Documents**: each document serialized to YAML, in filename
//!     order.
//!
//! Writes are not transactional: the first failure stops the phase, and
//! anything written before it stays on disk.

use std::path::Path;

use log::info;

use super::orchestrator::Plan;
use crate::error::Result;
use crate::filesystem::Storage;

/// Execute Phase 5: write a plan's manifests and documents
pub fn execute<S: Storage>(plan: &Plan, storage: &mut S) -> Result<()> {
    for dir in plan.manifests.directories() {
        storage.create_dir_all(dir)?;
    }

    for (path, file) in plan.manifests.files() {
        storage.write(path, &file.content)?;
    }
    if !plan.manifests.is_empty() {
        info!("Wrote {} rendered manifests", plan.manifests.len());
    }

    for (name, config) in &plan.documents {
        let yaml = config.to_yaml()?;
        storage.write(Path::new(name), yaml.as_bytes())?;
        info!("Wrote {}", name);
    }

    Ok(())
}
