//! Implementation of the generation pipeline.
//!
//! ## Overview
//!
//! A run moves through these phases:
//! 1. Tag Calculation - Derive the shared story tag from project heads (`crate::tag`)
//! 2. Config Building - Populate story/master documents from the story's artifacts
//! 3. Inventory Fan-out - One document per cluster when an inventory is given
//! 4. Template Rendering - Stage rendered manifests in memory (local mode only)
//! 5. Writing - Flush staged manifests, then every document, through `Storage`
//!
//! Phases 1-4 never touch the output tree, so a fatal error anywhere before
//! phase 5 leaves the filesystem untouched.

pub mod build;
pub mod fanout;
pub mod orchestrator;
pub mod render;
pub mod write;

/// Document covering every project's manifests, deploy-only
pub const MASTER_DOCUMENT: &str = "skaffold-master.yaml";

/// Document covering only the story's deployable projects
pub const STORY_DOCUMENT: &str = "skaffold-story.yaml";

/// Document for shared infrastructure manifests
pub const INFRA_DOCUMENT: &str = "skaffold-infra.yaml";

/// Document name for a cluster in inventory mode
pub fn cluster_document(cluster: &str) -> String {
    format!("skaffold-{}.yaml", cluster)
}
