//! Phase 3: Inventory Fan-out
//!
//! Produces one document per cluster in the inventory. A cluster's document
//! holds a project only if the project is globally deployable AND listed
//! under that cluster; the same predicate selects both its artifact and its
//! live-resource references, so each project lands only in the documents of
//! the clusters that host it.

use std::collections::{BTreeMap, HashSet};

use log::info;

use super::build::image_name;
use super::cluster_document;
use crate::inventory::{Cluster, Inventory, Project};
use crate::skaffold::{Artifact, SkaffoldConfig};
use crate::story::Story;

/// Projects of `cluster` that take part in this run, sorted by name
pub fn selected_projects<'a>(story: &Story, cluster: &'a Cluster) -> Vec<(&'a str, &'a Project)> {
    let mut selected: Vec<(&str, &Project)> = cluster
        .iter()
        .filter(|(name, _)| story.is_deployable(name))
        .map(|(name, project)| (name.as_str(), project))
        .collect();
    selected.sort_by(|a, b| a.0.cmp(b.0));
    selected
}

/// Execute Phase 3
///
/// Every cluster document starts as a clone of `base`, which carries the
/// shared build section (tag policy and build backend).
pub fn execute(
    inventory: &Inventory,
    story: &Story,
    registry: &str,
    base: &SkaffoldConfig,
) -> BTreeMap<String, SkaffoldConfig> {
    let mut documents = BTreeMap::new();
    let mut hosted: HashSet<&str> = HashSet::new();

    for cluster_name in inventory.cluster_names() {
        let cluster = &inventory.clusters[cluster_name];
        let mut config = base.clone();

        for (name, project) in selected_projects(story, cluster) {
            hosted.insert(name);
            config.add_artifact(Artifact::docker(image_name(registry, name), name));
            for reference in project.remote_manifests() {
                config.add_remote_manifest(reference);
            }
        }

        config.sort();
        documents.insert(cluster_document(cluster_name), config);
    }

    for project in story.artifact_names() {
        if story.is_deployable(project) && !hosted.contains(project) {
            info!("{} is deployable but not hosted on any cluster", project);
        }
    }

    documents
}
