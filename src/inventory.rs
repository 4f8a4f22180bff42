//! # Cluster Inventory
//!
//! The inventory describes which projects are hosted on which cluster, and
//! the namespace and live resources each project owns there:
//!
//! ```yaml
//! cluster-a:
//!   svc-a:
//!     namespace: apps
//!     manifests:
//!       type: deployment
//!       targets: [svc-a, svc-a-worker]
//! cluster-b:
//!   svc-b:
//!     namespace: batch
//!     manifests:
//!       type: statefulset
//!       targets: [svc-b]
//! ```
//!
//! JSON is accepted as well, since it parses as YAML.

use crate::error::{Error, Result};
use crate::filesystem::Storage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Live resources a project owns on a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifests {
    /// Resource kind, e.g. `deployment`
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource names, in declaration order
    #[serde(default)]
    pub targets: Vec<String>,
}

/// A project's placement on one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Target deploy namespace
    pub namespace: String,
    pub manifests: Manifests,
}

impl Project {
    pub fn new(namespace: &str, kind: &str, targets: &[&str]) -> Self {
        Self {
            namespace: namespace.to_string(),
            manifests: Manifests {
                kind: kind.to_string(),
                targets: targets.iter().map(|t| t.to_string()).collect(),
            },
        }
    }

    /// Live-resource references for this project, `<namespace>:<kind>/<target>`
    pub fn remote_manifests(&self) -> Vec<String> {
        self.manifests
            .targets
            .iter()
            .map(|target| format!("{}:{}/{}", self.namespace, self.manifests.kind, target))
            .collect()
    }
}

/// Projects hosted on one cluster
pub type Cluster = HashMap<String, Project>;

/// Cluster name to hosted projects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    pub clusters: HashMap<String, Cluster>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a project on a cluster, creating the cluster if needed
    pub fn with_project(mut self, cluster: &str, name: &str, project: Project) -> Self {
        self.clusters
            .entry(cluster.to_string())
            .or_default()
            .insert(name.to_string(), project);
        self
    }

    /// Parse an inventory document
    pub fn parse(content: &str) -> Result<Self> {
        let inventory: Inventory = serde_yaml::from_str(content)?;
        Ok(inventory)
    }

    /// Cluster names, sorted
    pub fn cluster_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clusters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Load the inventory file at `path`
pub fn load<S: Storage>(storage: &S, path: &Path) -> Result<Inventory> {
    let to_error = |message: String| Error::Inventory {
        path: path.display().to_string(),
        message,
    };

    let content = storage
        .read_to_string(path)
        .map_err(|e| to_error(e.to_string()))?;
    let inventory = Inventory::parse(&content).map_err(|e| to_error(e.to_string()))?;

    if inventory.is_empty() {
        return Err(to_error("inventory lists no clusters".to_string()));
    }

    Ok(inventory)
}
