//! # Meta-repo Story
//!
//! A [`Story`] is a named snapshot of a meta-repo run: the environment or
//! branch it targets, the projects checked out in the source tree, and which
//! of those projects have deployable artifacts.
//!
//! The story is read from the meta-repo descriptor (`.meta` by default), a
//! JSON document of the form:
//!
//! ```json
//! {
//!   "name": "feature-x",
//!   "projects": { "svc-a": true, "svc-b": "git@github.com:acme/svc-b.git" },
//!   "artifacts": { "svc-a": true, "svc-b": false }
//! }
//! ```
//!
//! Project values may be a boolean or the project's remote URL; any string
//! value counts as participating. Only participating projects contribute to
//! the story tag. Unknown keys are ignored.
//!
//! The maps are plain `HashMap`s. Every accessor that feeds generated output
//! returns a sorted list, so output never depends on map iteration order.

use crate::error::{Error, Result};
use crate::filesystem::Storage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default location of the meta-repo descriptor
pub const DEFAULT_META_PATH: &str = ".meta";

/// A project entry in the descriptor's `projects` map
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ProjectEntry {
    Flag(bool),
    Remote(String),
}

impl ProjectEntry {
    fn participates(&self) -> bool {
        match self {
            ProjectEntry::Flag(flag) => *flag,
            ProjectEntry::Remote(_) => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStory {
    name: String,
    #[serde(default)]
    projects: HashMap<String, ProjectEntry>,
    #[serde(default)]
    artifacts: HashMap<String, bool>,
}

/// A named snapshot of the meta-repo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Environment or branch identifier
    pub name: String,
    /// Project id to participates-in-source-tree
    pub projects: HashMap<String, bool>,
    /// Project id to deployable flag
    pub artifacts: HashMap<String, bool>,
}

impl Story {
    /// Create an empty story
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            projects: HashMap::new(),
            artifacts: HashMap::new(),
        }
    }

    /// Add a project with an artifact entry
    pub fn with_artifact(mut self, project: impl Into<String>, deployable: bool) -> Self {
        let project = project.into();
        self.projects.insert(project.clone(), true);
        self.artifacts.insert(project, deployable);
        self
    }

    /// Add a project that has no artifact entry
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.projects.insert(project.into(), true);
        self
    }

    /// Parse a story from descriptor JSON and check its invariants
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawStory = serde_json::from_str(json).map_err(|e| Error::Story {
            message: format!("Invalid meta-repo descriptor: {}", e),
        })?;

        let story = Self {
            name: raw.name,
            projects: raw
                .projects
                .into_iter()
                .map(|(name, entry)| {
                    let participates = entry.participates();
                    (name, participates)
                })
                .collect(),
            artifacts: raw.artifacts,
        };

        story.validate()?;
        Ok(story)
    }

    /// Check that the story is usable for generation
    ///
    /// The name must be non-empty and every artifact must also be a project.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Story {
                message: "story name must not be empty".to_string(),
            });
        }

        let mut orphans: Vec<&str> = self
            .artifacts
            .keys()
            .filter(|name| !self.projects.contains_key(*name))
            .map(String::as_str)
            .collect();
        orphans.sort_unstable();

        if !orphans.is_empty() {
            return Err(Error::Story {
                message: format!(
                    "artifacts are not listed as projects: {}",
                    orphans.join(", ")
                ),
            });
        }

        Ok(())
    }

    /// All project ids, sorted
    pub fn project_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.projects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Project ids marked as participating in the source tree, sorted
    pub fn participating_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .projects
            .iter()
            .filter(|(_, participates)| **participates)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// All project ids with an artifact entry, deployable or not, sorted
    pub fn artifact_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.artifacts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether a project's artifact is marked deployable
    pub fn is_deployable(&self, project: &str) -> bool {
        self.artifacts.get(project).copied().unwrap_or(false)
    }
}

/// Load and validate the story descriptor at `path`
pub fn load<S: Storage>(storage: &S, path: &Path) -> Result<Story> {
    let json = storage.read_to_string(path).map_err(|e| Error::Story {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;
    Story::parse(&json)
}
