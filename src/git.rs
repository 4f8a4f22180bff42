//! Branch head lookup for meta-repo projects
//!
//! Each project in the meta-repo is its own git checkout under the meta-repo
//! root. Tag calculation only needs the commit a branch points at, so refs
//! are read straight from the `.git` directory through [`Storage`] instead of
//! shelling out to `git`.

use crate::error::{Error, Result};
use crate::filesystem::Storage;
use std::path::{Path, PathBuf};

/// Read accessor for per-project branch heads
pub trait HeadRefs {
    /// The full commit id `branch` points at in `project`
    fn head_ref(&self, project: &str, branch: &str) -> Result<String>;
}

/// Resolves branch heads from project `.git` directories
///
/// Loose refs (`.git/refs/heads/<branch>`) win over `.git/packed-refs`.
pub struct GitRefs<'a, S: Storage> {
    storage: &'a S,
    root: PathBuf,
}

impl<'a, S: Storage> GitRefs<'a, S> {
    /// Read refs for projects checked out under `root`
    pub fn new(storage: &'a S, root: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            root: root.into(),
        }
    }

    fn git_dir(&self, project: &str) -> PathBuf {
        self.root.join(project).join(".git")
    }

    fn loose_ref(&self, git_dir: &Path, branch: &str) -> Option<String> {
        let path = git_dir.join("refs").join("heads").join(branch);
        if !self.storage.exists(&path) {
            return None;
        }
        self.storage
            .read_to_string(&path)
            .ok()
            .map(|content| content.trim().to_string())
    }

    fn packed_ref(&self, git_dir: &Path, branch: &str) -> Option<String> {
        let content = self
            .storage
            .read_to_string(&git_dir.join("packed-refs"))
            .ok()?;
        let wanted = format!("refs/heads/{}", branch);

        content
            .lines()
            .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
            .filter_map(|line| line.split_once(' '))
            .find(|(_, name)| name.trim() == wanted)
            .map(|(sha, _)| sha.trim().to_string())
    }
}

impl<S: Storage> HeadRefs for GitRefs<'_, S> {
    fn head_ref(&self, project: &str, branch: &str) -> Result<String> {
        let git_dir = self.git_dir(project);

        let sha = self
            .loose_ref(&git_dir, branch)
            .or_else(|| self.packed_ref(&git_dir, branch))
            .filter(|sha| !sha.is_empty())
            .ok_or_else(|| Error::HeadRef {
                project: project.to_string(),
                branch: branch.to_string(),
                message: format!("branch not found in {}", git_dir.display()),
            })?;

        log::debug!("{}@{} is at {}", project, branch, sha);
        Ok(sha)
    }
}
