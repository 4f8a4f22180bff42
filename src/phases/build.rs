//! Phase 2: Config Building
//!
//! Populates a story document with one Docker artifact and one deploy target
//! per deployable project, and (in local mode) a master document with a
//! manifest glob for every project that has an artifact entry, deployable or
//! not. Both documents are sorted before returning.

use std::path::Path;

use crate::skaffold::{Artifact, SkaffoldConfig};
use crate::story::Story;

/// How deploy targets are expressed
#[derive(Debug, Clone, Copy)]
pub enum DeployStyle<'a> {
    /// Globs over rendered manifests, `<output>/<project>/*.yaml`
    Local { output: &'a Path },
    /// Live deployments in the story namespace, `<story>:deployment/<project>`
    Remote,
}

/// Image name for a project, `<registry>/<project>`
pub fn image_name(registry: &str, project: &str) -> String {
    format!("{}/{}", registry.trim_end_matches('/'), project)
}

/// Manifest glob for a project's rendered output directory
pub fn manifest_glob(output: &Path, project: &str) -> String {
    output.join(project).join("*.yaml").display().to_string()
}

/// Live-resource reference for a project's deployment in the story namespace
pub fn remote_reference(story: &Story, project: &str) -> String {
    format!("{}:deployment/{}", story.name, project)
}

/// Execute Phase 2 for one story document
///
/// `master` is only populated in local mode; remote mode has no master
/// document and ignores it.
pub fn execute(
    story: &Story,
    registry: &str,
    style: DeployStyle<'_>,
    story_config: &mut SkaffoldConfig,
    mut master: Option<&mut SkaffoldConfig>,
) {
    for project in story.artifact_names() {
        if let (DeployStyle::Local { output }, Some(master)) = (style, master.as_deref_mut()) {
            master.add_manifest(manifest_glob(output, project));
        }

        if !story.is_deployable(project) {
            log::debug!("Skipping non-deployable project {}", project);
            continue;
        }

        story_config.add_artifact(Artifact::docker(image_name(registry, project), project));

        match style {
            DeployStyle::Local { output } => {
                story_config.add_manifest(manifest_glob(output, project));
            }
            DeployStyle::Remote => {
                story_config.add_remote_manifest(remote_reference(story, project));
            }
        }
    }

    story_config.sort();
    if let Some(master) = master {
        master.sort();
    }
}
