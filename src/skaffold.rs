//! # Skaffold Configuration Documents
//!
//! The subset of the Skaffold `v1alpha2` schema that `skaffold-beam` emits:
//! a build section (tag policy, Docker artifacts, Google Cloud Build) and a
//! kubectl deploy section (manifest globs and live-resource references).
//!
//! Documents are mutated in place by the builders and then sorted with
//! [`SkaffoldConfig::sort`] before they are serialized, so two runs over the
//! same inputs always produce byte-identical YAML.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Schema version written to every document
pub const API_VERSION: &str = "skaffold/v1alpha2";

/// Dockerfile used for every source-based artifact build
pub const DOCKERFILE: &str = "Dockerfile";

/// A complete Skaffold configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkaffoldConfig {
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,
    #[serde(default)]
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_policy: Option<TagPolicy>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_cloud_build: Option<GoogleCloudBuild>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPolicy {
    pub env_template: EnvTemplateTagger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvTemplateTagger {
    pub template: String,
}

/// One image built from a project workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub image_name: String,
    pub workspace: String,
    pub docker: DockerArtifact,
}

impl Artifact {
    /// A Docker build of `<workspace>/Dockerfile`
    pub fn docker(image_name: String, workspace: &str) -> Self {
        Self {
            image_name,
            workspace: workspace.to_string(),
            docker: DockerArtifact {
                dockerfile_path: DOCKERFILE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerArtifact {
    pub dockerfile_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCloudBuild {
    pub project_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default)]
    pub kubectl: KubectlDeploy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubectlDeploy {
    /// Manifest file globs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<String>,
    /// Live-resource references, `<namespace>:<kind>/<name>`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remote_manifests: Vec<String>,
}

impl Default for SkaffoldConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SkaffoldConfig {
    /// An empty deploy-only document
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: "Config".to_string(),
            build: None,
            deploy: DeployConfig::default(),
        }
    }

    /// Attach a build section that builds on Google Cloud Build with a
    /// shared env-template tag
    pub fn with_build(mut self, gcp_project: &str, tag_template: &str) -> Self {
        self.build = Some(BuildConfig {
            tag_policy: Some(TagPolicy {
                env_template: EnvTemplateTagger {
                    template: tag_template.to_string(),
                },
            }),
            artifacts: Vec::new(),
            google_cloud_build: Some(GoogleCloudBuild {
                project_id: gcp_project.to_string(),
            }),
        });
        self
    }

    /// Append an artifact, creating a bare build section if there is none
    pub fn add_artifact(&mut self, artifact: Artifact) {
        self.build
            .get_or_insert_with(BuildConfig::default)
            .artifacts
            .push(artifact);
    }

    pub fn add_manifest(&mut self, glob: String) {
        self.deploy.kubectl.manifests.push(glob);
    }

    pub fn add_remote_manifest(&mut self, reference: String) {
        self.deploy.kubectl.remote_manifests.push(reference);
    }

    /// Artifacts in document order
    pub fn artifacts(&self) -> &[Artifact] {
        self.build
            .as_ref()
            .map(|b| b.artifacts.as_slice())
            .unwrap_or_default()
    }

    pub fn manifests(&self) -> &[String] {
        &self.deploy.kubectl.manifests
    }

    pub fn remote_manifests(&self) -> &[String] {
        &self.deploy.kubectl.remote_manifests
    }

    /// Sort artifacts by image name and every deploy list lexicographically
    pub fn sort(&mut self) {
        if let Some(build) = self.build.as_mut() {
            build
                .artifacts
                .sort_by(|a, b| a.image_name.cmp(&b.image_name));
        }
        self.deploy.kubectl.manifests.sort();
        self.deploy.kubectl.remote_manifests.sort();
    }

    /// Serialize the document to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
