//! Shared test utilities for the CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_feature_x_meta_repo();
//!     fixture.command().arg("-p").arg("my-gcp").arg("remote").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fixtures;
    pub use super::TestFixture;
}

/// Descriptor, inventory and head constants for a small meta-repo.
#[allow(dead_code)]
pub mod fixtures {
    /// `svc-a` and `svc-c` deployable, `svc-b` not.
    pub const FEATURE_X_META: &str = r#"{
  "name": "feature-x",
  "projects": {"svc-a": true, "svc-b": true, "svc-c": true},
  "artifacts": {"svc-a": true, "svc-b": false, "svc-c": true}
}"#;

    /// Two clusters splitting the deployable projects.
    pub const TWO_CLUSTER_INVENTORY: &str = r#"
clusterA:
  svc-a:
    namespace: apps
    manifests:
      type: deployment
      targets: [svc-a-web, svc-a-api]
clusterB:
  svc-c:
    namespace: batch
    manifests:
      type: statefulset
      targets: [svc-c]
  svc-b:
    namespace: batch
    manifests:
      type: deployment
      targets: [svc-b]
"#;

    pub const SHA_A: &str = "abc1234def5678abc1234def5678abc1234def56";
    pub const SHA_B: &str = "9999999aaaaaaa9999999aaaaaaa9999999aaaaa";
    pub const SHA_C: &str = "c0ffee0c0ffee0c0ffee0c0ffee0c0ffee0c0ffe";

    /// Tag for the feature-x story with the heads above.
    pub const FEATURE_X_TAG: &str = "feature-x-svc-a-abc1234-svc-b-9999999-svc-c-c0ffee0";

    pub const DEPLOYMENT_TEMPLATE: &str = "apiVersion: apps/v1
kind: Deployment
metadata:
  name: svc-a
  namespace: {{ .namespace }}
";
}

/// A temporary meta-repo checkout.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write the `.meta` descriptor.
    pub fn with_meta(self, content: &str) -> Self {
        self.with_file(".meta", content)
    }

    /// Point `branch` of `project` at `sha` with a loose ref.
    pub fn with_head(self, project: &str, branch: &str, sha: &str) -> Self {
        self.with_file(
            &format!("{}/.git/refs/heads/{}", project, branch),
            &format!("{}\n", sha),
        )
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// The feature-x story with heads for all three projects and templates
    /// for `svc-a` and `svc-b` only.
    pub fn with_feature_x_meta_repo(self) -> Self {
        self.with_meta(fixtures::FEATURE_X_META)
            .with_head("svc-a", "feature-x", fixtures::SHA_A)
            .with_head("svc-b", "feature-x", fixtures::SHA_B)
            .with_head("svc-c", "feature-x", fixtures::SHA_C)
            .with_file(
                "templates/svc-a/deployment.yaml",
                fixtures::DEPLOYMENT_TEMPLATE,
            )
            .with_file("templates/svc-b/service.yaml", "kind: Service\n")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file from the fixture as text.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
    }

    /// Read and parse a generated YAML document.
    pub fn read_yaml(&self, path: &str) -> serde_yaml::Value {
        serde_yaml::from_str(&self.read(path)).expect("Generated document is not YAML")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("skaffold-beam");
        cmd.current_dir(self.path())
            .env_remove("SKAFFOLD_BEAM_GCP_PROJECT")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
