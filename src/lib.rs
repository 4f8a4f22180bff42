//! # skaffold-beam
//!
//! A blast radius-aware Skaffold config generator for story-driven
//! meta-repos. Given a meta-repo story (which projects take part, which are
//! deployable) it produces Skaffold `v1alpha2` documents that build and deploy
//! only what the story touches, tagged with a content tag derived from each
//! project's branch head.
//!
//! ## Quick Example
//!
//! ```
//! use skaffold_beam::filesystem::MemoryFS;
//! use skaffold_beam::git::GitRefs;
//! use skaffold_beam::phases::orchestrator::{plan, Mode, RunContext};
//! use skaffold_beam::story::Story;
//!
//! let mut fs = MemoryFS::new();
//! fs.add_file_string("svc-a/.git/refs/heads/feature-x", "abc1234def5678").unwrap();
//!
//! let story = Story::new("feature-x").with_artifact("svc-a", true);
//! let ctx = RunContext { story: &story, gcp_project: "my-gcp", registry: "gcr.io/my-gcp" };
//! let refs = GitRefs::new(&fs, "");
//!
//! let plan = plan(&ctx, &Mode::Remote { inventory: None }, &fs, &refs).unwrap();
//! assert_eq!(plan.tag, "feature-x-svc-a-abc1234");
//! assert_eq!(
//!     plan.documents["skaffold-story.yaml"].remote_manifests(),
//!     ["feature-x:deployment/svc-a"]
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Story (`story`)**: the meta-repo snapshot driving a run.
//! - **Inventory (`inventory`)**: which projects live on which cluster.
//! - **Documents (`skaffold`)**: the generated Skaffold configs.
//! - **Storage (`filesystem`)**: the injected read/write capability; disk for
//!   real runs, memory for staging and tests.
//! - **Phases (`phases`)**: config building, fan-out, rendering, writing.
//!
//! Every list that reaches a document is sorted first, so identical inputs
//! always produce identical output.

pub mod error;
pub mod filesystem;
pub mod git;
pub mod inventory;
pub mod phases;
pub mod skaffold;
pub mod story;
pub mod tag;
pub mod template;
