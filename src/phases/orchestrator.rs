//! Orchestrator for a complete generation run
//!
//! This module sequences the phases for the two run modes:
//!
//! - **Local**: story + master documents (and optionally an infra document),
//!   with every project's templates rendered into the output directory.
//! - **Remote**: one story document of live-resource references, or one
//!   document per cluster when an inventory is supplied.
//!
//! [`plan`] does all the work without writing anything; [`execute`] plans and
//! then hands the result to the writer.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use super::build::{self, manifest_glob, DeployStyle};
use super::render::{self, story_variables, Rendered};
use super::{fanout, write, INFRA_DOCUMENT, MASTER_DOCUMENT, STORY_DOCUMENT};
use crate::error::{Error, Result};
use crate::filesystem::{MemoryFS, Storage};
use crate::git::{GitRefs, HeadRefs};
use crate::inventory::Inventory;
use crate::skaffold::SkaffoldConfig;
use crate::story::Story;
use crate::tag;

/// Immutable inputs shared by every phase of a run
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    pub story: &'a Story,
    /// GCP project images are built in
    pub gcp_project: &'a str,
    /// Image registry prefix, e.g. `gcr.io/<gcp_project>`
    pub registry: &'a str,
}

/// Local-mode directories
#[derive(Debug, Clone, Copy)]
pub struct LocalOptions<'a> {
    pub templates: &'a Path,
    pub output: &'a Path,
    /// Sub-directory holding shared infrastructure manifests
    pub infra: Option<&'a str>,
}

/// Run mode, chosen once per invocation
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    Local(LocalOptions<'a>),
    Remote { inventory: Option<&'a Inventory> },
}

/// Everything a run produces, ready for the writer
#[derive(Debug, Clone)]
pub struct Plan {
    /// The calculated story tag
    pub tag: String,
    /// Output filename to document
    pub documents: BTreeMap<String, SkaffoldConfig>,
    /// Rendered manifests staged at their output paths
    pub manifests: MemoryFS,
    /// Non-fatal problems encountered along the way
    pub warnings: Vec<String>,
}

fn require(value: &str, message: &str, hint: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config {
            message: message.to_string(),
            hint: Some(hint.to_string()),
        });
    }
    Ok(())
}

fn validate(ctx: &RunContext<'_>, mode: &Mode<'_>) -> Result<()> {
    require(
        ctx.gcp_project,
        "a Google Cloud Platform project id is required",
        "pass --gcp-project or set SKAFFOLD_BEAM_GCP_PROJECT",
    )?;
    require(ctx.registry, "an image registry is required", "pass --registry")?;

    if let Mode::Local(local) = mode {
        if local.templates.as_os_str().is_empty() || local.output.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "local manifest template directory is required".to_string(),
                hint: Some("pass --templates and --output".to_string()),
            });
        }
    }

    Ok(())
}

/// Build every document and stage every rendered manifest, writing nothing
pub fn plan<S: Storage, R: HeadRefs + ?Sized>(
    ctx: &RunContext<'_>,
    mode: &Mode<'_>,
    storage: &S,
    refs: &R,
) -> Result<Plan> {
    validate(ctx, mode)?;

    let story_tag = tag::calculate(ctx.story, refs)?;
    info!("Story tag: {}", story_tag);
    let tag_template = tag::tag_template(&story_tag);

    let mut plan = Plan {
        tag: story_tag,
        documents: BTreeMap::new(),
        manifests: MemoryFS::new(),
        warnings: Vec::new(),
    };

    match mode {
        Mode::Local(local) => plan_local(ctx, local, &tag_template, storage, &mut plan)?,
        Mode::Remote { inventory } => plan_remote(ctx, *inventory, &tag_template, &mut plan),
    }

    Ok(plan)
}

fn plan_local<S: Storage>(
    ctx: &RunContext<'_>,
    local: &LocalOptions<'_>,
    tag_template: &str,
    storage: &S,
    plan: &mut Plan,
) -> Result<()> {
    let mut master = SkaffoldConfig::new();
    let mut story_config = SkaffoldConfig::new().with_build(ctx.gcp_project, tag_template);

    build::execute(
        ctx.story,
        ctx.registry,
        DeployStyle::Local {
            output: local.output,
        },
        &mut story_config,
        Some(&mut master),
    );

    let vars = story_variables(&ctx.story.name);
    let mut dirs: Vec<&str> = ctx.story.artifact_names();
    if let Some(infra) = local.infra {
        let mut infra_config = SkaffoldConfig::new();
        infra_config.add_manifest(manifest_glob(local.output, infra));
        plan.documents.insert(INFRA_DOCUMENT.to_string(), infra_config);
        dirs.push(infra);
    }

    for dir in dirs {
        let rendered = render::execute(
            storage,
            local.templates,
            local.output,
            dir,
            &vars,
            &mut plan.manifests,
        )?;
        if rendered == Rendered::Missing {
            plan.warnings
                .push(format!("manifests not found for {}, continuing", dir));
        }
    }

    plan.documents.insert(MASTER_DOCUMENT.to_string(), master);
    plan.documents.insert(STORY_DOCUMENT.to_string(), story_config);
    Ok(())
}

fn plan_remote(
    ctx: &RunContext<'_>,
    inventory: Option<&Inventory>,
    tag_template: &str,
    plan: &mut Plan,
) {
    let base = SkaffoldConfig::new().with_build(ctx.gcp_project, tag_template);

    match inventory {
        Some(inventory) => {
            plan.documents = fanout::execute(inventory, ctx.story, ctx.registry, &base);
        }
        None => {
            let mut story_config = base;
            build::execute(
                ctx.story,
                ctx.registry,
                DeployStyle::Remote,
                &mut story_config,
                None,
            );
            plan.documents
                .insert(STORY_DOCUMENT.to_string(), story_config);
        }
    }
}

/// Plan a run against `storage` and write the result
///
/// Head references are read from the project checkouts under the storage
/// root. Nothing is written unless planning succeeds.
pub fn execute<S: Storage>(ctx: &RunContext<'_>, mode: &Mode<'_>, storage: &mut S) -> Result<Plan> {
    let plan = {
        let refs = GitRefs::new(&*storage, "");
        plan(ctx, mode, &*storage, &refs)?
    };

    write::execute(&plan, storage)?;
    Ok(plan)
}
