//! Phase 4: Template Rendering
//!
//! Renders every file of a template directory into a staging [`MemoryFS`]
//! at the mirrored output path. A directory that cannot be listed is not an
//! error: meta-repos routinely contain projects with no manifests yet, so the
//! directory is reported and contributes nothing.

use std::path::Path;

use log::{debug, info};

use crate::error::Result;
use crate::filesystem::{File, MemoryFS, Storage};
use crate::template::{self, Variables};

/// Outcome of rendering one template directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    /// The directory was listed; this many files were staged
    Files(usize),
    /// The directory could not be listed
    Missing,
}

/// Variables bound for a story's manifests
pub fn story_variables(story_name: &str) -> Variables {
    Variables::from([("namespace".to_string(), story_name.to_string())])
}

/// Render `<templates>/<dir>/*` into `<output>/<dir>/*` inside `staged`
///
/// The output directory is registered in `staged` even when there is nothing
/// to render, so the writer always creates it.
pub fn execute<S: Storage>(
    storage: &S,
    templates: &Path,
    output: &Path,
    dir: &str,
    vars: &Variables,
    staged: &mut MemoryFS,
) -> Result<Rendered> {
    let source_dir = templates.join(dir);
    let target_dir = output.join(dir);

    let names = match storage.list_dir(&source_dir) {
        Ok(names) => names,
        Err(e) => {
            info!("manifests not found for {}, continuing ({})", dir, e);
            staged.create_dir_all(&target_dir)?;
            return Ok(Rendered::Missing);
        }
    };

    staged.create_dir_all(&target_dir)?;

    for name in &names {
        let source = source_dir.join(name);
        let text = storage.read_to_string(&source)?;
        let rendered = template::render(&source.display().to_string(), &text, vars)?;

        debug!("Rendered {} -> {}", source.display(), target_dir.join(name).display());
        staged.add_file(target_dir.join(name), File::new(rendered))?;
    }

    Ok(Rendered::Files(names.len()))
}
