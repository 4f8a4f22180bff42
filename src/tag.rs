//! Story tag calculation
//!
//! Every artifact built in one run shares a single content tag derived from
//! the head commit of each project on the story's branch:
//!
//! ```text
//! <story>-<project>-<shorthash>-<project>-<shorthash>...
//! ```
//!
//! The per-project `<project>-<shorthash>` strings are sorted before joining,
//! so the tag only changes when the project set or a head commit changes.

use crate::error::{Error, Result};
use crate::git::HeadRefs;
use crate::story::Story;

/// Number of commit id characters kept per project
pub const SHORT_HASH_LEN: usize = 7;

/// Compute the story tag
///
/// Only projects participating in the source tree contribute. Fails on the
/// first project whose head cannot be read; no partial tag is ever returned.
pub fn calculate<R: HeadRefs + ?Sized>(story: &Story, refs: &R) -> Result<String> {
    let mut hashes = Vec::with_capacity(story.projects.len());

    for project in story.participating_names() {
        let sha = refs.head_ref(project, &story.name)?;
        let short = sha.get(..SHORT_HASH_LEN).ok_or_else(|| Error::HeadRef {
            project: project.to_string(),
            branch: story.name.clone(),
            message: format!("'{}' is too short to be a commit id", sha),
        })?;
        hashes.push(format!("{}-{}", project, short));
    }

    hashes.sort();

    Ok(format!("{}-{}", story.name, hashes.join("-")))
}

/// Skaffold env-template tag policy for a calculated tag
pub fn tag_template(tag: &str) -> String {
    format!("{{{{.IMAGE_NAME}}}}:{}", tag)
}
