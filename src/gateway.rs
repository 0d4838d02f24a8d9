//! The only place the repository is mutated
//!
//! Deploys verify the tag's signature before anything touches the working
//! tree; tagging hands the assembled message to git for signing.

use tracing::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::Tag;
use crate::error::Result;
use crate::git::Repository;
use crate::inspector::Inspection;
use crate::planner::ReleasePlan;

/// Fetch tags from the configured remote before resolving a deploy target
///
/// A missing remote only produces a warning; a failing fetch is fatal.
pub fn refresh_tags<R: Repository>(repo: &R, config: &Config) -> Result<Option<BoundaryWarning>> {
    if !config.fetch {
        debug!("tag fetch disabled by configuration");
        return Ok(None);
    }

    if !repo.has_remote(&config.remote)? {
        return Ok(Some(BoundaryWarning::RemoteMissing {
            remote: config.remote.clone(),
        }));
    }

    repo.fetch_tags(&config.remote)?;
    info!(remote = %config.remote, "fetched tags");
    Ok(None)
}

/// Verify `tag` and check it out, leaving HEAD detached
///
/// Returns the warnings raised on the way. Verification failure aborts
/// before the working tree is touched.
pub fn deploy<R: Repository>(
    repo: &R,
    tag: &Tag,
    inspection: &Inspection,
) -> Result<Vec<BoundaryWarning>> {
    let name = tag.name();
    repo.verify_tag(&name)?;
    info!(tag = %name, "signature verified");

    let mut warnings = Vec::new();

    let already_there = inspection
        .nearest
        .as_ref()
        .is_some_and(|nearest| nearest.is_at_tag() && nearest.tag() == *tag);
    if already_there {
        warnings.push(BoundaryWarning::AlreadyAtTag { tag: name.clone() });
    }

    if let Some(branch) = &inspection.state.branch {
        warnings.push(BoundaryWarning::DetachingBranch {
            branch: branch.clone(),
            tag: name.clone(),
        });
    }

    repo.checkout_tag(&name)?;
    info!(tag = %name, "checked out");
    Ok(warnings)
}

/// Create the signed tag described by `plan`
pub fn publish<R: Repository>(repo: &R, plan: &ReleasePlan, config: &Config) -> Result<()> {
    let name = plan.tag_name();
    repo.create_signed_tag(&name, &plan.message(), config.signing_key.as_deref())?;
    info!(tag = %name, commit = %plan.commit, "created signed tag");
    Ok(())
}
