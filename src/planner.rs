//! Computing the next release tag and its message

use std::fmt;

use tracing::debug;

use crate::domain::{Tag, Version, VersionBump, VersionDescriptor};
use crate::error::{ReleaseError, Result};
use crate::inspector::Inspection;

/// A concrete tagging intent
///
/// `defer` never reaches this type; the dispatcher turns it into `Match` or
/// `Patch` once the checkout has been inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Init,
    Patch,
    Minor,
    Major,
    /// Claim the nearest tag's version under the current branch's prefix
    Match,
    /// Use these ordinals verbatim
    Exact(Version),
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Init => write!(f, "init"),
            Intent::Patch => write!(f, "patch"),
            Intent::Minor => write!(f, "minor"),
            Intent::Major => write!(f, "major"),
            Intent::Match => write!(f, "match"),
            Intent::Exact(version) => write!(f, "exact {}", version),
        }
    }
}

/// The tag to create and the message to sign into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub tag: Tag,
    /// Commit the tag will point at
    pub commit: String,
    pub message_lines: Vec<String>,
}

impl ReleasePlan {
    pub fn tag_name(&self) -> String {
        self.tag.name()
    }

    pub fn message(&self) -> String {
        self.message_lines.join("\n")
    }
}

fn require_nearest<'a>(
    intent: Intent,
    nearest: Option<&'a VersionDescriptor>,
    branch: &str,
) -> Result<&'a VersionDescriptor> {
    nearest.ok_or_else(|| {
        ReleaseError::tag_not_found(format!(
            "'{}' needs a prior release tag reachable from '{}'; run 'init' first",
            intent, branch
        ))
    })
}

fn require_changes(nearest: &VersionDescriptor) -> Result<()> {
    if nearest.distance == 0 {
        return Err(ReleaseError::NoChanges {
            tag: nearest.tag_name(),
        });
    }
    Ok(())
}

/// Render descriptor fields as `field: value` lines, ending with the new tag
///
/// Ordinals are left out; they are already encoded in the tag name.
fn message_lines(nearest: Option<&VersionDescriptor>, head: &str, tag: &Tag) -> Vec<String> {
    let mut fields: Vec<(&str, String)> = Vec::new();

    match nearest {
        Some(nearest) => {
            fields.push(("prior", nearest.tag_name()));
            fields.push(("prefix", nearest.prefix.clone()));
            fields.push(("distance", nearest.distance.to_string()));
            fields.push(("commit", nearest.commit.clone()));
        }
        None => fields.push(("commit", head.to_string())),
    }

    let mut lines: Vec<String> = fields
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(field, value)| format!("{}: {}", field, value))
        .collect();
    lines.push(format!("tagname: {}", tag));
    lines
}

/// Compute the release plan for an intent
///
/// # Errors
/// * `DetachedHead` - no branch to take the prefix from
/// * `TagNotFound` - an incremental intent with no prior release
/// * `NoChanges` - nothing committed since the nearest tag
/// * `MatchNotMeaningful` - `match` on a branch that was not forked
/// * `InvalidPrefix` - the branch name would not parse back out of a tag
/// * `VersionOverflow` - the bumped ordinal does not fit
pub fn plan(intent: Intent, inspection: &Inspection) -> Result<ReleasePlan> {
    let branch = inspection
        .state
        .branch
        .as_deref()
        .ok_or(ReleaseError::DetachedHead)?;
    if !Tag::is_valid_prefix(branch) {
        return Err(ReleaseError::InvalidPrefix {
            branch: branch.to_string(),
        });
    }
    let nearest = inspection.nearest.as_ref();

    let version = match intent {
        Intent::Init => Version::default(),
        Intent::Patch | Intent::Minor | Intent::Major => {
            let nearest = require_nearest(intent, nearest, branch)?;
            require_changes(nearest)?;
            let bump = match intent {
                Intent::Major => VersionBump::Major,
                Intent::Minor => VersionBump::Minor,
                _ => VersionBump::Patch,
            };
            nearest
                .version
                .bump(bump)
                .ok_or_else(|| ReleaseError::VersionOverflow {
                    tag: nearest.tag_name(),
                })?
        }
        Intent::Match => {
            if !inspection.state.forked {
                return Err(ReleaseError::MatchNotMeaningful {
                    branch: branch.to_string(),
                });
            }
            require_nearest(intent, nearest, branch)?.version
        }
        Intent::Exact(version) => {
            if let Some(nearest) = nearest {
                require_changes(nearest)?;
            }
            version
        }
    };

    let tag = Tag::new(branch, version);
    let commit = nearest
        .map(|nearest| nearest.commit.clone())
        .unwrap_or_else(|| inspection.head.clone());
    let message_lines = message_lines(nearest, &inspection.head, &tag);

    debug!(%intent, tag = %tag, "planned release");
    Ok(ReleasePlan {
        tag,
        commit,
        message_lines,
    })
}
