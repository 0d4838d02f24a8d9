//! Locating release tags relative to the current checkout

use std::fmt;

use tracing::debug;

use crate::domain::{Tag, Version};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::inspector::Inspection;

/// Which release a deploy checkout should move to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployTarget {
    /// The nearest tag
    Sync,
    Next,
    Prev,
    /// An exact version under the current prefix
    Exact(Version),
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployTarget::Sync => write!(f, "sync"),
            DeployTarget::Next => write!(f, "next"),
            DeployTarget::Prev => write!(f, "prev"),
            DeployTarget::Exact(version) => write!(f, "ver {}", version),
        }
    }
}

/// Release tags of one prefix in ascending version order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    prefix: String,
    tags: Vec<Tag>,
}

impl TagSet {
    /// Build a set from raw tag names
    ///
    /// Names that are not release tags of exactly `prefix` are dropped; a
    /// `master-*` listing may include `master-foo-1.0.0`, which belongs to
    /// the `master-foo` family.
    pub fn new<S: AsRef<str>>(prefix: &str, names: &[S]) -> Self {
        let mut tags: Vec<Tag> = names
            .iter()
            .filter_map(|name| Tag::parse(name.as_ref()))
            .filter(|tag| tag.prefix == prefix)
            .collect();
        tags.sort_by_key(|tag| tag.version);

        TagSet {
            prefix: prefix.to_string(),
            tags,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn newest(&self) -> Option<&Tag> {
        self.tags.last()
    }

    pub fn position(&self, version: Version) -> Option<usize> {
        self.tags.iter().position(|tag| tag.version == version)
    }

    fn require_position(&self, current: &Tag) -> Result<usize> {
        self.position(current.version).ok_or_else(|| {
            ReleaseError::tag_not_found(format!(
                "current tag '{}' is not among the '{}' tags",
                current, self.prefix
            ))
        })
    }

    /// The release after `current`
    pub fn successor(&self, current: &Tag) -> Result<&Tag> {
        let index = self.require_position(current)?;
        self.tags.get(index + 1).ok_or_else(|| {
            ReleaseError::tag_not_found(format!("no '{}' tag newer than '{}'", self.prefix, current))
        })
    }

    /// The release before `current`
    pub fn predecessor(&self, current: &Tag) -> Result<&Tag> {
        let index = self.require_position(current)?;
        index
            .checked_sub(1)
            .and_then(|i| self.tags.get(i))
            .ok_or_else(|| {
                ReleaseError::tag_not_found(format!(
                    "no '{}' tag older than '{}'",
                    self.prefix, current
                ))
            })
    }

    pub fn find_exact(&self, version: Version) -> Result<&Tag> {
        self.tags
            .iter()
            .find(|tag| tag.version == version)
            .ok_or_else(|| {
                ReleaseError::tag_not_found(format!("'{}-{}' does not exist", self.prefix, version))
            })
    }
}

/// Resolve a deploy target to a concrete tag
pub fn resolve<R: Repository>(
    repo: &R,
    target: DeployTarget,
    inspection: &Inspection,
) -> Result<Tag> {
    let nearest = inspection.nearest.as_ref().ok_or_else(|| {
        ReleaseError::tag_not_found(format!(
            "no release tag is reachable from HEAD ({})",
            target
        ))
    })?;

    let names = repo.list_tags(&nearest.prefix)?;
    let set = TagSet::new(&nearest.prefix, &names);
    debug!(prefix = set.prefix(), count = set.tags().len(), "listed release tags");

    if set.is_empty() {
        return Err(ReleaseError::tag_not_found(format!(
            "no tags match prefix '{}'",
            nearest.prefix
        )));
    }

    let current = nearest.tag();
    let tag = match target {
        DeployTarget::Sync => set.find_exact(current.version)?,
        DeployTarget::Next => set.successor(&current)?,
        DeployTarget::Prev => set.predecessor(&current)?,
        DeployTarget::Exact(version) => set.find_exact(version)?,
    };

    debug!(%target, tag = %tag, "resolved deploy target");
    Ok(tag.clone())
}
