//! Read-only inspection of the current checkout
//!
//! One pass over the repository gathers everything later stages need: the
//! branch (if any), dirty state, the nearest release descriptor and the head
//! commit. Nothing is mutated here.

use tracing::debug;

use crate::domain::{CheckoutState, VersionDescriptor};
use crate::error::Result;
use crate::git::Repository;

/// Everything learned about the checkout in a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub state: CheckoutState,
    /// `None` before the first release
    pub nearest: Option<VersionDescriptor>,
    /// Full hash of HEAD
    pub head: String,
}

/// Inspect the repository's current checkout
pub fn inspect<R: Repository>(repo: &R) -> Result<Inspection> {
    let branch = repo.head_branch()?;
    let dirty = repo.is_dirty()?;
    let head = repo.head_commit()?;

    let nearest = match repo.describe()? {
        Some(text) => Some(VersionDescriptor::parse(&text)?),
        None => None,
    };

    let state = CheckoutState::new(branch, dirty, nearest.as_ref());
    debug!(
        branch = ?state.branch,
        dirty = state.dirty,
        forked = state.forked,
        nearest = ?nearest.as_ref().map(VersionDescriptor::tag_name),
        "inspected checkout"
    );

    Ok(Inspection {
        state,
        nearest,
        head,
    })
}
