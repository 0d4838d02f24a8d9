use std::fmt;

/// Non-fatal conditions met while tagging or deploying.
/// These are reported to the user; the operation still goes ahead.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// HEAD already sits on the tag being checked out
    AlreadyAtTag { tag: String },
    /// A branch is checked out and the deploy will detach from it
    DetachingBranch { branch: String, tag: String },
    /// Uncommitted changes were allowed through with `--dirty`
    DirtyOverride,
    /// The configured remote does not exist, so tags were not fetched
    RemoteMissing { remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::AlreadyAtTag { tag } => {
                write!(f, "HEAD is already at '{}'; checking it out again", tag)
            }
            BoundaryWarning::DetachingBranch { branch, tag } => {
                write!(
                    f,
                    "Branch '{}' is checked out; detaching HEAD to deploy '{}'",
                    branch, tag
                )
            }
            BoundaryWarning::DirtyOverride => {
                write!(f, "Proceeding with uncommitted changes (--dirty)")
            }
            BoundaryWarning::RemoteMissing { remote } => {
                write!(
                    f,
                    "Remote '{}' is not configured; using local tags only",
                    remote
                )
            }
        }
    }
}
