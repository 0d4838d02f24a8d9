use super::VersionDescriptor;

/// What the current checkout looks like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutState {
    /// `None` when HEAD is detached
    pub branch: Option<String>,
    pub dirty: bool,
    /// Branch name differs from the nearest tag's prefix
    pub forked: bool,
}

impl CheckoutState {
    pub fn new(branch: Option<String>, dirty: bool, nearest: Option<&VersionDescriptor>) -> Self {
        let forked = match (&branch, nearest) {
            (Some(branch), Some(nearest)) => *branch != nearest.prefix,
            _ => false,
        };

        CheckoutState {
            branch,
            dirty,
            forked,
        }
    }

    pub fn is_detached(&self) -> bool {
        self.branch.is_none()
    }
}
