//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! primitives git-release is layered on, allowing for a real repository
//! implementation and an in-memory one for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: queries, checkout and fetch through the
//!   `git2` crate; signing and signature verification through the system
//!   `git` binary, which owns the user's GPG/SSH signing setup
//! - [mock::MockRepository]: an in-memory repository that records mutations
//!
//! # Usage
//!
//! Inspection, resolution and the gateway all take `&impl Repository`, so
//! the whole workflow can run against either implementation.
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_release::Result<()> {
//! if let Some(describe) = repo.describe()? {
//!     println!("nearest release: {}", describe);
//! }
//! let tags = repo.list_tags("master")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::Path;

/// Version-control operations consumed by git-release
///
/// Every call is synchronous and fallible. Implementations map their
/// underlying failures onto the matching [crate::error::ReleaseError]
/// variant (`TagCreationFailed`, `CheckoutFailed`, ...), so callers can
/// propagate with `?`.
pub trait Repository {
    /// Top-level working directory of the repository
    fn workdir(&self) -> &Path;

    /// Describe HEAD relative to the nearest release tag
    ///
    /// Returns the long form `<tag>-<distance>-g<full hash>`, or `None` when
    /// no release tag is reachable from HEAD (first release).
    fn describe(&self) -> Result<Option<String>>;

    /// Full hash of the commit HEAD points at
    fn head_commit(&self) -> Result<String>;

    /// Short name of the checked-out branch, `None` when HEAD is detached
    fn head_branch(&self) -> Result<Option<String>>;

    /// Whether tracked files differ from HEAD in the working tree or index
    fn is_dirty(&self) -> Result<bool>;

    /// Whether both the git directory and the working tree accept writes
    fn is_writable(&self) -> Result<bool>;

    /// Tag names matching `<prefix>-*`, in no particular order
    fn list_tags(&self, prefix: &str) -> Result<Vec<String>>;

    /// Create a signed, annotated tag on HEAD
    ///
    /// # Arguments
    /// * `name` - Name of the new tag
    /// * `message` - Full multi-line tag message
    /// * `signing_key` - Key id to sign with; the user's default key if `None`
    ///
    /// # Returns
    /// * `Ok(())` - Tag created
    /// * `Err(TagCreationFailed)` - Name collision, missing key, or signing refused
    fn create_signed_tag(&self, name: &str, message: &str, signing_key: Option<&str>)
        -> Result<()>;

    /// Verify the signature on a tag
    ///
    /// # Returns
    /// * `Ok(())` - Signature is good and trusted
    /// * `Err(SignatureVerificationFailed)` - Missing, bad, or untrusted signature
    fn verify_tag(&self, name: &str) -> Result<()>;

    /// Check out the commit a tag points at, leaving HEAD detached
    fn checkout_tag(&self, name: &str) -> Result<()>;

    /// Whether a remote with this name is configured
    fn has_remote(&self, remote: &str) -> Result<bool>;

    /// Fetch all tags from a remote
    fn fetch_tags(&self, remote: &str) -> Result<()>;
}
