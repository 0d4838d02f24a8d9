use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// A tag created through [Repository::create_signed_tag]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub name: String,
    pub message: String,
    pub signing_key: Option<String>,
}

/// Mock repository for testing without actual git operations
///
/// Tags map to the commit they point at. Mutations are recorded so tests can
/// assert on exactly what would have happened to a real repository.
pub struct MockRepository {
    workdir: PathBuf,
    head: String,
    branch: Option<String>,
    describe: Option<String>,
    dirty: bool,
    writable: bool,
    remotes: HashSet<String>,
    fetch_error: Option<String>,
    unsigned: HashSet<String>,
    tags: RefCell<BTreeMap<String, String>>,
    created: RefCell<Vec<CreatedTag>>,
    checkouts: RefCell<Vec<String>>,
    fetches: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new mock repository with HEAD at `head` on branch `master`
    pub fn new(head: impl Into<String>) -> Self {
        MockRepository {
            workdir: PathBuf::from("/mock/repo"),
            head: head.into(),
            branch: Some("master".to_string()),
            describe: None,
            dirty: false,
            writable: true,
            remotes: HashSet::new(),
            fetch_error: None,
            unsigned: HashSet::new(),
            tags: RefCell::new(BTreeMap::new()),
            created: RefCell::new(Vec::new()),
            checkouts: RefCell::new(Vec::new()),
            fetches: RefCell::new(Vec::new()),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn detached(mut self) -> Self {
        self.branch = None;
        self
    }

    /// Set the raw describe output for HEAD
    pub fn with_describe(mut self, describe: impl Into<String>) -> Self {
        self.describe = Some(describe.into());
        self
    }

    /// Point HEAD `distance` commits past `tag`, setting describe accordingly
    pub fn at_distance(mut self, tag: &str, distance: u32) -> Self {
        self.describe = Some(format!("{}-{}-g{}", tag, distance, self.head));
        self
    }

    pub fn with_tag(self, name: impl Into<String>, commit: impl Into<String>) -> Self {
        self.tags.borrow_mut().insert(name.into(), commit.into());
        self
    }

    pub fn with_tags(self, names: &[&str]) -> Self {
        for name in names {
            self.tags
                .borrow_mut()
                .insert(name.to_string(), format!("commit-of-{}", name));
        }
        self
    }

    pub fn dirty(mut self) -> Self {
        self.dirty = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remotes.insert(remote.into());
        self
    }

    pub fn failing_fetch(mut self, reason: impl Into<String>) -> Self {
        self.fetch_error = Some(reason.into());
        self
    }

    /// Mark a tag as carrying no valid signature
    pub fn with_unsigned(mut self, name: impl Into<String>) -> Self {
        self.unsigned.insert(name.into());
        self
    }

    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.created.borrow().clone()
    }

    pub fn checkouts(&self) -> Vec<String> {
        self.checkouts.borrow().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }

    pub fn tag_commit(&self, name: &str) -> Option<String> {
        self.tags.borrow().get(name).cloned()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn describe(&self) -> Result<Option<String>> {
        Ok(self.describe.clone())
    }

    fn head_commit(&self) -> Result<String> {
        Ok(self.head.clone())
    }

    fn head_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn is_writable(&self) -> Result<bool> {
        Ok(self.writable)
    }

    fn list_tags(&self, prefix: &str) -> Result<Vec<String>> {
        let start = format!("{}-", prefix);
        Ok(self
            .tags
            .borrow()
            .keys()
            .filter(|name| name.starts_with(&start))
            .cloned()
            .collect())
    }

    fn create_signed_tag(
        &self,
        name: &str,
        message: &str,
        signing_key: Option<&str>,
    ) -> Result<()> {
        if self.tags.borrow().contains_key(name) {
            return Err(ReleaseError::TagCreationFailed {
                tag: name.to_string(),
                reason: "tag already exists".to_string(),
            });
        }

        self.tags
            .borrow_mut()
            .insert(name.to_string(), self.head.clone());
        self.created.borrow_mut().push(CreatedTag {
            name: name.to_string(),
            message: message.to_string(),
            signing_key: signing_key.map(str::to_string),
        });
        Ok(())
    }

    fn verify_tag(&self, name: &str) -> Result<()> {
        if !self.tags.borrow().contains_key(name) || self.unsigned.contains(name) {
            return Err(ReleaseError::SignatureVerificationFailed {
                tag: name.to_string(),
                reason: "no signature found".to_string(),
            });
        }
        Ok(())
    }

    fn checkout_tag(&self, name: &str) -> Result<()> {
        if !self.tags.borrow().contains_key(name) {
            return Err(ReleaseError::CheckoutFailed {
                tag: name.to_string(),
                reason: "no such tag".to_string(),
            });
        }
        self.checkouts.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn has_remote(&self, remote: &str) -> Result<bool> {
        Ok(self.remotes.contains(remote))
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        if let Some(reason) = &self.fetch_error {
            return Err(ReleaseError::FetchFailed {
                remote: remote.to_string(),
                reason: reason.clone(),
            });
        }
        self.fetches.borrow_mut().push(remote.to_string());
        Ok(())
    }
}
