use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-release operations
///
/// Every variant is terminal for the current invocation; nothing is retried.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Not a repository root: {}", path.display())]
    NotARepository { path: PathBuf },

    #[error("Repository is not writable: {}", path.display())]
    WriteAccessDenied { path: PathBuf },

    #[error("Working tree or index has uncommitted changes (use --dirty to override)")]
    DirtyWorkingTree,

    #[error("Malformed descriptor: '{0}'")]
    MalformedDescriptor(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("HEAD is detached; check out a branch to create release tags")]
    DetachedHead,

    #[error("No new commits since tag '{tag}'")]
    NoChanges { tag: String },

    #[error("Branch '{branch}' is not forked from another prefix; nothing to match")]
    MatchNotMeaningful { branch: String },

    #[error("Branch '{branch}' cannot prefix release tags; use only letters, digits, '_', '/' and '-'")]
    InvalidPrefix { branch: String },

    #[error("Cannot bump '{tag}': version ordinal overflows")]
    VersionOverflow { tag: String },

    #[error("Signature verification failed for tag '{tag}': {reason}")]
    SignatureVerificationFailed { tag: String, reason: String },

    #[error("Failed to create tag '{tag}': {reason}")]
    TagCreationFailed { tag: String, reason: String },

    #[error("Failed to check out tag '{tag}': {reason}")]
    CheckoutFailed { tag: String, reason: String },

    #[error("Failed to fetch tags from remote '{remote}': {reason}")]
    FetchFailed { remote: String, reason: String },

    #[error("Unrecognized command: '{0}'")]
    UnrecognizedCommand(String),

    #[error("Invalid arguments for '{command}': {reason}")]
    InvalidArguments { command: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    pub fn tag_not_found(msg: impl Into<String>) -> Self {
        ReleaseError::TagNotFound(msg.into())
    }

    pub fn invalid_arguments(command: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::InvalidArguments {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
