//! Command dispatch
//!
//! Maps an operation token onto the tagging or deploy path. Dispatch happens
//! in two phases: the checkout is inspected first, then symbolic requests
//! (no token, `defer`) are resolved to a concrete operation.

use tracing::info;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{CheckoutState, Tag, Version};
use crate::error::{ReleaseError, Result};
use crate::gateway;
use crate::git::Repository;
use crate::inspector::{self, Inspection};
use crate::planner::{self, Intent, ReleasePlan};
use crate::resolver::{self, DeployTarget};

/// A tagging request before the checkout has been inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRequest {
    Explicit(Intent),
    /// `match` on a forked branch, `patch` otherwise
    Defer,
}

impl TagRequest {
    pub fn resolve(self, state: &CheckoutState) -> Intent {
        match self {
            TagRequest::Explicit(intent) => intent,
            TagRequest::Defer if state.forked => Intent::Match,
            TagRequest::Defer => Intent::Patch,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Tag(TagRequest),
    Deploy(DeployTarget),
}

fn parse_ordinal(command: &str, name: &str, text: &str) -> Result<u32> {
    text.parse::<u32>().map_err(|_| {
        ReleaseError::invalid_arguments(
            command,
            format!("{} version '{}' is not a non-negative integer", name, text),
        )
    })
}

impl Operation {
    /// Parse a command token and its arguments
    ///
    /// # Errors
    /// * `UnrecognizedCommand` - unknown token
    /// * `InvalidArguments` - wrong argument count or unparsable version
    pub fn parse<S: AsRef<str>>(token: &str, args: &[S]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();

        let expect_args = |count: usize, usage: &str| -> Result<()> {
            if args.len() == count {
                Ok(())
            } else {
                Err(ReleaseError::invalid_arguments(
                    token,
                    format!("usage: {} (got {} argument(s))", usage, args.len()),
                ))
            }
        };

        let simple = match token {
            "init" => Some(Operation::Tag(TagRequest::Explicit(Intent::Init))),
            "patch" => Some(Operation::Tag(TagRequest::Explicit(Intent::Patch))),
            "minor" => Some(Operation::Tag(TagRequest::Explicit(Intent::Minor))),
            "major" => Some(Operation::Tag(TagRequest::Explicit(Intent::Major))),
            "match" => Some(Operation::Tag(TagRequest::Explicit(Intent::Match))),
            "defer" => Some(Operation::Tag(TagRequest::Defer)),
            "sync" => Some(Operation::Deploy(DeployTarget::Sync)),
            "next" => Some(Operation::Deploy(DeployTarget::Next)),
            "prev" => Some(Operation::Deploy(DeployTarget::Prev)),
            _ => None,
        };

        if let Some(operation) = simple {
            expect_args(0, token)?;
            return Ok(operation);
        }

        match token {
            "exact" => {
                expect_args(3, "exact <major> <minor> <patch>")?;
                let version = Version::new(
                    parse_ordinal(token, "major", args[0])?,
                    parse_ordinal(token, "minor", args[1])?,
                    parse_ordinal(token, "patch", args[2])?,
                );
                Ok(Operation::Tag(TagRequest::Explicit(Intent::Exact(version))))
            }
            "ver" => {
                expect_args(1, "ver <major.minor.patch>")?;
                Ok(Operation::Deploy(DeployTarget::Exact(Version::parse(args[0])?)))
            }
            other => Err(ReleaseError::UnrecognizedCommand(other.to_string())),
        }
    }

    /// `sync` on a detached deploy checkout, `defer` on a branch
    pub fn default_for(state: &CheckoutState) -> Self {
        if state.is_detached() {
            Operation::Deploy(DeployTarget::Sync)
        } else {
            Operation::Tag(TagRequest::Defer)
        }
    }
}

/// Arguments for the release workflow
///
/// Mirrors the CLI flags but stays independent of clap, so the workflow can
/// be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// `None` selects the default for the current checkout
    pub operation: Option<Operation>,

    /// Proceed even if the working tree or index is dirty
    pub allow_dirty: bool,
}

/// Result of a successful workflow
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Tagged {
        plan: ReleasePlan,
        warnings: Vec<BoundaryWarning>,
    },
    Deployed {
        tag: Tag,
        warnings: Vec<BoundaryWarning>,
    },
}

fn check_preconditions<R: Repository>(
    repo: &R,
    inspection: &Inspection,
    args: &ReleaseArgs,
) -> Result<Vec<BoundaryWarning>> {
    if !repo.is_writable()? {
        return Err(ReleaseError::WriteAccessDenied {
            path: repo.workdir().to_path_buf(),
        });
    }

    let mut warnings = Vec::new();
    if inspection.state.dirty {
        if !args.allow_dirty {
            return Err(ReleaseError::DirtyWorkingTree);
        }
        warnings.push(BoundaryWarning::DirtyOverride);
    }

    Ok(warnings)
}

/// Main release workflow
///
/// Orchestrates one invocation:
/// 1. Inspect the checkout
/// 2. Pick the operation (explicit, or the default for this checkout)
/// 3. Enforce writability and a clean tree
/// 4. Tagging: plan the release and create the signed tag
/// 5. Deploy: fetch tags, resolve the target, verify and check it out
///
/// Either the single tag-create or the single checkout happens, or the
/// repository is left untouched.
pub fn run_release_workflow<R: Repository>(
    repo: &R,
    config: &Config,
    args: &ReleaseArgs,
) -> Result<Outcome> {
    let inspection = inspector::inspect(repo)?;

    let operation = args
        .operation
        .unwrap_or_else(|| Operation::default_for(&inspection.state));
    info!(?operation, "dispatching");

    let mut warnings = check_preconditions(repo, &inspection, args)?;

    match operation {
        Operation::Tag(request) => {
            let intent = request.resolve(&inspection.state);
            info!(%intent, "resolved tagging intent");

            let plan = planner::plan(intent, &inspection)?;
            gateway::publish(repo, &plan, config)?;
            Ok(Outcome::Tagged { plan, warnings })
        }
        Operation::Deploy(target) => {
            warnings.extend(gateway::refresh_tags(repo, config)?);

            let tag = resolver::resolve(repo, target, &inspection)?;
            warnings.extend(gateway::deploy(repo, &tag, &inspection)?);
            Ok(Outcome::Deployed { tag, warnings })
        }
    }
}
