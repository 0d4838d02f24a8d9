use crate::error::{ReleaseError, Result};
use git2::{DescribeFormatOptions, DescribeOptions, ErrorCode, Repository as Git2Repo};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Only tags shaped like releases take part in describe.
const RELEASE_TAG_GLOB: &str = "*-[0-9]*.[0-9]*.[0-9]*";

/// Length of a full SHA-1 hash; describe is asked for unabbreviated ids.
const FULL_HASH_LEN: u32 = 40;

/// Repository backed by git2, with the system `git` binary for signing
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl Git2Repository {
    /// Open the repository whose top-level working directory is `path`
    ///
    /// Unlike discovery, this refuses subdirectories and bare repositories:
    /// release operations must run from the repository root.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let not_a_repo = || ReleaseError::NotARepository {
            path: path.to_path_buf(),
        };

        let repo = Git2Repo::open(path).map_err(|_| not_a_repo())?;
        let workdir = repo.workdir().ok_or_else(not_a_repo)?.to_path_buf();

        let expected = fs::canonicalize(path)?;
        if fs::canonicalize(&workdir)? != expected {
            return Err(not_a_repo());
        }

        debug!(workdir = %workdir.display(), "opened repository");
        Ok(Git2Repository { repo, workdir })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let workdir = repo
            .workdir()
            .ok_or_else(|| ReleaseError::NotARepository {
                path: repo.path().to_path_buf(),
            })?
            .to_path_buf();

        Ok(Git2Repository { repo, workdir })
    }

    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.workdir);
        cmd
    }

    fn run_git(&self, args: &[&str], stdin: Option<&str>) -> std::io::Result<Output> {
        debug!(?args, "running git");

        let mut cmd = self.git_cmd();
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes())?;
        }
        child.wait_with_output()
    }
}

fn stderr_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        stderr
    }
}

/// Errors that mean "this location refuses writes" rather than a fault
fn denies_writes(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem
    )
}

fn probe_writable(dir: &Path) -> Result<bool> {
    let probe = dir.join(format!(".git-release-probe-{}", std::process::id()));

    match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(_) => {
            fs::remove_file(&probe)?;
            Ok(true)
        }
        Err(e) if denies_writes(e.kind()) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn describe(&self) -> Result<Option<String>> {
        let mut options = DescribeOptions::new();
        options.describe_tags().pattern(RELEASE_TAG_GLOB);

        let describe = match self.repo.describe(&options) {
            Ok(describe) => describe,
            Err(e) if e.code() == ErrorCode::NotFound || e.code() == ErrorCode::UnbornBranch => {
                debug!("no release tag reachable from HEAD");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut format = DescribeFormatOptions::new();
        format
            .abbreviated_size(FULL_HASH_LEN)
            .always_use_long_format(true);

        let text = describe.format(Some(&format))?;
        debug!(describe = %text, "described HEAD");
        Ok(Some(text))
    }

    fn head_commit(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn head_branch(&self) -> Result<Option<String>> {
        if self.repo.head_detached()? {
            return Ok(None);
        }

        let head = self.repo.find_reference("HEAD")?;
        Ok(head
            .symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string))
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = git2::StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        let dirty = statuses
            .iter()
            .any(|entry| entry.status() != git2::Status::CURRENT);

        debug!(dirty, "checked working tree");
        Ok(dirty)
    }

    fn is_writable(&self) -> Result<bool> {
        Ok(probe_writable(self.repo.path())? && probe_writable(&self.workdir)?)
    }

    fn list_tags(&self, prefix: &str) -> Result<Vec<String>> {
        let pattern = format!("{}-*", prefix);
        let tags = self.repo.tag_names(Some(&pattern))?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn create_signed_tag(
        &self,
        name: &str,
        message: &str,
        signing_key: Option<&str>,
    ) -> Result<()> {
        let mut args = vec!["tag", "-s"];
        if let Some(key) = signing_key {
            args.extend(["-u", key]);
        }
        args.extend(["-F", "-", name]);

        let output = self.run_git(&args, Some(message)).map_err(|e| {
            ReleaseError::TagCreationFailed {
                tag: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !output.status.success() {
            return Err(ReleaseError::TagCreationFailed {
                tag: name.to_string(),
                reason: stderr_reason(&output),
            });
        }

        Ok(())
    }

    fn verify_tag(&self, name: &str) -> Result<()> {
        let output = self.run_git(&["verify-tag", name], None).map_err(|e| {
            ReleaseError::SignatureVerificationFailed {
                tag: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !output.status.success() {
            return Err(ReleaseError::SignatureVerificationFailed {
                tag: name.to_string(),
                reason: stderr_reason(&output),
            });
        }

        Ok(())
    }

    fn checkout_tag(&self, name: &str) -> Result<()> {
        let failed = |e: git2::Error| ReleaseError::CheckoutFailed {
            tag: name.to_string(),
            reason: e.message().to_string(),
        };

        let commit = self
            .repo
            .find_reference(&format!("refs/tags/{}", name))
            .and_then(|reference| reference.peel_to_commit())
            .map_err(failed)?;

        let mut builder = git2::build::CheckoutBuilder::new();
        builder.safe();

        self.repo
            .checkout_tree(commit.as_object(), Some(&mut builder))
            .map_err(failed)?;
        self.repo.set_head_detached(commit.id()).map_err(failed)?;

        debug!(tag = name, commit = %commit.id(), "checked out tag");
        Ok(())
    }

    fn has_remote(&self, remote: &str) -> Result<bool> {
        match self.repo.find_remote(remote) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) if e.class() == git2::ErrorClass::Config => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn fetch_tags(&self, remote_name: &str) -> Result<()> {
        let fetch_failed = |e: git2::Error| ReleaseError::FetchFailed {
            remote: remote_name.to_string(),
            reason: e.message().to_string(),
        };

        let mut remote = self.repo.find_remote(remote_name).map_err(fetch_failed)?;

        let mut callbacks = git2::RemoteCallbacks::new();
        let mut attempts = 0;
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            attempts += 1;
            if attempts > 4 {
                return Err(git2::Error::from_str("no usable credentials"));
            }

            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if attempts == 1 {
                    if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                        return Ok(cred);
                    }
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_ecdsa", "id_rsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        debug!(remote = remote_name, "fetching tags");
        remote
            .fetch(
                &["+refs/tags/*:refs/tags/*"],
                Some(&mut fetch_options),
                None,
            )
            .map_err(fetch_failed)?;

        Ok(())
    }
}
