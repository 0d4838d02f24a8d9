// tests/repository_test.rs
use std::fs;
use std::path::Path;

use git2::{Oid, Repository as Git2Repo, RepositoryInitOptions, Signature};
use git_release::cli::{run_release_workflow, Operation, ReleaseArgs};
use git_release::config::Config;
use git_release::domain::VersionDescriptor;
use git_release::git::{Git2Repository, Repository};
use git_release::resolver::DeployTarget;
use git_release::ReleaseError;
use tempfile::TempDir;

fn init_repo(dir: &Path) -> Git2Repo {
    let mut options = RepositoryInitOptions::new();
    options.initial_head("master");
    Git2Repo::init_opts(dir, &options).unwrap()
}

fn commit_file(repo: &Git2Repo, name: &str, content: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    fs::write(workdir.join(name), content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let signature = Signature::now("Release Tester", "tester@example.com").unwrap();
    let parent = repo.head().ok().map(|head| head.peel_to_commit().unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        &format!("update {}", name),
        &tree,
        &parents,
    )
    .unwrap()
}

fn tag_head(repo: &Git2Repo, name: &str) {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.tag_lightweight(name, head.as_object(), false).unwrap();
}

#[test]
fn test_describe_without_release_tags() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    commit_file(&git, "README", "hello");
    tag_head(&git, "not-a-release");

    let repo = Git2Repository::from_git2(git).unwrap();
    assert_eq!(repo.describe().unwrap(), None);
}

#[test]
fn test_describe_long_format() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    commit_file(&git, "README", "one");
    tag_head(&git, "master-0.0.0");
    commit_file(&git, "README", "two");
    let head = commit_file(&git, "README", "three");

    let repo = Git2Repository::from_git2(git).unwrap();
    let text = repo.describe().unwrap().unwrap();
    assert_eq!(text, format!("master-0.0.0-2-g{}", head));

    let descriptor = VersionDescriptor::parse(&text).unwrap();
    assert_eq!(descriptor.prefix, "master");
    assert_eq!(descriptor.distance, 2);
    assert_eq!(descriptor.commit, repo.head_commit().unwrap());
}

#[test]
fn test_describe_at_tag_has_zero_distance() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    let head = commit_file(&git, "README", "one");
    tag_head(&git, "master-1.2.3");

    let repo = Git2Repository::from_git2(git).unwrap();
    assert_eq!(
        repo.describe().unwrap(),
        Some(format!("master-1.2.3-0-g{}", head))
    );
}

#[test]
fn test_head_branch_and_detach() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    let tagged = commit_file(&git, "README", "one");
    tag_head(&git, "master-1.0.0");
    commit_file(&git, "README", "two");

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.head_branch().unwrap(), Some("master".to_string()));

    repo.checkout_tag("master-1.0.0").unwrap();
    assert_eq!(repo.head_branch().unwrap(), None);
    assert_eq!(repo.head_commit().unwrap(), tagged.to_string());
    assert_eq!(
        fs::read_to_string(dir.path().join("README")).unwrap(),
        "one"
    );
}

#[test]
fn test_checkout_missing_tag() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    commit_file(&git, "README", "one");

    let repo = Git2Repository::from_git2(git).unwrap();
    assert!(matches!(
        repo.checkout_tag("master-9.9.9"),
        Err(ReleaseError::CheckoutFailed { .. })
    ));
}

#[test]
fn test_dirty_ignores_untracked_files() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    commit_file(&git, "README", "one");

    let repo = Git2Repository::from_git2(git).unwrap();
    assert!(!repo.is_dirty().unwrap());

    fs::write(dir.path().join("scratch.txt"), "notes").unwrap();
    assert!(!repo.is_dirty().unwrap());

    fs::write(dir.path().join("README"), "changed").unwrap();
    assert!(repo.is_dirty().unwrap());
}

#[test]
fn test_list_tags_by_prefix() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    commit_file(&git, "README", "one");
    tag_head(&git, "master-1.0.0");
    tag_head(&git, "master-1.1.0");
    tag_head(&git, "develop-0.1.0");

    let repo = Git2Repository::from_git2(git).unwrap();
    let mut tags = repo.list_tags("master").unwrap();
    tags.sort();
    assert_eq!(tags, vec!["master-1.0.0", "master-1.1.0"]);
}

#[test]
fn test_fresh_repository_is_writable() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert!(repo.is_writable().unwrap());
}

#[test]
fn test_fetch_tags_from_local_remote() {
    let upstream_dir = TempDir::new().unwrap();
    let upstream = init_repo(upstream_dir.path());
    commit_file(&upstream, "README", "one");
    tag_head(&upstream, "master-1.0.0");

    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    git.remote("origin", upstream_dir.path().to_str().unwrap())
        .unwrap();

    let repo = Git2Repository::from_git2(git).unwrap();
    assert!(repo.has_remote("origin").unwrap());
    assert!(!repo.has_remote("upstream").unwrap());

    repo.fetch_tags("origin").unwrap();
    assert_eq!(repo.list_tags("master").unwrap(), vec!["master-1.0.0"]);
}

#[test]
fn test_lightweight_tag_fails_verification() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    commit_file(&git, "README", "one");
    tag_head(&git, "master-1.0.0");

    let repo = Git2Repository::from_git2(git).unwrap();
    assert!(matches!(
        repo.verify_tag("master-1.0.0"),
        Err(ReleaseError::SignatureVerificationFailed { .. })
    ));
}

#[test]
fn test_unsigned_deploy_leaves_branch_checked_out() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    commit_file(&git, "README", "one");
    tag_head(&git, "master-1.0.0");
    commit_file(&git, "README", "two");

    let repo = Git2Repository::from_git2(git).unwrap();
    let config = Config {
        fetch: false,
        ..Config::default()
    };
    let args = ReleaseArgs {
        operation: Some(Operation::Deploy(DeployTarget::Sync)),
        allow_dirty: false,
    };

    let result = run_release_workflow(&repo, &config, &args);
    assert!(matches!(
        result,
        Err(ReleaseError::SignatureVerificationFailed { .. })
    ));
    assert_eq!(repo.head_branch().unwrap(), Some("master".to_string()));
    assert_eq!(
        fs::read_to_string(dir.path().join("README")).unwrap(),
        "two"
    );
}
