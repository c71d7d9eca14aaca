//! Git repository management and setup utilities
//!
//! Every helper shells out to the real `git` binary so the repositories look exactly like
//! the ones users have. Repositories are created with `main` as the initial branch.

#![allow(dead_code)]

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A temporary repository. `temp_dir` must stay alive for the duration of the test.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Run git in `dir`, failing the test on a non-zero exit
pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn configure_identity(dir: &Path) -> Result<()> {
    git(dir, &["config", "user.name", "Test User"])?;
    git(dir, &["config", "user.email", "test@example.com"])?;
    git(dir, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Fresh repository on `main` with a local identity configured
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().to_path_buf();

    git(&path, &["init", "-q", "-b", "main"])?;
    configure_identity(&path)?;

    Ok(TestRepo { temp_dir, path })
}

/// Repository with `initial.txt` committed as "Initial commit"
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    create_file(&repo.path, "initial.txt", "initial content\n")?;
    git_add(&repo.path, "initial.txt")?;
    git_commit(&repo.path, "Initial commit")?;
    Ok(repo)
}

/// Bare repository usable as a push/pull remote
pub fn setup_bare_remote() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().to_path_buf();
    git(&path, &["init", "-q", "--bare", "-b", "main"])?;
    Ok(TestRepo { temp_dir, path })
}

/// Clone `remote` into a fresh temporary directory
pub fn clone_repo(remote: &Path) -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("work");
    let remote = remote.to_string_lossy().to_string();
    let target = path.to_string_lossy().to_string();
    git(temp_dir.path(), &["clone", "-q", &remote, &target])?;
    configure_identity(&path)?;
    Ok(TestRepo { temp_dir, path })
}

pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn read_file(repo_path: &Path, filename: &str) -> Result<String> {
    Ok(fs::read_to_string(repo_path.join(filename))?)
}

pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    git(repo_path, &["add", filename])?;
    Ok(())
}

pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "-q", "-m", message])?;
    Ok(())
}

/// Write, stage and commit one file
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> Result<()> {
    create_file(repo_path, filename, content)?;
    git_add(repo_path, filename)?;
    git_commit(repo_path, message)
}

/// Subject line of the latest commit
pub fn head_subject(repo_path: &Path) -> Result<String> {
    git(repo_path, &["log", "-1", "--format=%s"])
}

pub fn commit_count(repo_path: &Path) -> Result<usize> {
    Ok(git(repo_path, &["rev-list", "--count", "HEAD"])?.parse()?)
}

pub fn stash_count(repo_path: &Path) -> Result<usize> {
    Ok(git(repo_path, &["stash", "list"])?
        .lines()
        .filter(|line| !line.is_empty())
        .count())
}
