//! The VCS backend capability.
//!
//! [`VcsBackend`] has one method per version-control primitive. Each call targets the
//! repository at `repo`, does exactly one thing and either succeeds or fails with a
//! [`BackendError`]. The orchestrator composes these calls; it never reaches past them into
//! the repository.

use crate::core::credentials::Token;
use crate::core::error::BackendResult;
use crate::core::state::{BranchInfo, CommitInfo, FileStatus, TagInfo};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOptions {
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub set_upstream: bool,
    pub force: bool,
}

impl PushOptions {
    pub fn to_remote(remote: impl Into<String>) -> Self {
        Self {
            remote: Some(remote.into()),
            ..Default::default()
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn set_upstream(mut self) -> Self {
        self.set_upstream = true;
        self
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Move the branch tip, keep changes staged
    Soft,
    /// Move the branch tip and discard index and working-tree changes
    Hard,
}

impl ResetMode {
    pub fn as_flag(&self) -> &'static str {
        match self {
            ResetMode::Soft => "--soft",
            ResetMode::Hard => "--hard",
        }
    }
}

/// Which side of a conflict wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictStrategy {
    Ours,
    Theirs,
}

impl ConflictStrategy {
    pub fn as_flag(&self) -> &'static str {
        match self {
            ConflictStrategy::Ours => "--ours",
            ConflictStrategy::Theirs => "--theirs",
        }
    }
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictStrategy::Ours => f.write_str("ours"),
            ConflictStrategy::Theirs => f.write_str("theirs"),
        }
    }
}

pub trait VcsBackend {
    fn status(&self, repo: &Path) -> BackendResult<Vec<FileStatus>>;
    fn stage(&self, repo: &Path, paths: &[PathBuf]) -> BackendResult<()>;
    fn unstage(&self, repo: &Path, paths: &[PathBuf]) -> BackendResult<()>;
    fn commit(&self, repo: &Path, message: &str) -> BackendResult<()>;
    fn push(&self, repo: &Path, options: &PushOptions, token: Option<&Token>)
        -> BackendResult<()>;
    fn pull(&self, repo: &Path, token: Option<&Token>) -> BackendResult<()>;

    /// Pull then push, stopping at the first failure
    fn sync(&self, repo: &Path, token: Option<&Token>) -> BackendResult<()> {
        self.pull(repo, token)?;
        self.push(repo, &PushOptions::default(), token)
    }

    fn checkout(&self, repo: &Path, branch: &str, create: bool) -> BackendResult<()>;

    /// Stash uncommitted changes, untracked files included. Returns `false` when there was
    /// nothing to save and no stash entry was created.
    fn stash(&self, repo: &Path) -> BackendResult<bool>;
    fn stash_pop(&self, repo: &Path) -> BackendResult<()>;
    fn merge(&self, repo: &Path, branch: &str) -> BackendResult<()>;
    fn rebase(&self, repo: &Path, branch: &str) -> BackendResult<()>;
    fn reset(&self, repo: &Path, mode: ResetMode, target: &str) -> BackendResult<()>;
    fn delete_branch(&self, repo: &Path, name: &str, force: bool) -> BackendResult<()>;
    fn create_tag(
        &self,
        repo: &Path,
        name: &str,
        message: Option<&str>,
        target: Option<&str>,
    ) -> BackendResult<()>;
    fn push_tag(
        &self,
        repo: &Path,
        remote: &str,
        name: &str,
        token: Option<&Token>,
    ) -> BackendResult<()>;
    fn delete_tag(&self, repo: &Path, name: &str) -> BackendResult<()>;
    fn cherry_pick(&self, repo: &Path, hash: &str) -> BackendResult<()>;
    fn squash_commits(&self, repo: &Path, count: usize, message: &str) -> BackendResult<()>;
    fn reword_commit(&self, repo: &Path, message: &str) -> BackendResult<()>;
    fn discard_file(&self, repo: &Path, path: &Path) -> BackendResult<()>;
    fn clean_file(&self, repo: &Path, path: &Path) -> BackendResult<()>;
    fn resolve_conflict(
        &self,
        repo: &Path,
        path: &Path,
        strategy: ConflictStrategy,
    ) -> BackendResult<()>;
    fn log(&self, repo: &Path, limit: usize) -> BackendResult<Vec<CommitInfo>>;
    fn branches(&self, repo: &Path) -> BackendResult<Vec<BranchInfo>>;
    fn tags(&self, repo: &Path) -> BackendResult<Vec<TagInfo>>;
    fn diff(&self, repo: &Path, path: &Path) -> BackendResult<String>;

    /// Name of the checked-out branch, `None` on a detached or unborn HEAD
    fn current_branch(&self, repo: &Path) -> BackendResult<Option<String>>;
}
