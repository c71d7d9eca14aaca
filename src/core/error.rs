//! Domain-specific error types and error handling utilities.
//!
//! This module defines the three error families used by git-conductor:
//!
//! - [`ConductorError`]: crate-level failures (repository discovery, I/O, configuration,
//!   a second operation on a busy repository). These are returned as `Err`.
//! - [`BackendError`]: a single VCS primitive failed. Carries a [`BackendErrorKind`] so the
//!   orchestrator can tell a non-fast-forward rejection or a conflict apart from a plain
//!   failure without parsing strings itself.
//! - [`PreconditionError`]: an operation was rejected before any backend call.
//!
//! Backend and precondition errors are part of an operation's reported outcome, not of
//! its `Result`.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-level error type for git-conductor
#[derive(Error, Debug)]
pub enum ConductorError {
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Could not find configuration directory")]
    ConfigDirectoryNotFound,

    #[error("Another operation is already running on '{path}'")]
    OperationInProgress { path: PathBuf },

    #[error("Repository '{path}' is not open")]
    RepositoryNotOpen { path: PathBuf },

    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("No files or indices provided")]
    NothingSelected,

    #[error("Invalid selection '{input}': {reason}")]
    InvalidSelection { input: String, reason: String },

    #[error("Index {index} is out of range (1-{max} available)")]
    IndexOutOfRange { index: usize, max: usize },

    #[error("No changed files to select from")]
    NoFilesAvailable,
}

/// Convenience type alias for Results using ConductorError
pub type Result<T> = std::result::Result<T, ConductorError>;

impl ConductorError {
    /// Create a configuration error with a specific message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn operation_in_progress(path: impl Into<PathBuf>) -> Self {
        Self::OperationInProgress { path: path.into() }
    }

    pub fn repository_not_open(path: impl Into<PathBuf>) -> Self {
        Self::RepositoryNotOpen { path: path.into() }
    }

    pub fn invalid_selection(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn index_out_of_range(index: usize, max: usize) -> Self {
        Self::IndexOutOfRange { index, max }
    }
}

/// How a backend primitive failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// The remote refused a push because it has commits the local branch lacks
    NonFastForward,
    /// The operation stopped with conflicted files in the working tree
    Conflict(Vec<PathBuf>),
    /// `git commit` found nothing to record
    NothingToCommit,
    Other,
}

/// Failure of a single VCS backend call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

/// Result type for VCS backend primitives
pub type BackendResult<T> = std::result::Result<T, BackendError>;

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Other, message)
    }

    pub fn non_fast_forward(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::NonFastForward, message)
    }

    pub fn conflict(paths: Vec<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Conflict(paths), message)
    }

    pub fn is_non_fast_forward(&self) -> bool {
        self.kind == BackendErrorKind::NonFastForward
    }

    /// Conflicted paths, if this error is a conflict
    pub fn conflicts(&self) -> Option<&[PathBuf]> {
        match &self.kind {
            BackendErrorKind::Conflict(paths) => Some(paths),
            _ => None,
        }
    }
}

impl From<git2::Error> for BackendError {
    fn from(err: git2::Error) -> Self {
        Self::other(err.message().to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self::other(format!("failed to run git: {err}"))
    }
}

/// An operation rejected before any backend call was issued
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Commit message cannot be empty")]
    EmptyMessage,

    #[error("There are no staged changes to commit")]
    NothingStaged,

    #[error("Squash needs at least 2 commits (got {count})")]
    SquashCountTooSmall { count: usize },

    #[error("Tag name cannot be empty")]
    EmptyTagName,

    #[error("Commit hash cannot be empty")]
    EmptyCommitHash,

    #[error("Branch name cannot be empty")]
    EmptyBranchName,

    #[error("Cannot delete the current branch '{name}'")]
    CurrentBranch { name: String },

    #[error("No branch is checked out (detached HEAD)")]
    DetachedHead,
}

impl PreconditionError {
    pub fn squash_count_too_small(count: usize) -> Self {
        Self::SquashCountTooSmall { count }
    }

    pub fn current_branch(name: impl Into<String>) -> Self {
        Self::CurrentBranch { name: name.into() }
    }
}
