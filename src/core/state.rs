//! Repository state data structures.
//!
//! These are the observable facts about one working copy as read from the VCS backend.
//! All of them are plain values: a refresh replaces them wholesale, nothing edits them in
//! place.

use crate::core::git_status::FileStatusKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identifies one working copy by filesystem path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryHandle {
    pub path: PathBuf,
    /// Account whose token is used for network operations
    pub identity: Option<String>,
}

impl RepositoryHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            identity: None,
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    pub path: PathBuf,
    pub status: FileStatusKind,
    pub staged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<PathBuf>,
}

impl FileStatus {
    pub fn new(path: impl Into<PathBuf>, status: FileStatusKind, staged: bool) -> Self {
        Self {
            path: path.into(),
            status,
            staged,
            old_path: None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status == FileStatusKind::Conflict
    }
}

/// Sort entries the way they are displayed and numbered
pub fn sort_file_statuses(files: &mut [FileStatus]) {
    files.sort_by(|a, b| {
        a.status
            .sort_priority(a.staged)
            .cmp(&b.status.sort_priority(b.staged))
            .then_with(|| a.path.cmp(&b.path))
    });
}

/// Whether any entry is staged for the next commit
pub fn has_staged_changes(files: &[FileStatus]) -> bool {
    files.iter().any(|f| f.staged)
}

/// Paths of all conflicted entries
pub fn conflicted_paths(files: &[FileStatus]) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|f| f.is_conflict())
        .map(|f| f.path.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    pub current: bool,
    pub remote: bool,
    /// Short hash of the branch tip
    pub last_commit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub hash: String,
    pub short_hash: String,
    pub message: String,
    pub author: String,
    pub email: String,
    pub date: DateTime<Utc>,
    pub refs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    pub date: DateTime<Utc>,
    pub message: String,
    pub hash: String,
}

/// Terminal outcome of a pull-then-push sync
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    pub pulled: bool,
    pub pushed: bool,
    pub conflicts: Vec<PathBuf>,
    pub error: Option<String>,
}

impl SyncResult {
    pub fn synced() -> Self {
        Self {
            success: true,
            pulled: true,
            pushed: true,
            ..Default::default()
        }
    }

    pub fn conflicted(conflicts: Vec<PathBuf>) -> Self {
        Self {
            conflicts,
            ..Default::default()
        }
    }

    pub fn failed(pulled: bool, error: impl Into<String>) -> Self {
        Self {
            pulled,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
