//! Type-safe file status enumeration.
//!
//! [`FileStatusKind`] is the closed set of states a path can be in as far as the
//! orchestrator is concerned. It converts directly from `git2::Status` flags, split into
//! the index side (staged) and the working-tree side (unstaged), so one path with changes
//! on both sides produces two entries.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatusKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
    Conflict,
}

impl FileStatusKind {
    /// Index-side status, if the flags carry a staged change
    pub fn from_git2_staged(flags: git2::Status) -> Option<FileStatusKind> {
        if flags.contains(git2::Status::CONFLICTED) {
            // Conflicts are reported once, from the working-tree side
            return None;
        }
        if flags.contains(git2::Status::INDEX_NEW) {
            return Some(FileStatusKind::Added);
        }
        if flags.contains(git2::Status::INDEX_MODIFIED)
            || flags.contains(git2::Status::INDEX_TYPECHANGE)
        {
            return Some(FileStatusKind::Modified);
        }
        if flags.contains(git2::Status::INDEX_DELETED) {
            return Some(FileStatusKind::Deleted);
        }
        if flags.contains(git2::Status::INDEX_RENAMED) {
            return Some(FileStatusKind::Renamed);
        }

        None
    }

    /// Working-tree-side status, if the flags carry an unstaged change
    pub fn from_git2_unstaged(flags: git2::Status) -> Option<FileStatusKind> {
        if flags.contains(git2::Status::CONFLICTED) {
            return Some(FileStatusKind::Conflict);
        }
        if flags.contains(git2::Status::WT_NEW) {
            return Some(FileStatusKind::Untracked);
        }
        if flags.contains(git2::Status::WT_MODIFIED) || flags.contains(git2::Status::WT_TYPECHANGE)
        {
            return Some(FileStatusKind::Modified);
        }
        if flags.contains(git2::Status::WT_DELETED) {
            return Some(FileStatusKind::Deleted);
        }
        if flags.contains(git2::Status::WT_RENAMED) {
            return Some(FileStatusKind::Renamed);
        }

        None
    }

    /// Short code as shown by `git status --short`
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatusKind::Added => "A",
            FileStatusKind::Modified => "M",
            FileStatusKind::Deleted => "D",
            FileStatusKind::Renamed => "R",
            FileStatusKind::Untracked => "??",
            FileStatusKind::Conflict => "UU",
        }
    }

    /// Display ordering: conflicts, staged, unstaged, untracked
    pub fn sort_priority(&self, staged: bool) -> u8 {
        match (self, staged) {
            (FileStatusKind::Conflict, _) => 0,
            (FileStatusKind::Added, true) => 1,
            (FileStatusKind::Modified, true) => 2,
            (FileStatusKind::Deleted, true) => 3,
            (FileStatusKind::Renamed, true) => 4,
            (FileStatusKind::Modified, false) => 5,
            (FileStatusKind::Deleted, false) => 6,
            (FileStatusKind::Renamed, false) => 7,
            (FileStatusKind::Untracked, _) => 8,
            _ => 9,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FileStatusKind::Added => "new",
            FileStatusKind::Modified => "modified",
            FileStatusKind::Deleted => "deleted",
            FileStatusKind::Renamed => "renamed",
            FileStatusKind::Untracked => "untracked",
            FileStatusKind::Conflict => "both modified",
        }
    }
}

impl fmt::Display for FileStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
