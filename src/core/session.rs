//! In-memory snapshots of open repositories.
//!
//! A [`RepositorySession`] caches what the backend last reported for one repository:
//! file statuses, branches, recent commits, tags and the diffs that were asked for. The
//! cache is for display. Nothing in the orchestrator reads it to decide what to do next;
//! those checks always go back to the backend, since a shell or another process can change
//! the working tree at any time.
//!
//! [`SessionRegistry`] keeps one session per opened repository path and remembers which
//! one is active.

use crate::core::{
    backend::VcsBackend,
    error::{ConductorError, Result},
    state::{BranchInfo, CommitInfo, FileStatus, RepositoryHandle, TagInfo},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::ops::BitOr;
use std::path::{Path, PathBuf};

/// Which parts of a session to reload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refresh {
    pub status: bool,
    pub log: bool,
    pub branches: bool,
    pub tags: bool,
}

impl Refresh {
    pub const NONE: Refresh = Refresh {
        status: false,
        log: false,
        branches: false,
        tags: false,
    };
    pub const STATUS: Refresh = Refresh {
        status: true,
        ..Refresh::NONE
    };
    pub const LOG: Refresh = Refresh {
        log: true,
        ..Refresh::NONE
    };
    pub const BRANCHES: Refresh = Refresh {
        branches: true,
        ..Refresh::NONE
    };
    pub const TAGS: Refresh = Refresh {
        tags: true,
        ..Refresh::NONE
    };
    pub const ALL: Refresh = Refresh {
        status: true,
        log: true,
        branches: true,
        tags: true,
    };

    pub fn is_empty(&self) -> bool {
        *self == Refresh::NONE
    }
}

impl BitOr for Refresh {
    type Output = Refresh;

    fn bitor(self, rhs: Refresh) -> Refresh {
        Refresh {
            status: self.status || rhs.status,
            log: self.log || rhs.log,
            branches: self.branches || rhs.branches,
            tags: self.tags || rhs.tags,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RepositorySession {
    handle: RepositoryHandle,
    log_limit: usize,
    files: Vec<FileStatus>,
    branches: Vec<BranchInfo>,
    commits: Vec<CommitInfo>,
    tags: Vec<TagInfo>,
    diffs: HashMap<PathBuf, String>,
    last_refreshed: Option<DateTime<Utc>>,
    last_refresh_error: Option<String>,
}

impl RepositorySession {
    pub fn new(handle: RepositoryHandle, log_limit: usize) -> Self {
        Self {
            handle,
            log_limit,
            files: Vec::new(),
            branches: Vec::new(),
            commits: Vec::new(),
            tags: Vec::new(),
            diffs: HashMap::new(),
            last_refreshed: None,
            last_refresh_error: None,
        }
    }

    pub fn handle(&self) -> &RepositoryHandle {
        &self.handle
    }

    pub fn path(&self) -> &Path {
        &self.handle.path
    }

    pub fn files(&self) -> &[FileStatus] {
        &self.files
    }

    pub fn branches(&self) -> &[BranchInfo] {
        &self.branches
    }

    pub fn commits(&self) -> &[CommitInfo] {
        &self.commits
    }

    pub fn tags(&self) -> &[TagInfo] {
        &self.tags
    }

    pub fn diff(&self, path: &Path) -> Option<&str> {
        self.diffs.get(path).map(String::as_str)
    }

    /// Current branch as of the last branch refresh
    pub fn current_branch(&self) -> Option<&BranchInfo> {
        self.branches.iter().find(|b| b.current && !b.remote)
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    /// Error from the most recent refresh, if any section failed to reload
    pub fn last_refresh_error(&self) -> Option<&str> {
        self.last_refresh_error.as_deref()
    }

    /// Reload the requested sections from the backend.
    ///
    /// Each section is replaced wholesale on success. A section that fails keeps its
    /// previous contents and the failure is recorded in [`Self::last_refresh_error`].
    /// Returns `true` when every requested section reloaded.
    pub fn refresh<B: VcsBackend + ?Sized>(&mut self, backend: &B, scope: Refresh) -> bool {
        if scope.is_empty() {
            return true;
        }

        let repo = self.handle.path.clone();
        let mut errors = Vec::new();

        if scope.status {
            match backend.status(&repo) {
                Ok(files) => {
                    self.diffs
                        .retain(|path, _| files.iter().any(|f| &f.path == path));
                    self.files = files;
                }
                Err(e) => errors.push(format!("status: {e}")),
            }
        }
        if scope.log {
            match backend.log(&repo, self.log_limit) {
                Ok(commits) => self.commits = commits,
                Err(e) => errors.push(format!("log: {e}")),
            }
        }
        if scope.branches {
            match backend.branches(&repo) {
                Ok(branches) => self.branches = branches,
                Err(e) => errors.push(format!("branches: {e}")),
            }
        }
        if scope.tags {
            match backend.tags(&repo) {
                Ok(tags) => self.tags = tags,
                Err(e) => errors.push(format!("tags: {e}")),
            }
        }

        self.finish_refresh(errors)
    }

    /// Reload the diff of one path. Leaves the refresh timestamp alone.
    pub fn refresh_diff<B: VcsBackend + ?Sized>(&mut self, backend: &B, path: &Path) -> bool {
        match backend.diff(&self.handle.path, path) {
            Ok(diff) => {
                self.diffs.insert(path.to_path_buf(), diff);
                true
            }
            Err(e) => {
                log::warn!("Could not load diff of {}: {e}", path.display());
                self.last_refresh_error = Some(format!("diff {}: {e}", path.display()));
                false
            }
        }
    }

    fn finish_refresh(&mut self, errors: Vec<String>) -> bool {
        if errors.is_empty() {
            self.last_refreshed = Some(Utc::now());
            self.last_refresh_error = None;
            return true;
        }

        let message = errors.join("; ");
        log::warn!(
            "Refresh of {} incomplete, keeping previous snapshot: {message}",
            self.handle.path.display()
        );
        self.last_refresh_error = Some(message);
        false
    }
}

/// All open repositories, keyed by path, plus the active one
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<PathBuf, RepositorySession>,
    active: Option<PathBuf>,
    log_limit: usize,
}

impl SessionRegistry {
    pub fn new(log_limit: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            active: None,
            log_limit,
        }
    }

    /// Open a repository (or update the identity of an already open one) and make it active
    pub fn open(&mut self, handle: RepositoryHandle) -> &mut RepositorySession {
        let path = handle.path.clone();
        let log_limit = self.log_limit;
        self.active = Some(path.clone());

        let session = self
            .sessions
            .entry(path)
            .or_insert_with(|| RepositorySession::new(handle.clone(), log_limit));
        session.handle.identity = handle.identity;
        session
    }

    pub fn set_active(&mut self, path: &Path) -> Result<()> {
        if !self.sessions.contains_key(path) {
            return Err(ConductorError::repository_not_open(path));
        }
        self.active = Some(path.to_path_buf());
        Ok(())
    }

    /// Forget a repository. Closing the active one leaves no repository active.
    pub fn close(&mut self, path: &Path) -> Option<RepositorySession> {
        if self.active.as_deref() == Some(path) {
            self.active = None;
        }
        self.sessions.remove(path)
    }

    pub fn active(&self) -> Option<&RepositorySession> {
        self.active.as_ref().and_then(|path| self.sessions.get(path))
    }

    pub fn active_mut(&mut self) -> Option<&mut RepositorySession> {
        let path = self.active.as_ref()?;
        self.sessions.get_mut(path)
    }

    pub fn get(&self, path: &Path) -> Option<&RepositorySession> {
        self.sessions.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut RepositorySession> {
        self.sessions.get_mut(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sessions.keys().map(PathBuf::as_path)
    }
}
