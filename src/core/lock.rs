//! Per-repository operation serialization.
//!
//! At most one orchestrator operation runs against a repository path at a time.
//! [`RepoLocks`] is the shared set of busy paths; [`RepoLockGuard`] removes its path when
//! dropped, so the lock is released on every exit path, early returns included.

use crate::core::error::{ConductorError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct RepoLocks {
    busy: Arc<Mutex<HashSet<PathBuf>>>,
}

impl RepoLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn busy(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        // A panic while holding the set cannot leave it half-updated
        self.busy.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark `path` busy, or fail if an operation is already running on it
    pub fn acquire(&self, path: &Path) -> Result<RepoLockGuard> {
        if !self.busy().insert(path.to_path_buf()) {
            return Err(ConductorError::operation_in_progress(path));
        }
        log::debug!("Acquired operation lock for {}", path.display());
        Ok(RepoLockGuard {
            locks: self.clone(),
            path: path.to_path_buf(),
        })
    }

    pub fn is_busy(&self, path: &Path) -> bool {
        self.busy().contains(path)
    }
}

#[derive(Debug)]
pub struct RepoLockGuard {
    locks: RepoLocks,
    path: PathBuf,
}

impl Drop for RepoLockGuard {
    fn drop(&mut self) {
        self.locks.busy().remove(&self.path);
        log::debug!("Released operation lock for {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected() {
        let locks = RepoLocks::new();
        let _guard = locks.acquire(Path::new("/repo")).unwrap();

        let second = locks.acquire(Path::new("/repo"));
        assert!(matches!(
            second,
            Err(ConductorError::OperationInProgress { .. })
        ));
    }

    #[test]
    fn test_other_repositories_are_independent() {
        let locks = RepoLocks::new();
        let _a = locks.acquire(Path::new("/a")).unwrap();
        assert!(locks.acquire(Path::new("/b")).is_ok());
    }

    #[test]
    fn test_drop_releases_lock() {
        let locks = RepoLocks::new();
        {
            let _guard = locks.acquire(Path::new("/repo")).unwrap();
            assert!(locks.is_busy(Path::new("/repo")));
        }
        assert!(!locks.is_busy(Path::new("/repo")));
        assert!(locks.acquire(Path::new("/repo")).is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let locks = RepoLocks::new();
        let shared = locks.clone();
        let _guard = locks.acquire(Path::new("/repo")).unwrap();
        assert!(shared.is_busy(Path::new("/repo")));
    }
}
