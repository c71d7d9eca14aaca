use git_conductor::core::{BackendError, MutationOutcome, StashGuard};
use std::cell::Cell;
use std::path::Path;

mod common;
use common::fakes::*;

#[cfg(test)]
mod stash_guard_tests {
    use super::*;

    #[test]
    fn test_clean_tree_runs_body_without_stash() {
        let backend = FakeBackend::new();
        let guard = StashGuard::new(&backend, Path::new(REPO));

        let result = guard.run_guarded(false, || MutationOutcome::Completed);
        assert_eq!(result.outcome, MutationOutcome::Completed);
        assert!(!result.stash_not_restored);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_pop_follows_failed_body() {
        let backend = FakeBackend::dirty();
        let guard = StashGuard::new(&backend, Path::new(REPO));

        let result = guard.run_guarded(true, || {
            MutationOutcome::BackendError("checkout failed".to_string())
        });
        assert_eq!(
            result.outcome,
            MutationOutcome::BackendError("checkout failed".to_string())
        );
        assert!(!result.stash_not_restored);
        assert_eq!(backend.calls(), vec!["stash", "stash_pop"]);
        assert_eq!(backend.files().len(), 1);
    }

    #[test]
    fn test_body_runs_with_changes_set_aside() {
        let backend = FakeBackend::dirty();
        let guard = StashGuard::new(&backend, Path::new(REPO));
        let tree_was_clean = Cell::new(false);

        guard.run_guarded(true, || {
            tree_was_clean.set(backend.files().is_empty());
            MutationOutcome::Completed
        });
        assert!(tree_was_clean.get());
        assert_eq!(backend.files().len(), 1);
    }

    #[test]
    fn test_failed_stash_skips_body() {
        let backend = FakeBackend::dirty();
        backend.fail_next("stash", BackendError::other("index.lock exists"));
        let guard = StashGuard::new(&backend, Path::new(REPO));
        let ran = Cell::new(false);

        let result = guard.run_guarded(true, || {
            ran.set(true);
            MutationOutcome::Completed
        });
        assert!(!ran.get());
        assert_eq!(
            result.outcome,
            MutationOutcome::BackendError("index.lock exists".to_string())
        );
        assert!(!backend.called("stash_pop"));
    }

    #[test]
    fn test_nothing_stashed_means_no_pop() {
        let backend = FakeBackend::dirty().stash_saves_nothing();
        let guard = StashGuard::new(&backend, Path::new(REPO));

        let result = guard.run_guarded(true, || MutationOutcome::Completed);
        assert!(result.outcome.is_completed());
        assert_eq!(backend.calls(), vec!["stash"]);
    }

    #[test]
    fn test_failed_pop_keeps_primary_outcome() {
        let backend = FakeBackend::dirty();
        backend.fail_next("stash_pop", BackendError::other("conflict in notes.txt"));
        let guard = StashGuard::new(&backend, Path::new(REPO));

        let result = guard.run_guarded(true, || MutationOutcome::Completed);
        assert_eq!(result.outcome, MutationOutcome::Completed);
        assert!(result.stash_not_restored);
        assert_eq!(backend.stash_depth(), 1);
    }
}
