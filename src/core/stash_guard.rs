//! Stash-wrapped execution of working-tree-altering operations.
//!
//! Checkout, merge and rebase all move the branch tip under the user's uncommitted edits.
//! [`StashGuard`] puts those edits aside first and always tries to bring them back
//! afterwards, whatever the wrapped operation did.
//!
//! A failed pop never replaces the wrapped operation's outcome. It is reported next to it
//! as `stash_not_restored`: the changes are still on the stash list and the user has to be
//! told, but the primary result is what they asked about.

use crate::core::{
    backend::VcsBackend,
    outcome::{GuardedOutcome, MutationOutcome},
};
use std::path::Path;

pub struct StashGuard<'a, B: VcsBackend + ?Sized> {
    backend: &'a B,
    repo: &'a Path,
}

impl<'a, B: VcsBackend + ?Sized> StashGuard<'a, B> {
    pub fn new(backend: &'a B, repo: &'a Path) -> Self {
        Self { backend, repo }
    }

    /// Run `body`, stashing before and popping after when `has_uncommitted_changes` is set.
    ///
    /// - a failed stash aborts with [`MutationOutcome::BackendError`] and `body` never runs
    /// - when the backend reports nothing was stashed there is nothing to pop
    /// - the pop is attempted after `body` returns, successful or not
    pub fn run_guarded<F>(&self, has_uncommitted_changes: bool, body: F) -> GuardedOutcome
    where
        F: FnOnce() -> MutationOutcome,
    {
        if !has_uncommitted_changes {
            return GuardedOutcome::unguarded(body());
        }

        let stashed = match self.backend.stash(self.repo) {
            Ok(stashed) => stashed,
            Err(e) => {
                log::warn!("Stash failed, not running guarded operation: {e}");
                return GuardedOutcome::unguarded(MutationOutcome::BackendError(e.message));
            }
        };

        if !stashed {
            log::debug!("Nothing was stashed, skipping pop");
            return GuardedOutcome::unguarded(body());
        }

        log::debug!("Stashed local changes in {}", self.repo.display());
        let outcome = body();

        let stash_not_restored = match self.backend.stash_pop(self.repo) {
            Ok(()) => {
                log::debug!("Restored stashed changes");
                false
            }
            Err(e) => {
                log::warn!("Stashed changes were not restored and remain on the stash list: {e}");
                true
            }
        };

        GuardedOutcome {
            outcome,
            stash_not_restored,
        }
    }
}
