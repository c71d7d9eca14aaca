//! Outcome types shared by the stash guard and the orchestrator.

use crate::core::error::{BackendError, BackendErrorKind, BackendResult, PreconditionError};
use std::path::PathBuf;

/// What one backend step reduced to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Completed,
    RejectedNonFastForward(String),
    ConflictDetected(Vec<PathBuf>),
    BackendError(String),
}

impl MutationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, MutationOutcome::Completed)
    }
}

impl From<BackendError> for MutationOutcome {
    fn from(err: BackendError) -> Self {
        match err.kind {
            BackendErrorKind::NonFastForward => MutationOutcome::RejectedNonFastForward(err.message),
            BackendErrorKind::Conflict(paths) => MutationOutcome::ConflictDetected(paths),
            BackendErrorKind::NothingToCommit | BackendErrorKind::Other => {
                MutationOutcome::BackendError(err.message)
            }
        }
    }
}

impl From<BackendResult<()>> for MutationOutcome {
    fn from(result: BackendResult<()>) -> Self {
        match result {
            Ok(()) => MutationOutcome::Completed,
            Err(err) => err.into(),
        }
    }
}

/// A body outcome together with whether the stash it was wrapped in came back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedOutcome {
    pub outcome: MutationOutcome,
    /// Changes were stashed but popping them failed; they are still on the stash list
    pub stash_not_restored: bool,
}

impl GuardedOutcome {
    pub fn unguarded(outcome: MutationOutcome) -> Self {
        Self {
            outcome,
            stash_not_restored: false,
        }
    }
}

/// How a public orchestrator operation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// No repository is active; nothing was done
    Skipped,
    Completed,
    /// Local part done, the network step was not performed
    CompletedLocalOnly(String),
    /// The user declined a confirmation
    Declined,
    Precondition(PreconditionError),
    Failed(String),
    Conflicted(Vec<PathBuf>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub status: OperationStatus,
    pub stash_not_restored: bool,
    /// Replaces the operation's default success notice
    pub message: Option<String>,
}

impl OperationReport {
    pub fn new(status: OperationStatus) -> Self {
        Self {
            status,
            stash_not_restored: false,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn skipped() -> Self {
        Self::new(OperationStatus::Skipped)
    }

    pub fn completed() -> Self {
        Self::new(OperationStatus::Completed)
    }

    pub fn precondition(err: PreconditionError) -> Self {
        Self::new(OperationStatus::Precondition(err))
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            OperationStatus::Completed | OperationStatus::CompletedLocalOnly(_)
        )
    }

    /// Whether the caller should treat this as a failure (exit code, error styling)
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            OperationStatus::Precondition(_)
                | OperationStatus::Failed(_)
                | OperationStatus::Conflicted(_)
        )
    }
}

impl From<MutationOutcome> for OperationReport {
    fn from(outcome: MutationOutcome) -> Self {
        let status = match outcome {
            MutationOutcome::Completed => OperationStatus::Completed,
            MutationOutcome::ConflictDetected(paths) => OperationStatus::Conflicted(paths),
            MutationOutcome::RejectedNonFastForward(message)
            | MutationOutcome::BackendError(message) => OperationStatus::Failed(message),
        };
        Self::new(status)
    }
}

impl From<GuardedOutcome> for OperationReport {
    fn from(guarded: GuardedOutcome) -> Self {
        let mut report = OperationReport::from(guarded.outcome);
        report.stash_not_restored = guarded.stash_not_restored;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_reduction() {
        assert_eq!(
            MutationOutcome::from(BackendError::non_fast_forward("rejected")),
            MutationOutcome::RejectedNonFastForward("rejected".to_string())
        );
        assert_eq!(
            MutationOutcome::from(BackendError::conflict(vec![PathBuf::from("a")], "x")),
            MutationOutcome::ConflictDetected(vec![PathBuf::from("a")])
        );
        assert_eq!(
            MutationOutcome::from(BackendError::other("boom")),
            MutationOutcome::BackendError("boom".to_string())
        );
        assert!(MutationOutcome::from(BackendResult::Ok(())).is_completed());
    }

    #[test]
    fn test_guarded_outcome_keeps_primary_result() {
        let report = OperationReport::from(GuardedOutcome {
            outcome: MutationOutcome::BackendError("rebase failed".to_string()),
            stash_not_restored: true,
        });
        assert_eq!(
            report.status,
            OperationStatus::Failed("rebase failed".to_string())
        );
        assert!(report.stash_not_restored);
        assert!(report.is_failure());
    }

    #[test]
    fn test_success_and_failure_classification() {
        assert!(OperationReport::completed().is_success());
        assert!(OperationReport::new(OperationStatus::CompletedLocalOnly("no token".into()))
            .is_success());
        assert!(!OperationReport::new(OperationStatus::Declined).is_failure());
        assert!(!OperationReport::skipped().is_failure());
        assert!(OperationReport::precondition(PreconditionError::EmptyMessage).is_failure());
    }
}
