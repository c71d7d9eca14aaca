//! User decisions and outcome notices.
//!
//! The orchestrator never prompts or prints. Whenever an operation needs the user's
//! consent for something hard to undo it describes the action as a [`RiskyAction`] and
//! asks the [`DecisionSink`]; terminal outcomes are handed to the same sink through
//! [`DecisionSink::notify`].

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskyAction {
    /// Overwrite the remote branch after a non-fast-forward rejection
    ForcePush { branch: String, reason: String },
    /// Hard-reset the last commit away and force-push the rewritten branch
    DeleteLastCommit { branch: String },
    /// Throw away local changes to one file
    DiscardChanges { path: PathBuf },
    DeleteBranch { name: String },
}

impl RiskyAction {
    pub fn title(&self) -> &'static str {
        match self {
            RiskyAction::ForcePush { .. } => "Force push",
            RiskyAction::DeleteLastCommit { .. } => "Delete last commit",
            RiskyAction::DiscardChanges { .. } => "Discard changes",
            RiskyAction::DeleteBranch { .. } => "Delete branch",
        }
    }

    /// Question shown to the user; every action has its own wording
    pub fn details(&self) -> String {
        match self {
            RiskyAction::ForcePush { branch, reason } => format!(
                "The remote rejected the push of '{branch}': {reason}\n\
                 Force push and overwrite the remote history of '{branch}'?"
            ),
            RiskyAction::DeleteLastCommit { branch } => format!(
                "This permanently deletes the last commit on '{branch}', discards all \
                 uncommitted changes and force-pushes the rewritten branch. \
                 This cannot be undone. Delete the last commit?"
            ),
            RiskyAction::DiscardChanges { path } => format!(
                "Discard all local changes to '{}'? They cannot be recovered.",
                path.display()
            ),
            RiskyAction::DeleteBranch { name } => format!("Delete branch '{name}'?"),
        }
    }
}

impl fmt::Display for RiskyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.details())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Error,
    Info,
}

pub trait DecisionSink {
    /// Ask the user whether to go ahead. `true` means accepted.
    fn propose_risky_action(&self, action: &RiskyAction) -> bool;

    fn notify(&self, level: NotifyLevel, message: &str);
}

/// Accepts or declines everything without asking and discards notices
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub bool);

impl DecisionSink for FixedDecision {
    fn propose_risky_action(&self, action: &RiskyAction) -> bool {
        log::debug!("Auto-answering '{}' with {}", action.title(), self.0);
        self.0
    }

    fn notify(&self, level: NotifyLevel, message: &str) {
        log::debug!("{level:?}: {message}");
    }
}
