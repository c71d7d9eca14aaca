//! Core functionality for git-conductor.
//!
//! Leaves first: the backend, credential and decision capabilities, the session snapshot
//! and its registry, the stash guard, and the orchestrator that sequences them.

pub mod backend;
pub mod colors;
pub mod command_init;
pub mod config;
pub mod credentials;
pub mod decision;
pub mod dirs;
pub mod error;
pub mod git;
pub mod git_status;
pub mod lock;
pub mod orchestrator;
pub mod outcome;
pub mod output;
pub mod selection;
pub mod session;
pub mod stash_guard;
pub mod state;

// === Error handling ===
pub use error::{
    BackendError, BackendErrorKind, BackendResult, ConductorError, PreconditionError, Result,
};

// === Capabilities ===
// The orchestrator is generic over these; `GitCli`, `EnvCredentialProvider` and
// `TerminalSink` are the implementations the binary uses
pub use backend::{ConflictStrategy, PushOptions, ResetMode, VcsBackend};
pub use credentials::{CredentialProvider, EnvCredentialProvider, StaticCredentialProvider, Token};
pub use decision::{DecisionSink, FixedDecision, NotifyLevel, RiskyAction};
pub use git::GitCli;

// === State ===
pub use git_status::FileStatusKind;
pub use session::{Refresh, RepositorySession, SessionRegistry};
pub use state::{BranchInfo, CommitInfo, FileStatus, RepositoryHandle, SyncResult, TagInfo};

// === Orchestration ===
pub use lock::{RepoLockGuard, RepoLocks};
pub use orchestrator::{MutationOrchestrator, Reportable, SyncPhase};
pub use outcome::{GuardedOutcome, MutationOutcome, OperationReport, OperationStatus};
pub use stash_guard::StashGuard;

// === Configuration and CLI support ===
pub use command_init::{CommandContext, GlobalOptions};
pub use config::ConductorConfig;
pub use selection::Selection;

// === Output formatting ===
pub use output::{print_error, print_info, print_section_header, print_success, TerminalSink};
