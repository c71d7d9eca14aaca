//! git-conductor - sequences multi-step git operations against a working copy.
//!
//! The center of the crate is [`MutationOrchestrator`]: one method per user action
//! (commit and push, sync, stash-guarded checkout / merge / rebase, conflict resolution,
//! tags, cherry-pick, squash, reword), each turned into an ordered chain of
//! [`VcsBackend`] calls that degrades gracefully when a step fails part way.
//!
//! # Public API
//! - [`VcsBackend`], [`CredentialProvider`], [`DecisionSink`]: the capabilities the
//!   orchestrator is generic over
//! - [`GitCli`]: backend reading through `git2` and mutating through the `git` binary
//! - [`RepositorySession`] / [`SessionRegistry`]: cached snapshots of open repositories
//! - [`StashGuard`]: stash before, pop after, report a failed pop without hiding the result
//! - [`OperationReport`] / [`SyncResult`]: what an operation ended with

pub mod commands;
pub mod core;

pub use core::{
    BackendError,
    BranchInfo,
    CommitInfo,
    ConductorConfig,
    ConductorError,
    ConflictStrategy,
    CredentialProvider,
    DecisionSink,
    FileStatus,
    FileStatusKind,
    GitCli,
    MutationOrchestrator,
    NotifyLevel,
    OperationReport,
    OperationStatus,
    RepositoryHandle,
    RepositorySession,
    Result,
    RiskyAction,
    SessionRegistry,
    StashGuard,
    SyncResult,
    TagInfo,
    Token,
    VcsBackend,
};
