//! The mutation orchestrator.
//!
//! [`MutationOrchestrator`] exposes one method per user-facing action and turns it into an
//! ordered chain of [`VcsBackend`] calls. Every public operation goes through
//! [`MutationOrchestrator::run_operation`], which:
//!
//! 1. does nothing (returns `None` / [`OperationStatus::Skipped`]) when no repository is
//!    active,
//! 2. takes the per-repository lock, so a second operation on the same repository is
//!    rejected with [`ConductorError::OperationInProgress`](crate::core::ConductorError),
//! 3. runs the operation body, which cannot fail out early: every backend error is reduced
//!    to an [`OperationReport`] or [`SyncResult`] value,
//! 4. refreshes the session sections the operation touched, whatever the outcome,
//! 5. reports the outcome to the [`DecisionSink`], then releases the lock.
//!
//! Checks that decide what to do (is the tree dirty, is anything staged, which branch is
//! checked out) are always made against the backend right before they matter, never
//! against the session snapshot.

use crate::core::{
    backend::{ConflictStrategy, PushOptions, ResetMode, VcsBackend},
    config::ConductorConfig,
    credentials::{CredentialProvider, Token},
    decision::{DecisionSink, NotifyLevel, RiskyAction},
    error::{BackendResult, PreconditionError, Result},
    git_status::FileStatusKind,
    lock::RepoLocks,
    outcome::{MutationOutcome, OperationReport, OperationStatus},
    session::{Refresh, RepositorySession, SessionRegistry},
    stash_guard::StashGuard,
    state::{has_staged_changes, RepositoryHandle, SyncResult},
};
use std::path::{Path, PathBuf};

const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_LOG_LIMIT: usize = 50;

const STASH_NOT_RESTORED: &str = "Your uncommitted changes were stashed but could not be \
     re-applied. They are still on the stash list; resolve and run 'git stash pop'.";

/// Anything an operation can hand back that maps onto a notification
pub trait Reportable {
    fn to_report(&self) -> OperationReport;
}

impl Reportable for OperationReport {
    fn to_report(&self) -> OperationReport {
        self.clone()
    }
}

impl Reportable for SyncResult {
    fn to_report(&self) -> OperationReport {
        let status = if self.success {
            OperationStatus::Completed
        } else if !self.conflicts.is_empty() {
            OperationStatus::Conflicted(self.conflicts.clone())
        } else {
            OperationStatus::Failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| "Sync failed".to_string()),
            )
        };
        OperationReport::new(status)
    }
}

/// Phases of a sync. Each run moves strictly forward and stops in one of the four
/// terminal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Pulling,
    Pushing,
    Conflicted,
    PullFailed,
    Pushed,
    PushFailed,
}

impl SyncPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncPhase::Conflicted | SyncPhase::PullFailed | SyncPhase::Pushed | SyncPhase::PushFailed
        )
    }

    fn advance(self, next: SyncPhase) -> SyncPhase {
        debug_assert!(!self.is_terminal(), "sync phase {self:?} is terminal");
        log::debug!("sync: {self:?} -> {next:?}");
        next
    }
}

struct OperationSpec {
    name: &'static str,
    refresh: Refresh,
    diff_path: Option<PathBuf>,
    success_message: Option<String>,
}

impl OperationSpec {
    fn new(name: &'static str, refresh: Refresh) -> Self {
        Self {
            name,
            refresh,
            diff_path: None,
            success_message: None,
        }
    }

    fn on_success(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    fn with_diff(mut self, path: &Path) -> Self {
        self.diff_path = Some(path.to_path_buf());
        self
    }
}

/// What an operation body gets to work with
struct OperationContext<'a, B, C, D> {
    backend: &'a B,
    credentials: &'a C,
    sink: &'a D,
    handle: &'a RepositoryHandle,
    remote: &'a str,
}

impl<B: VcsBackend, C: CredentialProvider, D: DecisionSink> OperationContext<'_, B, C, D> {
    fn repo(&self) -> &Path {
        &self.handle.path
    }

    fn token(&self) -> Option<Token> {
        let identity = self.handle.identity.as_deref()?;
        self.credentials.get_token(identity)
    }

    fn is_dirty(&self) -> BackendResult<bool> {
        Ok(!self.backend.status(self.repo())?.is_empty())
    }

    /// Validate and commit; anything other than `Completed` ends the calling chain
    fn commit(&self, message: &str) -> OperationReport {
        if message.trim().is_empty() {
            return OperationReport::precondition(PreconditionError::EmptyMessage);
        }

        match self.backend.status(self.repo()) {
            Ok(files) if !has_staged_changes(&files) => {
                return OperationReport::precondition(PreconditionError::NothingStaged);
            }
            Ok(_) => {}
            Err(e) => return MutationOutcome::from(e).into(),
        }

        MutationOutcome::from(self.backend.commit(self.repo(), message)).into()
    }

    /// Push options naming the configured remote and the checked-out branch
    fn branch_push_options(&self) -> BackendResult<PushOptions> {
        let options = PushOptions::to_remote(self.remote);
        Ok(match self.backend.current_branch(self.repo())? {
            Some(branch) => options.branch(branch),
            None => options,
        })
    }

    /// Push; on a non-fast-forward rejection ask once whether to force, and force at most once
    fn push_with_escalation(&self, options: PushOptions, token: &Token) -> OperationReport {
        let rejection = match self.backend.push(self.repo(), &options, Some(token)) {
            Ok(()) => return OperationReport::completed(),
            Err(e) if e.is_non_fast_forward() => e.message,
            Err(e) => return MutationOutcome::from(e).into(),
        };

        let branch = options
            .branch
            .clone()
            .unwrap_or_else(|| "the current branch".to_string());
        let action = RiskyAction::ForcePush {
            branch,
            reason: rejection.clone(),
        };

        if !self.sink.propose_risky_action(&action) {
            log::info!("Force push declined, leaving remote untouched");
            return OperationReport::new(OperationStatus::Failed(rejection));
        }

        log::info!("Force pushing after user confirmation");
        match self.backend.push(self.repo(), &options.forced(), Some(token)) {
            Ok(()) => OperationReport::completed().with_message("Force pushed to remote"),
            Err(e) => OperationReport::new(OperationStatus::Failed(e.message)),
        }
    }

    /// Run a branch-tip-moving primitive inside a stash guard, with a fresh dirty check
    fn guarded<F>(&self, operation: F) -> OperationReport
    where
        F: FnOnce() -> BackendResult<()>,
    {
        let dirty = match self.is_dirty() {
            Ok(dirty) => dirty,
            Err(e) => return MutationOutcome::from(e).into(),
        };

        StashGuard::new(self.backend, self.repo())
            .run_guarded(dirty, || MutationOutcome::from(operation()))
            .into()
    }
}

pub struct MutationOrchestrator<B, C, D> {
    backend: B,
    credentials: C,
    sink: D,
    sessions: SessionRegistry,
    locks: RepoLocks,
    remote: String,
}

impl<B: VcsBackend, C: CredentialProvider, D: DecisionSink> MutationOrchestrator<B, C, D> {
    pub fn new(backend: B, credentials: C, sink: D) -> Self {
        Self {
            backend,
            credentials,
            sink,
            sessions: SessionRegistry::new(DEFAULT_LOG_LIMIT),
            locks: RepoLocks::new(),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }

    pub fn with_config(backend: B, credentials: C, sink: D, config: &ConductorConfig) -> Self {
        Self {
            sessions: SessionRegistry::new(config.log_limit),
            remote: config.remote.clone(),
            ..Self::new(backend, credentials, sink)
        }
    }

    /// Share operation locks with other orchestrators working on the same repositories
    pub fn with_locks(mut self, locks: RepoLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn locks(&self) -> &RepoLocks {
        &self.locks
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Snapshot of the active repository
    pub fn session(&self) -> Option<&RepositorySession> {
        self.sessions.active()
    }

    /// Open a repository, make it active and load its initial snapshot
    pub fn open_repository(&mut self, handle: RepositoryHandle) -> &RepositorySession {
        log::info!("Opening repository {}", handle.path.display());
        let backend = &self.backend;
        let session = self.sessions.open(handle);
        session.refresh(backend, Refresh::ALL);
        session
    }

    pub fn set_active(&mut self, path: &Path) -> Result<()> {
        self.sessions.set_active(path)
    }

    pub fn close_repository(&mut self, path: &Path) -> Option<RepositorySession> {
        self.sessions.close(path)
    }

    fn run_operation<T, F>(&mut self, spec: OperationSpec, body: F) -> Result<Option<T>>
    where
        T: Reportable,
        F: FnOnce(&OperationContext<'_, B, C, D>) -> T,
    {
        let Some(handle) = self.sessions.active().map(|s| s.handle().clone()) else {
            log::debug!("{} skipped: no active repository", spec.name);
            return Ok(None);
        };

        let _lock = self.locks.acquire(&handle.path)?;
        log::info!("{} started in {}", spec.name, handle.path.display());

        let result = {
            let context = OperationContext {
                backend: &self.backend,
                credentials: &self.credentials,
                sink: &self.sink,
                handle: &handle,
                remote: &self.remote,
            };
            body(&context)
        };

        self.refresh_session(&handle.path, spec.refresh, spec.diff_path.as_deref());

        let report = result.to_report();
        log::info!("{} finished: {:?}", spec.name, report.status);
        self.notify(&spec, &report);

        Ok(Some(result))
    }

    fn run_reported<F>(&mut self, spec: OperationSpec, body: F) -> Result<OperationReport>
    where
        F: FnOnce(&OperationContext<'_, B, C, D>) -> OperationReport,
    {
        Ok(self
            .run_operation(spec, body)?
            .unwrap_or_else(OperationReport::skipped))
    }

    fn refresh_session(&mut self, path: &Path, scope: Refresh, diff_path: Option<&Path>) {
        let backend = &self.backend;
        let Some(session) = self.sessions.get_mut(path) else {
            return;
        };
        session.refresh(backend, scope);
        if let Some(diff_path) = diff_path {
            session.refresh_diff(backend, diff_path);
        }
    }

    fn notify(&self, spec: &OperationSpec, report: &OperationReport) {
        match &report.status {
            OperationStatus::Skipped => {}
            OperationStatus::Completed => {
                if let Some(message) = report.message.as_ref().or(spec.success_message.as_ref()) {
                    self.sink.notify(NotifyLevel::Success, message);
                }
            }
            OperationStatus::CompletedLocalOnly(reason) => {
                self.sink.notify(NotifyLevel::Info, reason);
            }
            OperationStatus::Declined => {
                self.sink
                    .notify(NotifyLevel::Info, &format!("{} cancelled", spec.name));
            }
            OperationStatus::Precondition(err) => {
                self.sink.notify(NotifyLevel::Error, &err.to_string());
            }
            OperationStatus::Failed(message) => {
                log::warn!("{} failed: {message}", spec.name);
                self.sink.notify(NotifyLevel::Error, message);
            }
            OperationStatus::Conflicted(paths) => {
                let paths: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
                self.sink.notify(
                    NotifyLevel::Error,
                    &format!("{} stopped with conflicts in: {}", spec.name, paths.join(", ")),
                );
            }
        }

        if report.stash_not_restored {
            self.sink.notify(NotifyLevel::Error, STASH_NOT_RESTORED);
        }
    }

    pub fn stage_files(&mut self, paths: &[PathBuf]) -> Result<OperationReport> {
        let spec = OperationSpec::new("Stage", Refresh::STATUS)
            .on_success(format!("Staged {} path(s)", paths.len()));
        self.run_reported(spec, |ctx| {
            if paths.is_empty() {
                return OperationReport::completed();
            }
            MutationOutcome::from(ctx.backend.stage(ctx.repo(), paths)).into()
        })
    }

    pub fn unstage_files(&mut self, paths: &[PathBuf]) -> Result<OperationReport> {
        let spec = OperationSpec::new("Unstage", Refresh::STATUS)
            .on_success(format!("Unstaged {} path(s)", paths.len()));
        self.run_reported(spec, |ctx| {
            if paths.is_empty() {
                return OperationReport::completed();
            }
            MutationOutcome::from(ctx.backend.unstage(ctx.repo(), paths)).into()
        })
    }

    pub fn commit(&mut self, message: &str) -> Result<OperationReport> {
        let spec = OperationSpec::new("Commit", Refresh::STATUS | Refresh::LOG)
            .on_success(format!("Committed: {}", message.trim()));
        self.run_reported(spec, |ctx| ctx.commit(message))
    }

    /// Commit, then push with the repository identity's token.
    ///
    /// No token is a valid end state (committed locally). A non-fast-forward rejection is
    /// escalated as a force-push proposal; declining it leaves the commit unpushed and
    /// reports the original rejection.
    pub fn commit_and_push(&mut self, message: &str) -> Result<OperationReport> {
        let spec = OperationSpec::new("Commit and push", Refresh::STATUS | Refresh::LOG)
            .on_success(format!("Committed and pushed: {}", message.trim()));
        self.run_reported(spec, |ctx| {
            let committed = ctx.commit(message);
            if committed.status != OperationStatus::Completed {
                return committed;
            }

            let Some(token) = ctx.token() else {
                log::info!("No credential for this repository, skipping push");
                return OperationReport::new(OperationStatus::CompletedLocalOnly(
                    "Committed locally. No credential is linked to this repository, so the \
                     commit was not pushed."
                        .to_string(),
                ));
            };

            match ctx.branch_push_options() {
                Ok(options) => ctx.push_with_escalation(options, &token),
                Err(e) => MutationOutcome::from(e).into(),
            }
        })
    }

    /// Push the checked-out branch, with the same force-push escalation as commit-and-push
    pub fn push(&mut self) -> Result<OperationReport> {
        let spec = OperationSpec::new("Push", Refresh::BRANCHES | Refresh::LOG)
            .on_success("Pushed to remote");
        self.run_reported(spec, |ctx| {
            let Some(token) = ctx.token() else {
                return OperationReport::new(OperationStatus::CompletedLocalOnly(
                    "No credential is linked to this repository; nothing was pushed".to_string(),
                ));
            };
            match ctx.branch_push_options() {
                Ok(options) => ctx.push_with_escalation(options, &token),
                Err(e) => MutationOutcome::from(e).into(),
            }
        })
    }

    /// Pull, then push. Never pushes while the pull left conflicts behind.
    pub fn sync(&mut self, token: &Token) -> Result<Option<SyncResult>> {
        let spec = OperationSpec::new("Sync", Refresh::STATUS | Refresh::LOG | Refresh::BRANCHES)
            .on_success("Synced with remote");
        self.run_operation(spec, |ctx| {
            let mut phase = SyncPhase::Idle.advance(SyncPhase::Pulling);

            let result = match ctx.backend.pull(ctx.repo(), Some(token)) {
                Err(e) => match e.conflicts() {
                    Some(paths) => {
                        phase = phase.advance(SyncPhase::Conflicted);
                        SyncResult::conflicted(paths.to_vec())
                    }
                    None => {
                        phase = phase.advance(SyncPhase::PullFailed);
                        SyncResult::failed(false, e.message)
                    }
                },
                Ok(()) => {
                    phase = phase.advance(SyncPhase::Pushing);
                    match ctx
                        .backend
                        .push(ctx.repo(), &PushOptions::default(), Some(token))
                    {
                        Ok(()) => {
                            phase = phase.advance(SyncPhase::Pushed);
                            SyncResult::synced()
                        }
                        Err(e) => {
                            phase = phase.advance(SyncPhase::PushFailed);
                            SyncResult::failed(true, e.message)
                        }
                    }
                }
            };

            debug_assert!(phase.is_terminal());
            result
        })
    }

    /// Push the checked-out branch to the configured remote and track it
    pub fn publish_branch(&mut self) -> Result<OperationReport> {
        let spec = OperationSpec::new("Publish branch", Refresh::BRANCHES)
            .on_success("Branch published");
        self.run_reported(spec, |ctx| {
            let branch = match ctx.backend.current_branch(ctx.repo()) {
                Ok(Some(branch)) => branch,
                Ok(None) => return OperationReport::precondition(PreconditionError::DetachedHead),
                Err(e) => return MutationOutcome::from(e).into(),
            };
            let Some(token) = ctx.token() else {
                return OperationReport::new(OperationStatus::CompletedLocalOnly(format!(
                    "No credential is linked to this repository; '{branch}' was not published"
                )));
            };

            let options = PushOptions::to_remote(ctx.remote)
                .branch(branch)
                .set_upstream();
            MutationOutcome::from(ctx.backend.push(ctx.repo(), &options, Some(&token))).into()
        })
    }

    pub fn checkout_branch(&mut self, name: &str, create: bool) -> Result<OperationReport> {
        let spec = OperationSpec::new(
            "Checkout",
            Refresh::STATUS | Refresh::BRANCHES | Refresh::LOG,
        )
        .on_success(format!("Switched to branch '{name}'"));
        self.run_reported(spec, |ctx| {
            if name.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyBranchName);
            }
            ctx.guarded(|| ctx.backend.checkout(ctx.repo(), name, create))
        })
    }

    pub fn merge_branch(&mut self, name: &str) -> Result<OperationReport> {
        let spec = OperationSpec::new("Merge", Refresh::STATUS | Refresh::BRANCHES | Refresh::LOG)
            .on_success(format!("Merged '{name}'"));
        self.run_reported(spec, |ctx| {
            if name.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyBranchName);
            }
            ctx.guarded(|| ctx.backend.merge(ctx.repo(), name))
        })
    }

    pub fn rebase_branch(&mut self, name: &str) -> Result<OperationReport> {
        let spec = OperationSpec::new("Rebase", Refresh::STATUS | Refresh::BRANCHES | Refresh::LOG)
            .on_success(format!("Rebased onto '{name}'"));
        self.run_reported(spec, |ctx| {
            if name.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyBranchName);
            }
            ctx.guarded(|| ctx.backend.rebase(ctx.repo(), name))
        })
    }

    pub fn stash_changes(&mut self) -> Result<OperationReport> {
        let spec = OperationSpec::new("Stash", Refresh::STATUS).on_success("Stashed local changes");
        self.run_reported(spec, |ctx| match ctx.backend.stash(ctx.repo()) {
            Ok(true) => OperationReport::completed(),
            Ok(false) => OperationReport::completed().with_message("No local changes to stash"),
            Err(e) => MutationOutcome::from(e).into(),
        })
    }

    pub fn pop_stash(&mut self) -> Result<OperationReport> {
        let spec =
            OperationSpec::new("Stash pop", Refresh::STATUS).on_success("Restored stashed changes");
        self.run_reported(spec, |ctx| {
            MutationOutcome::from(ctx.backend.stash_pop(ctx.repo())).into()
        })
    }

    /// Take one side of a conflicted file. Whether the conflict is gone is whatever the
    /// following status refresh says.
    pub fn resolve_conflict(
        &mut self,
        path: &Path,
        strategy: ConflictStrategy,
    ) -> Result<OperationReport> {
        let spec = OperationSpec::new("Resolve conflict", Refresh::STATUS)
            .with_diff(path)
            .on_success(format!(
                "Resolved '{}' using {strategy}",
                path.display()
            ));
        self.run_reported(spec, |ctx| {
            MutationOutcome::from(ctx.backend.resolve_conflict(ctx.repo(), path, strategy)).into()
        })
    }

    /// Throw away local changes to one file after confirmation
    pub fn discard_file(&mut self, path: &Path) -> Result<OperationReport> {
        let spec = OperationSpec::new("Discard", Refresh::STATUS)
            .on_success(format!("Discarded changes to '{}'", path.display()));
        self.run_reported(spec, |ctx| {
            let files = match ctx.backend.status(ctx.repo()) {
                Ok(files) => files,
                Err(e) => return MutationOutcome::from(e).into(),
            };
            let entries: Vec<_> = files.iter().filter(|f| f.path == path).collect();
            if entries.is_empty() {
                return OperationReport::completed()
                    .with_message(format!("'{}' has no changes to discard", path.display()));
            }

            let action = RiskyAction::DiscardChanges {
                path: path.to_path_buf(),
            };
            if !ctx.sink.propose_risky_action(&action) {
                return OperationReport::new(OperationStatus::Declined);
            }

            let untracked = entries
                .iter()
                .all(|f| f.status == FileStatusKind::Untracked);
            let result = if untracked {
                ctx.backend.clean_file(ctx.repo(), path)
            } else {
                ctx.backend.discard_file(ctx.repo(), path)
            };
            MutationOutcome::from(result).into()
        })
    }

    pub fn delete_branch(&mut self, name: &str) -> Result<OperationReport> {
        let spec = OperationSpec::new("Delete branch", Refresh::BRANCHES)
            .on_success(format!("Deleted branch '{name}'"));
        self.run_reported(spec, |ctx| {
            if name.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyBranchName);
            }
            match ctx.backend.current_branch(ctx.repo()) {
                Ok(Some(current)) if current == name => {
                    return OperationReport::precondition(PreconditionError::current_branch(name));
                }
                Ok(_) => {}
                Err(e) => return MutationOutcome::from(e).into(),
            }

            let action = RiskyAction::DeleteBranch {
                name: name.to_string(),
            };
            if !ctx.sink.propose_risky_action(&action) {
                return OperationReport::new(OperationStatus::Declined);
            }

            MutationOutcome::from(ctx.backend.delete_branch(ctx.repo(), name, true)).into()
        })
    }

    /// Soft-reset the last commit; its changes stay staged
    pub fn undo_last_commit(&mut self) -> Result<OperationReport> {
        let spec = OperationSpec::new("Undo commit", Refresh::STATUS | Refresh::LOG)
            .on_success("Undid last commit; its changes are staged");
        self.run_reported(spec, |ctx| {
            MutationOutcome::from(ctx.backend.reset(ctx.repo(), ResetMode::Soft, "HEAD~1")).into()
        })
    }

    /// Hard-reset the last commit away and force-push the branch.
    ///
    /// Needs an explicit confirmation. Without a credential the local reset still happens
    /// but the force push is refused and the result says so.
    pub fn delete_last_commit(&mut self) -> Result<OperationReport> {
        let spec = OperationSpec::new(
            "Delete last commit",
            Refresh::STATUS | Refresh::LOG | Refresh::BRANCHES,
        )
        .on_success("Deleted last commit locally and on the remote");
        self.run_reported(spec, |ctx| {
            let branch = match ctx.backend.current_branch(ctx.repo()) {
                Ok(Some(branch)) => branch,
                Ok(None) => return OperationReport::precondition(PreconditionError::DetachedHead),
                Err(e) => return MutationOutcome::from(e).into(),
            };

            let action = RiskyAction::DeleteLastCommit {
                branch: branch.clone(),
            };
            if !ctx.sink.propose_risky_action(&action) {
                return OperationReport::new(OperationStatus::Declined);
            }

            if let Err(e) = ctx.backend.reset(ctx.repo(), ResetMode::Hard, "HEAD~1") {
                return MutationOutcome::from(e).into();
            }

            let Some(token) = ctx.token() else {
                log::warn!("Refusing to force push '{branch}' without a credential");
                ctx.sink.notify(
                    NotifyLevel::Error,
                    &format!(
                        "The remote history of '{branch}' was NOT rewritten: no credential is \
                         linked to this repository"
                    ),
                );
                return OperationReport::new(OperationStatus::CompletedLocalOnly(
                    "Last commit deleted locally only".to_string(),
                ));
            };

            let options = PushOptions::to_remote(ctx.remote).branch(branch).forced();
            MutationOutcome::from(ctx.backend.push(ctx.repo(), &options, Some(&token))).into()
        })
    }

    pub fn cherry_pick(&mut self, hash: &str) -> Result<OperationReport> {
        let spec = OperationSpec::new("Cherry-pick", Refresh::LOG | Refresh::STATUS)
            .on_success(format!("Cherry-picked {hash}"));
        self.run_reported(spec, |ctx| {
            if hash.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyCommitHash);
            }
            MutationOutcome::from(ctx.backend.cherry_pick(ctx.repo(), hash)).into()
        })
    }

    pub fn squash_commits(&mut self, count: usize, message: &str) -> Result<OperationReport> {
        let spec = OperationSpec::new("Squash", Refresh::LOG | Refresh::STATUS)
            .on_success(format!("Squashed {count} commits"));
        self.run_reported(spec, |ctx| {
            if count < 2 {
                return OperationReport::precondition(PreconditionError::squash_count_too_small(
                    count,
                ));
            }
            if message.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyMessage);
            }
            MutationOutcome::from(ctx.backend.squash_commits(ctx.repo(), count, message)).into()
        })
    }

    /// Replace the message of the last commit
    pub fn reword_commit(&mut self, message: &str) -> Result<OperationReport> {
        let spec = OperationSpec::new("Reword", Refresh::LOG).on_success("Reworded last commit");
        self.run_reported(spec, |ctx| {
            if message.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyMessage);
            }
            MutationOutcome::from(ctx.backend.reword_commit(ctx.repo(), message)).into()
        })
    }

    pub fn create_tag(
        &mut self,
        name: &str,
        message: Option<&str>,
        target: Option<&str>,
    ) -> Result<OperationReport> {
        let spec =
            OperationSpec::new("Create tag", Refresh::TAGS).on_success(format!("Created tag '{name}'"));
        self.run_reported(spec, |ctx| {
            if name.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyTagName);
            }
            let message = message.filter(|m| !m.trim().is_empty());
            MutationOutcome::from(ctx.backend.create_tag(ctx.repo(), name, message, target)).into()
        })
    }

    pub fn push_tag(&mut self, name: &str) -> Result<OperationReport> {
        let spec =
            OperationSpec::new("Push tag", Refresh::TAGS).on_success(format!("Pushed tag '{name}'"));
        self.run_reported(spec, |ctx| {
            if name.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyTagName);
            }
            let Some(token) = ctx.token() else {
                return OperationReport::new(OperationStatus::CompletedLocalOnly(format!(
                    "No credential is linked to this repository; tag '{name}' was not pushed"
                )));
            };
            MutationOutcome::from(ctx.backend.push_tag(ctx.repo(), ctx.remote, name, Some(&token)))
                .into()
        })
    }

    pub fn delete_tag(&mut self, name: &str) -> Result<OperationReport> {
        let spec =
            OperationSpec::new("Delete tag", Refresh::TAGS).on_success(format!("Deleted tag '{name}'"));
        self.run_reported(spec, |ctx| {
            if name.trim().is_empty() {
                return OperationReport::precondition(PreconditionError::EmptyTagName);
            }
            MutationOutcome::from(ctx.backend.delete_tag(ctx.repo(), name)).into()
        })
    }

    /// Reload every section of the active session
    pub fn refresh(&mut self) -> Result<OperationReport> {
        self.run_reported(OperationSpec::new("Refresh", Refresh::ALL), |_| {
            OperationReport::completed()
        })
    }
}
