//! Recording fakes for orchestrator tests
//!
//! [`FakeBackend`] keeps a tiny model of a working tree (a status listing, a stash stack,
//! the current branch, the messages committed so far) and records every mutating call as a
//! short string such as `"push --force origin main"`. Reads are only counted. Failures are
//! scripted per operation name and consumed in order; a scripted conflict also marks its
//! paths as conflicted, the way a stopped merge leaves the tree.

#![allow(dead_code)]

use git_conductor::core::{
    BackendError, BackendResult, BranchInfo, CommitInfo, ConflictStrategy, DecisionSink,
    FileStatus, FileStatusKind, MutationOrchestrator, NotifyLevel, PushOptions, ResetMode,
    RepositoryHandle, RiskyAction, StaticCredentialProvider, TagInfo, VcsBackend,
};
use chrono::Utc;
use git_conductor::core::credentials::Token;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

pub const REPO: &str = "/work/repo";
pub const IDENTITY: &str = "octocat";

#[derive(Default)]
pub struct FakeBackend {
    calls: RefCell<Vec<String>>,
    files: RefCell<Vec<FileStatus>>,
    stashes: RefCell<Vec<Vec<FileStatus>>>,
    current: RefCell<Option<String>>,
    failures: RefCell<HashMap<&'static str, VecDeque<BackendError>>>,
    /// When set, `stash` reports that nothing was saved even if the tree is dirty
    stash_saves_nothing: Cell<bool>,
    tokens_seen: RefCell<Vec<Option<String>>>,
    commits: RefCell<Vec<String>>,
    reads: RefCell<HashMap<&'static str, usize>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        *backend.current.borrow_mut() = Some("main".to_string());
        backend
    }

    pub fn with_files(self, files: Vec<FileStatus>) -> Self {
        *self.files.borrow_mut() = files;
        self
    }

    pub fn dirty() -> Self {
        Self::new().with_files(vec![FileStatus::new(
            "notes.txt",
            FileStatusKind::Modified,
            false,
        )])
    }

    pub fn with_staged() -> Self {
        Self::new().with_files(vec![FileStatus::new("a.txt", FileStatusKind::Added, true)])
    }

    pub fn detached(self) -> Self {
        *self.current.borrow_mut() = None;
        self
    }

    pub fn on_branch(self, name: &str) -> Self {
        *self.current.borrow_mut() = Some(name.to_string());
        self
    }

    pub fn stash_saves_nothing(self) -> Self {
        self.stash_saves_nothing.set(true);
        self
    }

    /// Make the next call of `op` fail with `error`
    pub fn fail_next(&self, op: &'static str, error: BackendError) {
        self.failures
            .borrow_mut()
            .entry(op)
            .or_default()
            .push_back(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls whose first word is `op`
    pub fn count(&self, op: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.split_whitespace().next() == Some(op))
            .count()
    }

    pub fn called(&self, op: &str) -> bool {
        self.count(op) > 0
    }

    /// Number of times the read `op` ran, refreshes included
    pub fn reads(&self, op: &str) -> usize {
        self.reads.borrow().get(op).copied().unwrap_or(0)
    }

    /// Change the working tree behind the orchestrator's back
    pub fn add_file(&self, file: FileStatus) {
        self.files.borrow_mut().push(file);
    }

    pub fn files(&self) -> Vec<FileStatus> {
        self.files.borrow().clone()
    }

    pub fn stash_depth(&self) -> usize {
        self.stashes.borrow().len()
    }

    /// Secrets of the tokens passed to network calls, in order
    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.tokens_seen.borrow().clone()
    }

    fn scripted(&self, op: &'static str) -> BackendResult<()> {
        match self
            .failures
            .borrow_mut()
            .get_mut(op)
            .and_then(VecDeque::pop_front)
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record(&self, op: &'static str, detail: String) -> BackendResult<()> {
        let call = if detail.is_empty() {
            op.to_string()
        } else {
            format!("{op} {detail}")
        };
        self.calls.borrow_mut().push(call);
        let result = self.scripted(op);
        if let Some(paths) = result.as_ref().err().and_then(BackendError::conflicts) {
            let mut files = self.files.borrow_mut();
            files.retain(|f| !paths.contains(&f.path));
            files.extend(
                paths
                    .iter()
                    .map(|p| FileStatus::new(p.clone(), FileStatusKind::Conflict, false)),
            );
        }
        result
    }

    fn read(&self, op: &'static str) -> BackendResult<()> {
        *self.reads.borrow_mut().entry(op).or_default() += 1;
        self.scripted(op)
    }

    fn see_token(&self, token: Option<&Token>) {
        self.tokens_seen
            .borrow_mut()
            .push(token.map(|t| t.secret().to_string()));
    }
}

impl VcsBackend for FakeBackend {
    fn status(&self, _repo: &Path) -> BackendResult<Vec<FileStatus>> {
        self.read("status")?;
        Ok(self.files.borrow().clone())
    }

    fn stage(&self, _repo: &Path, paths: &[PathBuf]) -> BackendResult<()> {
        let detail = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.record("stage", detail)?;
        for file in self.files.borrow_mut().iter_mut() {
            if paths.contains(&file.path) {
                file.staged = true;
            }
        }
        Ok(())
    }

    fn unstage(&self, _repo: &Path, paths: &[PathBuf]) -> BackendResult<()> {
        let detail = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.record("unstage", detail)?;
        for file in self.files.borrow_mut().iter_mut() {
            if paths.contains(&file.path) {
                file.staged = false;
            }
        }
        Ok(())
    }

    fn commit(&self, _repo: &Path, message: &str) -> BackendResult<()> {
        self.record("commit", message.to_string())?;
        self.files.borrow_mut().retain(|f| !f.staged);
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn push(&self, _repo: &Path, options: &PushOptions, token: Option<&Token>) -> BackendResult<()> {
        self.see_token(token);
        let mut detail = Vec::new();
        if options.force {
            detail.push("--force".to_string());
        }
        if options.set_upstream {
            detail.push("--set-upstream".to_string());
        }
        detail.extend(options.remote.clone());
        detail.extend(options.branch.clone());
        self.record("push", detail.join(" "))
    }

    fn pull(&self, _repo: &Path, token: Option<&Token>) -> BackendResult<()> {
        self.see_token(token);
        self.record("pull", String::new())
    }

    fn checkout(&self, _repo: &Path, branch: &str, create: bool) -> BackendResult<()> {
        let detail = if create {
            format!("-b {branch}")
        } else {
            branch.to_string()
        };
        self.record("checkout", detail)?;
        *self.current.borrow_mut() = Some(branch.to_string());
        Ok(())
    }

    fn stash(&self, _repo: &Path) -> BackendResult<bool> {
        self.record("stash", String::new())?;
        if self.stash_saves_nothing.get() || self.files.borrow().is_empty() {
            return Ok(false);
        }
        let saved = std::mem::take(&mut *self.files.borrow_mut());
        self.stashes.borrow_mut().push(saved);
        Ok(true)
    }

    fn stash_pop(&self, _repo: &Path) -> BackendResult<()> {
        self.record("stash_pop", String::new())?;
        if let Some(saved) = self.stashes.borrow_mut().pop() {
            self.files.borrow_mut().extend(saved);
        }
        Ok(())
    }

    fn merge(&self, _repo: &Path, branch: &str) -> BackendResult<()> {
        self.record("merge", branch.to_string())
    }

    fn rebase(&self, _repo: &Path, branch: &str) -> BackendResult<()> {
        self.record("rebase", branch.to_string())
    }

    fn reset(&self, _repo: &Path, mode: ResetMode, target: &str) -> BackendResult<()> {
        self.record("reset", format!("{} {target}", mode.as_flag()))
    }

    fn delete_branch(&self, _repo: &Path, name: &str, force: bool) -> BackendResult<()> {
        let detail = if force {
            format!("--force {name}")
        } else {
            name.to_string()
        };
        self.record("delete_branch", detail)
    }

    fn create_tag(
        &self,
        _repo: &Path,
        name: &str,
        message: Option<&str>,
        target: Option<&str>,
    ) -> BackendResult<()> {
        let mut detail = name.to_string();
        if let Some(message) = message {
            detail.push_str(&format!(" -m {message}"));
        }
        if let Some(target) = target {
            detail.push_str(&format!(" {target}"));
        }
        self.record("create_tag", detail)
    }

    fn push_tag(
        &self,
        _repo: &Path,
        remote: &str,
        name: &str,
        token: Option<&Token>,
    ) -> BackendResult<()> {
        self.see_token(token);
        self.record("push_tag", format!("{remote} {name}"))
    }

    fn delete_tag(&self, _repo: &Path, name: &str) -> BackendResult<()> {
        self.record("delete_tag", name.to_string())
    }

    fn cherry_pick(&self, _repo: &Path, hash: &str) -> BackendResult<()> {
        self.record("cherry_pick", hash.to_string())
    }

    fn squash_commits(&self, _repo: &Path, count: usize, message: &str) -> BackendResult<()> {
        self.record("squash", format!("{count} {message}"))
    }

    fn reword_commit(&self, _repo: &Path, message: &str) -> BackendResult<()> {
        self.record("reword", message.to_string())
    }

    fn discard_file(&self, _repo: &Path, path: &Path) -> BackendResult<()> {
        self.record("discard", path.display().to_string())?;
        self.files.borrow_mut().retain(|f| f.path != path);
        Ok(())
    }

    fn clean_file(&self, _repo: &Path, path: &Path) -> BackendResult<()> {
        self.record("clean", path.display().to_string())?;
        self.files.borrow_mut().retain(|f| f.path != path);
        Ok(())
    }

    fn resolve_conflict(
        &self,
        _repo: &Path,
        path: &Path,
        strategy: ConflictStrategy,
    ) -> BackendResult<()> {
        self.record("resolve", format!("{} {strategy}", path.display()))?;
        for file in self.files.borrow_mut().iter_mut() {
            if file.path == path && file.is_conflict() {
                file.status = FileStatusKind::Modified;
                file.staged = true;
            }
        }
        Ok(())
    }

    fn log(&self, _repo: &Path, limit: usize) -> BackendResult<Vec<CommitInfo>> {
        self.read("log")?;
        let commits = self.commits.borrow();
        Ok(commits
            .iter()
            .enumerate()
            .rev()
            .take(limit)
            .map(|(n, message)| {
                let hash = format!("{:040x}", n + 1);
                CommitInfo {
                    short_hash: hash[..7].to_string(),
                    hash,
                    message: message.clone(),
                    author: "Fake Author".to_string(),
                    email: "fake@example.com".to_string(),
                    date: Utc::now(),
                    refs: Vec::new(),
                }
            })
            .collect())
    }

    fn branches(&self, _repo: &Path) -> BackendResult<Vec<BranchInfo>> {
        self.read("branches")?;
        Ok(self
            .current
            .borrow()
            .iter()
            .map(|name| BranchInfo {
                name: name.clone(),
                current: true,
                remote: false,
                last_commit: None,
            })
            .collect())
    }

    fn tags(&self, _repo: &Path) -> BackendResult<Vec<TagInfo>> {
        self.read("tags")?;
        Ok(Vec::new())
    }

    fn diff(&self, _repo: &Path, path: &Path) -> BackendResult<String> {
        self.read("diff")?;
        Ok(format!("diff of {}", path.display()))
    }

    fn current_branch(&self, _repo: &Path) -> BackendResult<Option<String>> {
        self.read("current_branch")?;
        Ok(self.current.borrow().clone())
    }
}

/// Sink that answers every proposal the same way and records everything it sees
pub struct RecordingSink {
    answer: bool,
    proposals: RefCell<Vec<RiskyAction>>,
    notices: RefCell<Vec<(NotifyLevel, String)>>,
}

impl RecordingSink {
    pub fn accepting() -> Self {
        Self::answering(true)
    }

    pub fn declining() -> Self {
        Self::answering(false)
    }

    fn answering(answer: bool) -> Self {
        Self {
            answer,
            proposals: RefCell::new(Vec::new()),
            notices: RefCell::new(Vec::new()),
        }
    }

    pub fn proposals(&self) -> Vec<RiskyAction> {
        self.proposals.borrow().clone()
    }

    pub fn notices(&self) -> Vec<(NotifyLevel, String)> {
        self.notices.borrow().clone()
    }

    pub fn has_notice(&self, level: NotifyLevel, fragment: &str) -> bool {
        self.notices
            .borrow()
            .iter()
            .any(|(l, message)| *l == level && message.contains(fragment))
    }
}

impl DecisionSink for RecordingSink {
    fn propose_risky_action(&self, action: &RiskyAction) -> bool {
        self.proposals.borrow_mut().push(action.clone());
        self.answer
    }

    fn notify(&self, level: NotifyLevel, message: &str) {
        self.notices.borrow_mut().push((level, message.to_string()));
    }
}

pub type TestOrchestrator =
    MutationOrchestrator<FakeBackend, StaticCredentialProvider, RecordingSink>;

pub fn with_token() -> StaticCredentialProvider {
    StaticCredentialProvider::new().with_token(IDENTITY, "s3cret")
}

pub fn without_token() -> StaticCredentialProvider {
    StaticCredentialProvider::new()
}

/// Orchestrator with [`REPO`] open and active under [`IDENTITY`]
pub fn orchestrator(
    backend: FakeBackend,
    credentials: StaticCredentialProvider,
    sink: RecordingSink,
) -> TestOrchestrator {
    let mut orchestrator = MutationOrchestrator::new(backend, credentials, sink);
    orchestrator.open_repository(RepositoryHandle::new(REPO).with_identity(IDENTITY));
    orchestrator
}

pub fn conflict(paths: &[&str]) -> BackendError {
    BackendError::conflict(
        paths.iter().map(PathBuf::from).collect(),
        "CONFLICT (content): Merge conflict",
    )
}
