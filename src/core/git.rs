//! `git2` + `git` CLI implementation of [`VcsBackend`].
//!
//! Reads (status, log, branches, tags, current branch) go through `git2`. Every mutation
//! shells out to the `git` binary in the repository's working directory so hooks, config
//! and credential helpers behave exactly as they do for the user's own `git`.
//!
//! Failures are classified before they leave this module: a rejected push becomes
//! [`BackendErrorKind::NonFastForward`], and a pull / merge / rebase / stash pop /
//! cherry-pick that stops with unmerged paths becomes [`BackendErrorKind::Conflict`] with
//! those paths read back from a fresh status.

use crate::core::{
    backend::{ConflictStrategy, PushOptions, ResetMode, VcsBackend},
    credentials::{Token, TOKEN_ENV_VAR},
    error::{BackendError, BackendErrorKind, BackendResult},
    git_status::FileStatusKind,
    state::{
        conflicted_paths, has_staged_changes, sort_file_statuses, BranchInfo, CommitInfo,
        FileStatus, TagInfo,
    },
};
use chrono::{DateTime, Utc};
use git2::{BranchType, Oid, Repository, StatusOptions};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Inline credential helper; the token itself travels in the child's environment
const CREDENTIAL_HELPER: &str =
    "credential.helper=!f() { echo username=x-access-token; echo \"password=$GIT_CONDUCTOR_TOKEN\"; }; f";

const DEFAULT_REMOTE: &str = "origin";

/// Markers `git push` prints when the remote refuses a non-fast-forward update
const REJECTION_MARKERS: [&str; 4] = [
    "[rejected]",
    "non-fast-forward",
    "fetch first",
    "Updates were rejected",
];

pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `git` executable instead of the one on `PATH`
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn open(repo: &Path) -> BackendResult<Repository> {
        Ok(Repository::open(repo)?)
    }

    fn command(&self, repo: &Path, token: Option<&Token>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(repo)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_EDITOR", "true");

        if let Some(token) = token {
            cmd.args(["-c", "credential.helper=", "-c", CREDENTIAL_HELPER])
                .env(TOKEN_ENV_VAR, token.secret());
        }

        cmd
    }

    /// Execute a git command, returning stdout on success
    fn execute(&self, mut cmd: Command) -> BackendResult<String> {
        log::debug!("Running {cmd:?}");
        let output = cmd.output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            log::debug!("git failed: {message}");
            return Err(BackendError::other(message));
        }

        Ok(stdout)
    }

    fn run(&self, repo: &Path, args: &[&str]) -> BackendResult<String> {
        let mut cmd = self.command(repo, None);
        cmd.args(args);
        self.execute(cmd)
    }

    fn run_with_paths(&self, repo: &Path, args: &[&str], paths: &[PathBuf]) -> BackendResult<()> {
        let mut cmd = self.command(repo, None);
        cmd.args(args).arg("--").args(paths);
        self.execute(cmd).map(|_| ())
    }

    /// Re-read the status after a failed merge-like command and turn unmerged paths into
    /// a conflict error
    fn classify_conflicts(&self, repo: &Path, err: BackendError) -> BackendError {
        match self.status(repo) {
            Ok(files) => {
                let conflicts = conflicted_paths(&files);
                if conflicts.is_empty() {
                    err
                } else {
                    BackendError::conflict(conflicts, err.message)
                }
            }
            Err(status_err) => {
                log::warn!("Could not read status after failed command: {status_err}");
                err
            }
        }
    }

    fn stash_tip(repo: &Path) -> BackendResult<Option<Oid>> {
        Ok(Self::open(repo)?.refname_to_id("refs/stash").ok())
    }

    fn has_head(repo: &Path) -> BackendResult<bool> {
        let repository = Self::open(repo)?;
        let has_head = repository.head().is_ok();
        Ok(has_head)
    }

    /// History rewrites would fold staged work into the commits they create
    fn ensure_nothing_staged(&self, repo: &Path, action: &str) -> BackendResult<()> {
        if has_staged_changes(&self.status(repo)?) {
            return Err(BackendError::other(format!(
                "Cannot {action} with staged changes; commit or unstage them first"
            )));
        }
        Ok(())
    }
}

fn is_rejection(message: &str) -> bool {
    REJECTION_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

fn to_utc(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}

fn short(oid: Oid) -> String {
    oid.to_string()[..7].to_string()
}

/// Short names of every branch and tag, keyed by the commit they point at
fn refs_by_commit(repository: &Repository) -> BackendResult<HashMap<Oid, Vec<String>>> {
    let mut refs: HashMap<Oid, Vec<String>> = HashMap::new();

    for reference in repository.references()? {
        let reference = reference?;
        let Some(name) = reference.shorthand() else {
            continue;
        };
        if name.ends_with("/HEAD") {
            continue;
        }
        let name = name.to_string();
        if let Ok(commit) = reference.peel_to_commit() {
            refs.entry(commit.id()).or_default().push(name);
        }
    }

    Ok(refs)
}

impl VcsBackend for GitCli {
    fn status(&self, repo: &Path) -> BackendResult<Vec<FileStatus>> {
        let repository = Self::open(repo)?;

        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .renames_head_to_index(true);

        let statuses = repository.statuses(Some(&mut opts))?;
        let mut files = Vec::new();

        for entry in statuses.iter() {
            let path = entry
                .path()
                .ok_or_else(|| BackendError::other("Invalid UTF-8 path in repository"))?;
            let flags = entry.status();

            if let Some(status) = FileStatusKind::from_git2_staged(flags) {
                let old_path = entry
                    .head_to_index()
                    .and_then(|delta| delta.old_file().path().map(Path::to_path_buf))
                    .filter(|old| old != Path::new(path));
                files.push(FileStatus {
                    path: PathBuf::from(path),
                    status,
                    staged: true,
                    old_path,
                });
            }

            if let Some(status) = FileStatusKind::from_git2_unstaged(flags) {
                files.push(FileStatus::new(path, status, false));
            }
        }

        sort_file_statuses(&mut files);
        Ok(files)
    }

    fn stage(&self, repo: &Path, paths: &[PathBuf]) -> BackendResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.run_with_paths(repo, &["add"], paths)
    }

    fn unstage(&self, repo: &Path, paths: &[PathBuf]) -> BackendResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        if Self::has_head(repo)? {
            self.run_with_paths(repo, &["reset", "-q", "HEAD"], paths)
        } else {
            // Nothing to reset to before the first commit
            self.run_with_paths(repo, &["rm", "--cached", "-r", "-q"], paths)
        }
    }

    fn commit(&self, repo: &Path, message: &str) -> BackendResult<()> {
        self.run(repo, &["commit", "-m", message])
            .map(|_| ())
            .map_err(|err| {
                if err.message.contains("nothing to commit")
                    || err.message.contains("no changes added to commit")
                {
                    BackendError::new(BackendErrorKind::NothingToCommit, err.message)
                } else {
                    err
                }
            })
    }

    fn push(
        &self,
        repo: &Path,
        options: &PushOptions,
        token: Option<&Token>,
    ) -> BackendResult<()> {
        let mut cmd = self.command(repo, token);
        cmd.arg("push");
        if options.force {
            cmd.arg("--force");
        }
        if options.set_upstream {
            cmd.arg("--set-upstream");
        }
        match (&options.remote, &options.branch) {
            (Some(remote), Some(branch)) => {
                cmd.args([remote, branch]);
            }
            (Some(remote), None) => {
                cmd.arg(remote);
            }
            (None, Some(branch)) => {
                cmd.args([DEFAULT_REMOTE, branch.as_str()]);
            }
            (None, None) => {}
        }

        self.execute(cmd).map(|_| ()).map_err(|err| {
            if is_rejection(&err.message) {
                BackendError::non_fast_forward(err.message)
            } else {
                err
            }
        })
    }

    fn pull(&self, repo: &Path, token: Option<&Token>) -> BackendResult<()> {
        let mut cmd = self.command(repo, token);
        cmd.args(["pull", "--no-rebase", "--no-edit"]);
        self.execute(cmd)
            .map(|_| ())
            .map_err(|err| self.classify_conflicts(repo, err))
    }

    fn checkout(&self, repo: &Path, branch: &str, create: bool) -> BackendResult<()> {
        if create {
            self.run(repo, &["checkout", "-b", branch]).map(|_| ())
        } else {
            self.run(repo, &["checkout", branch]).map(|_| ())
        }
    }

    fn stash(&self, repo: &Path) -> BackendResult<bool> {
        let before = Self::stash_tip(repo)?;
        self.run(
            repo,
            &[
                "stash",
                "push",
                "--include-untracked",
                "-m",
                "git-conductor auto-stash",
            ],
        )?;
        // `git stash` succeeds without creating an entry when there is nothing to save
        Ok(Self::stash_tip(repo)? != before)
    }

    fn stash_pop(&self, repo: &Path) -> BackendResult<()> {
        self.run(repo, &["stash", "pop"])
            .map(|_| ())
            .map_err(|err| self.classify_conflicts(repo, err))
    }

    fn merge(&self, repo: &Path, branch: &str) -> BackendResult<()> {
        self.run(repo, &["merge", "--no-edit", branch])
            .map(|_| ())
            .map_err(|err| self.classify_conflicts(repo, err))
    }

    fn rebase(&self, repo: &Path, branch: &str) -> BackendResult<()> {
        self.run(repo, &["rebase", branch])
            .map(|_| ())
            .map_err(|err| self.classify_conflicts(repo, err))
    }

    fn reset(&self, repo: &Path, mode: ResetMode, target: &str) -> BackendResult<()> {
        self.run(repo, &["reset", "-q", mode.as_flag(), target])
            .map(|_| ())
    }

    fn delete_branch(&self, repo: &Path, name: &str, force: bool) -> BackendResult<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run(repo, &["branch", flag, name]).map(|_| ())
    }

    fn create_tag(
        &self,
        repo: &Path,
        name: &str,
        message: Option<&str>,
        target: Option<&str>,
    ) -> BackendResult<()> {
        let mut args = vec!["tag"];
        if let Some(message) = message {
            args.extend(["-a", name, "-m", message]);
        } else {
            args.push(name);
        }
        if let Some(target) = target {
            args.push(target);
        }
        self.run(repo, &args).map(|_| ())
    }

    fn push_tag(
        &self,
        repo: &Path,
        remote: &str,
        name: &str,
        token: Option<&Token>,
    ) -> BackendResult<()> {
        let mut cmd = self.command(repo, token);
        cmd.args(["push", remote])
            .arg(format!("refs/tags/{name}"));
        self.execute(cmd).map(|_| ())
    }

    fn delete_tag(&self, repo: &Path, name: &str) -> BackendResult<()> {
        self.run(repo, &["tag", "-d", name]).map(|_| ())
    }

    fn cherry_pick(&self, repo: &Path, hash: &str) -> BackendResult<()> {
        self.ensure_nothing_staged(repo, "cherry-pick")?;
        self.run(repo, &["cherry-pick", hash])
            .map(|_| ())
            .map_err(|err| self.classify_conflicts(repo, err))
    }

    fn squash_commits(&self, repo: &Path, count: usize, message: &str) -> BackendResult<()> {
        self.ensure_nothing_staged(repo, "squash")?;
        let target = format!("HEAD~{count}");
        self.run(repo, &["reset", "-q", "--soft", &target])?;

        if let Err(err) = self.run(repo, &["commit", "-m", message]) {
            // Put the branch back where it was so a failed squash loses nothing
            if let Err(restore_err) = self.run(repo, &["reset", "-q", "--soft", "ORIG_HEAD"]) {
                log::warn!("Could not restore branch after failed squash: {restore_err}");
            }
            return Err(err);
        }

        Ok(())
    }

    fn reword_commit(&self, repo: &Path, message: &str) -> BackendResult<()> {
        // --only keeps whatever is staged out of the amended commit
        self.run(repo, &["commit", "--amend", "--only", "-m", message])
            .map(|_| ())
    }

    fn discard_file(&self, repo: &Path, path: &Path) -> BackendResult<()> {
        let paths = [path.to_path_buf()];
        let staged = self
            .status(repo)?
            .iter()
            .any(|f| f.path == path && f.staged);
        if staged {
            self.unstage(repo, &paths)?;
        }

        // A staged new file is untracked once unstaged
        let untracked = self
            .status(repo)?
            .iter()
            .any(|f| f.path == path && f.status == FileStatusKind::Untracked);
        if untracked {
            self.clean_file(repo, path)
        } else {
            self.run_with_paths(repo, &["checkout"], &paths)
        }
    }

    fn clean_file(&self, repo: &Path, path: &Path) -> BackendResult<()> {
        self.run_with_paths(repo, &["clean", "-f", "-d"], &[path.to_path_buf()])
    }

    fn resolve_conflict(
        &self,
        repo: &Path,
        path: &Path,
        strategy: ConflictStrategy,
    ) -> BackendResult<()> {
        let paths = [path.to_path_buf()];
        self.run_with_paths(repo, &["checkout", strategy.as_flag()], &paths)?;
        self.run_with_paths(repo, &["add"], &paths)
    }

    fn log(&self, repo: &Path, limit: usize) -> BackendResult<Vec<CommitInfo>> {
        let repository = Self::open(repo)?;
        if repository.head().is_err() {
            return Ok(Vec::new());
        }

        let refs = refs_by_commit(&repository)?;
        let mut walk = repository.revwalk()?;
        walk.push_head()?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

        let mut commits = Vec::new();
        for oid in walk.take(limit) {
            let oid = oid?;
            let commit = repository.find_commit(oid)?;
            let author = commit.author();

            commits.push(CommitInfo {
                hash: oid.to_string(),
                short_hash: short(oid),
                message: commit.summary().unwrap_or("").to_string(),
                author: author.name().unwrap_or("").to_string(),
                email: author.email().unwrap_or("").to_string(),
                date: to_utc(commit.time().seconds()),
                refs: refs.get(&oid).cloned().unwrap_or_default(),
            });
        }

        Ok(commits)
    }

    fn branches(&self, repo: &Path) -> BackendResult<Vec<BranchInfo>> {
        let repository = Self::open(repo)?;
        let mut branches = Vec::new();

        for branch in repository.branches(None)? {
            let (branch, branch_type) = branch?;
            let Some(name) = branch.name()? else {
                continue;
            };
            if name.ends_with("/HEAD") {
                continue;
            }

            branches.push(BranchInfo {
                name: name.to_string(),
                current: branch.is_head(),
                remote: branch_type == BranchType::Remote,
                last_commit: branch.get().target().map(short),
            });
        }

        branches.sort_by(|a, b| a.remote.cmp(&b.remote).then_with(|| a.name.cmp(&b.name)));
        Ok(branches)
    }

    fn tags(&self, repo: &Path) -> BackendResult<Vec<TagInfo>> {
        let repository = Self::open(repo)?;
        let mut tags = Vec::new();

        for name in repository.tag_names(None)?.iter().flatten() {
            let reference = repository.find_reference(&format!("refs/tags/{name}"))?;
            let commit = reference.peel_to_commit()?;

            let (message, seconds) = match reference.peel_to_tag() {
                Ok(tag) => (
                    tag.message().unwrap_or("").trim().to_string(),
                    tag.tagger()
                        .map(|tagger| tagger.when().seconds())
                        .unwrap_or_else(|| commit.time().seconds()),
                ),
                Err(_) => (
                    commit.summary().unwrap_or("").to_string(),
                    commit.time().seconds(),
                ),
            };

            tags.push(TagInfo {
                name: name.to_string(),
                date: to_utc(seconds),
                message,
                hash: commit.id().to_string(),
            });
        }

        tags.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.name.cmp(&b.name)));
        Ok(tags)
    }

    fn diff(&self, repo: &Path, path: &Path) -> BackendResult<String> {
        let paths = [path.to_path_buf()];
        let mut cmd = self.command(repo, None);
        cmd.args(["diff", "--no-color", "--"]).args(&paths);
        let unstaged = self.execute(cmd)?;
        if !unstaged.is_empty() {
            return Ok(unstaged);
        }

        let mut cmd = self.command(repo, None);
        cmd.args(["diff", "--no-color", "--cached", "--"]).args(&paths);
        self.execute(cmd)
    }

    fn current_branch(&self, repo: &Path) -> BackendResult<Option<String>> {
        let repository = Self::open(repo)?;
        let head = match repository.head() {
            Ok(head) => head,
            Err(_) => return Ok(None),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(str::to_string))
        } else {
            Ok(None)
        }
    }
}
