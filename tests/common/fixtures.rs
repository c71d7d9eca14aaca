//! Predefined repository scenarios

#![allow(dead_code)]

use super::repository::*;
use anyhow::Result;

/// A bare remote plus a clone of it that already pushed "Initial commit" to `main`
pub struct RemoteScenario {
    pub remote: TestRepo,
    pub local: TestRepo,
}

pub fn create_repo_with_remote() -> Result<RemoteScenario> {
    let remote = setup_bare_remote()?;
    let local = clone_repo(&remote.path)?;
    // Cloning an empty remote leaves HEAD on the machine's default branch name
    git(&local.path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;

    commit_file(&local.path, "README.md", "# project\n", "Initial commit")?;
    git(&local.path, &["push", "-q", "-u", "origin", "main"])?;

    Ok(RemoteScenario { remote, local })
}

/// Two clones of one remote whose `main` branches edited `shared.txt` differently.
/// `other` has pushed its edit; `local` has only committed its own.
pub struct DivergedScenario {
    pub remote: TestRepo,
    pub local: TestRepo,
    pub other: TestRepo,
}

pub fn create_diverged_repos() -> Result<DivergedScenario> {
    let RemoteScenario { remote, local } = create_repo_with_remote()?;
    commit_file(&local.path, "shared.txt", "base\n", "add shared")?;
    git(&local.path, &["push", "-q", "origin", "main"])?;

    let other = clone_repo(&remote.path)?;
    commit_file(&other.path, "shared.txt", "theirs\n", "their edit")?;
    git(&other.path, &["push", "-q", "origin", "main"])?;

    commit_file(&local.path, "shared.txt", "ours\n", "our edit")?;
    git(&local.path, &["config", "pull.rebase", "false"])?;

    Ok(DivergedScenario {
        remote,
        local,
        other,
    })
}

/// Repository with three modified tracked files and two untracked ones
pub fn create_multi_file_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    for name in ["file1.txt", "file2.txt", "file3.txt"] {
        create_file(&repo.path, name, "original\n")?;
    }
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Initial commit")?;

    for name in ["file1.txt", "file2.txt", "file3.txt"] {
        create_file(&repo.path, name, "modified\n")?;
    }
    create_file(&repo.path, "file4.txt", "new\n")?;
    create_file(&repo.path, "file5.txt", "new\n")?;

    Ok(repo)
}
