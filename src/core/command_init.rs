//! Shared setup for CLI commands.
//!
//! Every subcommand needs the same things before it can do anything: find the repository,
//! load the config, pick the identity, and open the repository in an orchestrator wired to
//! the real backend and the terminal. [`CommandContext::initialize`] does all of it.

use crate::core::{
    config::ConductorConfig,
    credentials::{CredentialProvider, EnvCredentialProvider, Token},
    error::{ConductorError, Result},
    git::GitCli,
    orchestrator::MutationOrchestrator,
    output::TerminalSink,
    state::RepositoryHandle,
};
use git2::Repository;
use std::env;
use std::path::{Path, PathBuf};

pub type CliOrchestrator = MutationOrchestrator<GitCli, EnvCredentialProvider, TerminalSink>;

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub repo: Option<PathBuf>,
    pub identity: Option<String>,
    pub assume_yes: bool,
}

pub struct CommandContext {
    pub orchestrator: CliOrchestrator,
    pub config: ConductorConfig,
    pub repo_path: PathBuf,
}

impl CommandContext {
    pub fn initialize(options: &GlobalOptions) -> Result<Self> {
        let start = match &options.repo {
            Some(path) => path.clone(),
            None => env::current_dir()?,
        };
        let repo_path = discover_workdir(&start)?;

        let config = match ConductorConfig::load_or_default() {
            Ok(config) => config,
            Err(ConductorError::ConfigDirectoryNotFound) => {
                log::warn!("No configuration directory, using defaults");
                ConductorConfig::default()
            }
            Err(e) => return Err(e),
        };

        let identity = options
            .identity
            .clone()
            .or_else(|| config.identity_for(&repo_path));
        log::debug!(
            "Repository {} with identity {:?}",
            repo_path.display(),
            identity
        );

        let mut handle = RepositoryHandle::new(&repo_path);
        handle.identity = identity;

        let mut orchestrator = MutationOrchestrator::with_config(
            GitCli::new(),
            EnvCredentialProvider,
            TerminalSink::new(options.assume_yes),
            &config,
        );
        orchestrator.open_repository(handle);

        Ok(Self {
            orchestrator,
            config,
            repo_path,
        })
    }

    /// Token for the repository's identity, if the environment provides one
    pub fn token(&self) -> Option<Token> {
        let identity = self.orchestrator.session()?.handle().identity.clone()?;
        self.orchestrator.credentials().get_token(&identity)
    }
}

/// Working directory of the repository containing `start`
pub fn discover_workdir(start: &Path) -> Result<PathBuf> {
    let repository = Repository::discover(start).map_err(|_| ConductorError::NotInGitRepo)?;
    let workdir = repository.workdir().ok_or(ConductorError::NotInGitRepo)?;
    // git2 reports the workdir with a trailing separator
    Ok(workdir.components().collect())
}
