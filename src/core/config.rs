use crate::core::dirs::get_config_directory;
use crate::core::error::{ConductorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

fn default_remote() -> String {
    "origin".to_string()
}

fn default_log_limit() -> usize {
    50
}

/// User settings for git-conductor, stored as JSON in the config directory
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConductorConfig {
    /// Remote used for push, publish and tag pushes
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Number of commits kept in a session's log snapshot
    #[serde(default = "default_log_limit")]
    pub log_limit: usize,

    /// Identity used when a repository has no entry in `identities`
    #[serde(default)]
    pub default_identity: Option<String>,

    /// Repository path → identity whose token authenticates network operations
    #[serde(default)]
    pub identities: BTreeMap<String, String>,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            log_limit: default_log_limit(),
            default_identity: None,
            identities: BTreeMap::new(),
        }
    }
}

impl ConductorConfig {
    pub fn config_file() -> Result<PathBuf> {
        Ok(get_config_directory()?.join(CONFIG_FILE))
    }

    /// Load the user's config file, falling back to defaults when it does not exist
    pub fn load_or_default() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_limit == 0 {
            return Err(ConductorError::config("log_limit must be at least 1"));
        }
        if self.remote.trim().is_empty() {
            return Err(ConductorError::config("remote cannot be empty"));
        }
        Ok(())
    }

    /// Identity configured for the repository at `repo_path`
    pub fn identity_for(&self, repo_path: &Path) -> Option<String> {
        self.identities
            .get(&*repo_path.to_string_lossy())
            .or(self.default_identity.as_ref())
            .cloned()
    }
}
