use crate::core::error::{ConductorError, Result};
use std::path::PathBuf;

/// Per-user configuration directory, following XDG on Unix-likes
pub fn get_config_directory() -> Result<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config"))),
        "macos" => dirs::home_dir().map(|home| home.join("Library/Application Support")),
        _ => dirs::config_dir(),
    };

    base.map(|base| base.join("git-conductor"))
        .ok_or(ConductorError::ConfigDirectoryNotFound)
}
