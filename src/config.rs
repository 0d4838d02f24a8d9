use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// Environment variable naming a configuration file to use.
pub const CONFIG_ENV_VAR: &str = "GIT_RELEASE_CONFIG";

/// Repository-local configuration file, looked up in the repository root.
pub const LOCAL_CONFIG_FILE: &str = ".gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Controls where tags are fetched from before deploying and which key signs
/// new release tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Remote to fetch tags from before resolving a deploy target
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Whether deploys fetch tags first
    #[serde(default = "default_fetch")]
    pub fetch: bool,

    /// Key id passed to `git tag -u`; git's configured default when absent
    #[serde(default)]
    pub signing_key: Option<String>,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_fetch() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
            fetch: default_fetch(),
            signing_key: None,
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("git-release").join("config.toml"))
}

fn read_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("cannot read '{}': {}", path.display(), e))
    })?;

    toml::from_str(&text)
        .map_err(|e| ReleaseError::config(format!("cannot parse '{}': {}", path.display(), e)))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. The file named by `$GIT_RELEASE_CONFIG`
/// 3. `.gitrelease.toml` in the repository root
/// 4. `git-release/config.toml` in the user config directory
/// 5. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `repo_root` - Repository working directory
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file was named or found but cannot be read or parsed
pub fn load_config(config_path: Option<&str>, repo_root: &Path) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return read_config(Path::new(&path));
        }
    }

    let local = repo_root.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return read_config(&local);
    }

    match user_config_path() {
        Some(path) if path.exists() => read_config(&path),
        _ => Ok(Config::default()),
    }
}
