//! Persistence for `.spr.toml` and the user config file.

use super::{RepoConfig, UserConfig};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the repository config, relative to the repository root.
const REPO_CONFIG_FILE: &str = ".spr.toml";

/// Directory name for spr within the user's config directory.
const SPR_DIR: &str = "spr";

/// Filename of the user config within [`SPR_DIR`].
const USER_CONFIG_FILE: &str = "config.toml";

/// Get path to the repository config file.
pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(REPO_CONFIG_FILE)
}

/// Get path to the user config file, given the platform config directory
/// (`dirs::config_dir()` in the binary).
pub fn user_config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SPR_DIR).join(USER_CONFIG_FILE)
}

/// Load the repository config.
///
/// Returns `None` if the file doesn't exist so the caller can derive defaults
/// from the remote.
pub fn load_repo_config(repo_root: &Path) -> Result<Option<RepoConfig>> {
    let path = repo_config_path(repo_root);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: RepoConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    Ok(Some(config))
}

/// Save the repository config.
pub fn save_repo_config(repo_root: &Path, config: &RepoConfig) -> Result<()> {
    let path = repo_config_path(repo_root);

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("failed to serialize repo config: {e}")))?;

    let content_with_header = format!(
        "# spr repository config\n# Generated from the git remote - edit to change trunk, remote or merge policy\n\n{content}"
    );

    fs::write(&path, content_with_header)
        .map_err(|e| Error::Config(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}

/// Load the user config.
///
/// Returns the default config if the file doesn't exist.
pub fn load_user_config(config_dir: &Path) -> Result<UserConfig> {
    let path = user_config_path(config_dir);

    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}
