//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by the update and merge commands.

use spr::config::{RepoConfig, UserConfig, load_repo_config, load_user_config, save_repo_config};
use spr::error::{Error, Result};
use spr::git::{self, GitCli, VersionControl};
use spr::platform::{PlatformService, create_platform_service, parse_repo_info, select_remote};
use spr::sync::SyncContext;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Shared context for CLI commands that talk to GitHub
///
/// This struct encapsulates the common setup:
/// - Opening the git working tree
/// - Loading (or deriving and saving) the repository config
/// - Loading the user config
/// - Creating the platform service and resolving the current user
/// - Reading the checked-out branch
pub struct CommandContext {
    /// Git working tree
    pub vcs: Arc<dyn VersionControl>,
    /// Repository settings
    pub config: RepoConfig,
    /// Personal settings
    pub user_config: UserConfig,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
    /// Login of the authenticated user
    pub user: String,
    /// Checked-out local branch
    pub local_branch: String,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// `remote` overrides the configured remote for this invocation.
    pub async fn new(path: &Path, remote: Option<&str>) -> Result<Self> {
        let git = GitCli::open(path)?;
        let root = git.root_dir().to_path_buf();

        let mut config = match load_repo_config(&root)? {
            Some(config) => config,
            None => derive_repo_config(&git, &root, remote)?,
        };
        if let Some(name) = remote {
            let remotes = git::remotes(&git)?;
            config.remote = select_remote(&remotes, Some(name))?;
        }

        let user_config = match dirs::config_dir() {
            Some(dir) => load_user_config(&dir)?,
            None => UserConfig::default(),
        };

        let local_branch = git::current_branch(&git)?;
        let platform = create_platform_service(&config.platform_config()).await?;
        let user = platform.current_user().await?;

        Ok(Self {
            vcs: Arc::new(git),
            config,
            user_config,
            platform,
            user,
            local_branch,
        })
    }

    /// Borrowed view used by the sync engine
    pub fn sync_context(&self) -> SyncContext<'_> {
        SyncContext {
            config: &self.config,
            user: &self.user,
            local_branch: &self.local_branch,
        }
    }
}

/// Build a repository config from the selected remote's URL and save it
fn derive_repo_config(git: &GitCli, root: &Path, remote: Option<&str>) -> Result<RepoConfig> {
    let remotes = git::remotes(git)?;
    let remote_name = select_remote(&remotes, remote)?;
    let remote_info = remotes
        .iter()
        .find(|r| r.name == remote_name)
        .ok_or_else(|| Error::RemoteNotFound(remote_name.clone()))?;

    let platform_config = parse_repo_info(&remote_info.url)?;
    let config = RepoConfig::from_platform(&platform_config, &remote_name);
    save_repo_config(root, &config)?;
    info!(
        owner = %config.github_owner,
        repo = %config.github_repo,
        "wrote repository config"
    );
    Ok(config)
}
