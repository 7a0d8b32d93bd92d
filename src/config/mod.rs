//! Repository and user configuration
//!
//! The repository record lives at `<repo root>/.spr.toml` and holds the trunk
//! branch, remote and merge policy. The user record lives in the platform config
//! directory and holds personal preferences.

mod storage;

pub use storage::{
    load_repo_config, load_user_config, repo_config_path, save_repo_config, user_config_path,
};

use crate::types::{MergeMethod, PlatformConfig};
use serde::{Deserialize, Serialize};

fn default_remote() -> String {
    "origin".to_string()
}

fn default_trunk_branch() -> String {
    "main".to_string()
}

const fn default_true() -> bool {
    true
}

/// Per-repository settings.
///
/// Passed by reference into ordering, planning and merging; nothing in the
/// engine reads configuration from anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoConfig {
    /// GitHub repository owner
    pub github_owner: String,
    /// GitHub repository name
    pub github_repo: String,
    /// GitHub Enterprise host (None for github.com)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_host: Option<String>,
    /// Git remote pushed to and fetched from
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Branch stacks are based on and merged into
    #[serde(default = "default_trunk_branch")]
    pub trunk_branch: String,
    /// Require passing checks before a PR counts as ready
    #[serde(default = "default_true")]
    pub require_checks: bool,
    /// Require an approving review before a PR counts as ready
    #[serde(default = "default_true")]
    pub require_approval: bool,
    /// Merge method used by `spr merge`
    #[serde(default)]
    pub merge_method: MergeMethod,
}

impl RepoConfig {
    /// Create a config for `owner/repo` with default settings
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            github_owner: owner.into(),
            github_repo: repo.into(),
            github_host: None,
            remote: default_remote(),
            trunk_branch: default_trunk_branch(),
            require_checks: true,
            require_approval: true,
            merge_method: MergeMethod::default(),
        }
    }

    /// Create a config from a detected platform
    pub fn from_platform(platform: &PlatformConfig, remote: &str) -> Self {
        Self {
            github_host: platform.host.clone(),
            remote: remote.to_string(),
            ..Self::new(platform.owner.clone(), platform.repo.clone())
        }
    }

    /// Platform configuration for creating the review service
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            owner: self.github_owner.clone(),
            repo: self.github_repo.clone(),
            host: self.github_host.clone(),
        }
    }

    /// Remote-tracking ref of the trunk branch (e.g., `origin/main`)
    pub fn remote_trunk(&self) -> String {
        format!("{}/{}", self.remote, self.trunk_branch)
    }
}

/// Per-user settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    /// Reviewers requested on every newly created PR
    #[serde(default)]
    pub default_reviewers: Vec<String>,
    /// Print PR URLs in the stack report
    #[serde(default = "default_true")]
    pub show_pr_link: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_reviewers: Vec::new(),
            show_pr_link: true,
        }
    }
}
