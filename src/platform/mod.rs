//! Review platform services
//!
//! Provides the interface the engine uses to read and mutate pull requests.

mod detection;
mod factory;
mod github;

pub use detection::{is_github_host, parse_repo_info, select_remote};
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{MergeMethod, MergeResult, PlatformConfig, PrUpdate, PullRequest};
use async_trait::async_trait;

/// Platform service trait for pull request operations
///
/// Every mutation is expected to either apply fully or fail without effect;
/// the engine never tries to undo a half-applied call.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Login of the authenticated user
    async fn current_user(&self) -> Result<String>;

    /// All open PRs of `user` whose head branch belongs to `local_branch`.
    ///
    /// Order is unspecified. The `stacked` flag is never set here.
    async fn get_open_pull_requests(
        &self,
        user: &str,
        local_branch: &str,
    ) -> Result<Vec<PullRequest>>;

    /// Create a new PR.
    ///
    /// The returned PR's `commit` only carries what the platform knows; the
    /// caller fills in the local commit.
    async fn create_pr(&self, head: &str, base: &str, title: &str, body: &str)
    -> Result<PullRequest>;

    /// Update base, title and/or body of an existing PR
    async fn update_pr(&self, pr_number: u64, update: &PrUpdate) -> Result<()>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Merge a PR with the specified method
    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult>;

    /// Close a PR without merging
    async fn close_pr(&self, pr_number: u64) -> Result<()>;

    /// Request reviews on a PR
    async fn request_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
