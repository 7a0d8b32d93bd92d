//! Core types for spr

use crate::config::RepoConfig;
use serde::{Deserialize, Serialize};

/// Subject prefix marking a commit as work in progress
pub const WIP_PREFIX: &str = "WIP";

/// A local, unmerged commit
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Stable 8-character hex id from the `commit-id:` trailer
    pub commit_id: String,
    /// Current git commit hash (changes on every amend)
    pub commit_hash: String,
    /// First line of the commit message
    pub subject: String,
    /// Rest of the commit message, without the trailer
    pub body: String,
    /// Whether the subject starts with `WIP`
    pub wip: bool,
}

impl Commit {
    /// Build a commit, deriving the WIP flag from the subject
    pub fn new(
        commit_id: impl Into<String>,
        commit_hash: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let subject = subject.into();
        Self {
            commit_id: commit_id.into(),
            commit_hash: commit_hash.into(),
            wip: subject.starts_with(WIP_PREFIX),
            subject,
            body: body.into(),
        }
    }
}

/// Combined CI status of a pull request's head commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChecksStatus {
    /// Status could not be determined
    #[default]
    Unknown,
    /// Checks are still running
    Pending,
    /// All checks passed (or none are configured)
    Pass,
    /// At least one check failed
    Fail,
}

impl std::fmt::Display for ChecksStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Pending => write!(f, "pending"),
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Merge-readiness signals for a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStatus {
    /// CI status
    pub checks: ChecksStatus,
    /// Whether the review decision is "approved"
    pub review_approved: bool,
    /// Whether the PR merges cleanly into its base
    pub no_conflicts: bool,
    /// This PR and every PR below it are ready. Derived locally, never
    /// reported by the review service.
    pub stacked: bool,
}

/// A pull request mirroring exactly one local commit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// Opaque id assigned by the review service (GraphQL node id on GitHub)
    pub id: String,
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub url: String,
    /// Head branch (`pr/<user>/<local branch>/<commit id>`)
    pub from_branch: String,
    /// Base branch
    pub to_branch: String,
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
    /// Commit the PR currently represents; the hash is the last one pushed
    pub commit: Commit,
    /// Review and CI signals
    pub merge_status: MergeStatus,
    /// Set once the PR has been merged (directly or through the cascade)
    pub merged: bool,
}

impl PullRequest {
    /// Check whether this PR could be merged on its own.
    ///
    /// Checks and approval only count when the repository config requires them.
    pub fn is_ready(&self, config: &RepoConfig) -> bool {
        self.blocking_reasons(config).is_empty()
    }

    /// Check whether this PR is ready and every PR below it is ready too.
    pub fn is_mergeable(&self, config: &RepoConfig) -> bool {
        self.is_ready(config) && self.merge_status.stacked
    }

    /// Human-readable reasons why this PR is not ready.
    pub fn blocking_reasons(&self, config: &RepoConfig) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.commit.wip {
            reasons.push("Commit is WIP".to_string());
        }
        if !self.merge_status.no_conflicts {
            reasons.push("Has merge conflicts".to_string());
        }
        if config.require_checks && self.merge_status.checks != ChecksStatus::Pass {
            reasons.push(format!("Checks {}", self.merge_status.checks));
        }
        if config.require_approval && !self.merge_status.review_approved {
            reasons.push("Not approved".to_string());
        }
        reasons
    }
}

/// Fields to change on an existing PR. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrUpdate {
    /// New base branch
    pub base: Option<String>,
    /// New title
    pub title: Option<String>,
    /// New body
    pub body: Option<String>,
}

/// A git remote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Squash all commits into one
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto base branch
    #[default]
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}
