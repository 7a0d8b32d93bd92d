//! Error types for spr

use thiserror::Error;

/// Errors produced by spr
#[derive(Debug, Error)]
pub enum Error {
    /// A git command failed or produced unusable output
    #[error("git error: {0}")]
    Git(String),

    /// A commit in the local stack has no `commit-id:` trailer
    #[error(
        "commit {0} has no commit-id trailer; check that the spr commit-msg hook is installed"
    )]
    MissingCommitId(String),

    /// Two commits in the local stack carry the same `commit-id:` trailer
    #[error(
        "commit-id {0} appears on more than one commit; reword one of them so the commit-msg hook assigns a new id"
    )]
    DuplicateCommitId(String),

    /// Not on a local branch (detached HEAD)
    #[error("not on a local branch (detached HEAD)")]
    DetachedHead,

    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error surfaced by octocrab
    #[error("GitHub error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Generic review platform error
    #[error("platform error: {0}")]
    Platform(String),

    /// Authentication could not be resolved
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration could not be read, parsed or written
    #[error("config error: {0}")]
    Config(String),

    /// Named remote is not configured in the repository
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// No remote points at a supported hosting platform
    #[error("no remote points at a supported GitHub repository")]
    NoSupportedRemotes,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant broken
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias using spr's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
