//! Remote branch names for stacked commits
//!
//! Each commit is pushed to `pr/<user>/<local branch>/<commit id>`. The name
//! only depends on the commit id, so re-pushing an amended commit overwrites
//! the same branch.

use regex::Regex;
use std::sync::LazyLock;

/// Prefix shared by every branch spr pushes
pub const BRANCH_PREFIX: &str = "pr";

static STACK_BRANCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^pr/([A-Za-z0-9][A-Za-z0-9-]*)/(.+)/([0-9a-f]{8})$").expect("valid regex")
});

/// Components of a stack branch name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackBranch {
    /// Login of the user who owns the stack
    pub user: String,
    /// Local branch the stack was created from
    pub local_branch: String,
    /// Commit id of the commit on this branch
    pub commit_id: String,
}

/// Build the remote branch name for a commit.
pub fn branch_name(user: &str, local_branch: &str, commit_id: &str) -> String {
    format!("{BRANCH_PREFIX}/{user}/{local_branch}/{commit_id}")
}

/// Parse a remote branch name produced by [`branch_name`].
pub fn parse_branch_name(name: &str) -> Option<StackBranch> {
    let caps = STACK_BRANCH.captures(name)?;
    Some(StackBranch {
        user: caps[1].to_string(),
        local_branch: caps[2].to_string(),
        commit_id: caps[3].to_string(),
    })
}

/// Check whether a head branch belongs to the given user's local branch.
pub fn belongs_to(name: &str, user: &str, local_branch: &str) -> bool {
    parse_branch_name(name)
        .is_some_and(|b| b.user.eq_ignore_ascii_case(user) && b.local_branch == local_branch)
}
