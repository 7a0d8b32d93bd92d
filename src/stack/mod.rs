//! Local commit stack and remote pull request ordering
//!
//! - [`parse_commit_stack`] reads the local stack out of `git log`
//! - [`read_local_stack`] runs git, and repairs missing or repeated commit ids once
//! - [`sort_pull_requests`] orders remote PRs the way the local stack is ordered

mod branch;
mod order;
mod parse;

pub use branch::{BRANCH_PREFIX, StackBranch, belongs_to, branch_name, parse_branch_name};
pub use order::{OrderingWarning, StackOrder, sort_pull_requests, update_stacked_status};
pub use parse::parse_commit_stack;

use crate::config::RepoConfig;
use crate::error::{Error, Result};
use crate::git::{self, VersionControl};
use crate::types::Commit;
use tracing::{info, warn};

/// Read the local commit stack (oldest first).
///
/// If a commit is missing its `commit-id:` trailer, or two commits share one,
/// and `repair` is set, every commit in the stack is reworded once so the
/// commit-msg hook can tag it, and the log is parsed again. A second failure,
/// or any failure when `repair` is off, is returned to the caller without
/// touching local history.
pub fn read_local_stack(
    vcs: &dyn VersionControl,
    config: &RepoConfig,
    repair: bool,
) -> Result<Vec<Commit>> {
    let log = git::local_commit_log(vcs, config)?;
    match parse_commit_stack(&log) {
        Ok(commits) => Ok(commits),
        Err(e @ (Error::MissingCommitId(_) | Error::DuplicateCommitId(_))) if repair => {
            warn!(error = %e, "malformed commit ids, rewording stack");
            git::reword_stack(vcs, config)?;
            let log = git::local_commit_log(vcs, config)?;
            let commits = parse_commit_stack(&log)?;
            info!(count = commits.len(), "commit ids repaired");
            Ok(commits)
        }
        Err(e) => Err(e),
    }
}
