//! Scoped protection of the working tree during stack operations

use super::{VersionControl, current_branch, is_dirty};
use crate::error::{Error, Result};
use tracing::{debug, error};

/// Stashes uncommitted changes and remembers the checked-out branch.
///
/// Call [`release`](Self::release) to restore both and see any failure. If the
/// guard is dropped without being released (an early return or `?`), the
/// restore still runs and failures are logged.
pub struct WorkingTreeGuard<'a> {
    vcs: &'a dyn VersionControl,
    original_branch: String,
    stashed: bool,
    released: bool,
}

impl<'a> WorkingTreeGuard<'a> {
    /// Record the current branch and stash uncommitted changes if there are any.
    pub fn acquire(vcs: &'a dyn VersionControl) -> Result<Self> {
        let original_branch = current_branch(vcs)?;
        let stashed = if is_dirty(vcs)? {
            debug!("stashing uncommitted changes");
            vcs.run(&["stash", "push", "--message", "spr: auto-stash"])
                .map_err(|e| Error::Git(format!("failed to stash local changes: {e}")))?;
            true
        } else {
            false
        };

        Ok(Self {
            vcs,
            original_branch,
            stashed,
            released: false,
        })
    }

    /// Branch that was checked out when the guard was acquired
    pub fn original_branch(&self) -> &str {
        &self.original_branch
    }

    /// Whether local changes were stashed
    pub const fn stashed(&self) -> bool {
        self.stashed
    }

    /// Restore the original branch and pop the stash.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.restore()
    }

    fn restore(&self) -> Result<()> {
        if current_branch(self.vcs).ok().as_deref() != Some(self.original_branch.as_str()) {
            debug!(branch = %self.original_branch, "restoring original branch");
            self.vcs
                .run(&["checkout", &self.original_branch])
                .map_err(|e| {
                    Error::Git(format!(
                        "failed to check out {} again: {e}",
                        self.original_branch
                    ))
                })?;
        }

        if self.stashed {
            debug!("restoring stashed changes");
            self.vcs.run(&["stash", "pop"]).map_err(|e| {
                Error::Git(format!(
                    "failed to restore stashed changes, they remain in `git stash list`: {e}"
                ))
            })?;
        }

        Ok(())
    }
}

impl Drop for WorkingTreeGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.restore() {
            error!(error = %e, "failed to restore working tree");
        }
    }
}
