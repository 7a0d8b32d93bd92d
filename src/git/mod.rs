//! Git collaborator
//!
//! The engine only needs "run git and capture stdout". [`VersionControl`] is
//! that capability; [`GitCli`] implements it by spawning `git`, and tests swap
//! in a recording fake. The free functions here are the handful of git
//! operations spr actually performs.

mod cli;
mod guard;

pub use cli::GitCli;
pub use guard::WorkingTreeGuard;

use crate::config::RepoConfig;
use crate::error::{Error, Result};
use crate::types::GitRemote;
use std::path::Path;
use tracing::debug;

/// Editor overrides for commands that would otherwise open an editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOverride {
    /// Value for `GIT_SEQUENCE_EDITOR` (interactive rebase todo list)
    pub sequence_editor: Option<String>,
    /// Value for `GIT_EDITOR` (commit messages)
    pub editor: Option<String>,
}

/// Capability to run git commands in one working tree.
///
/// Implementations must not run two commands concurrently against the same
/// working tree; callers invoke these strictly sequentially.
pub trait VersionControl: Send + Sync {
    /// Run a git command and return its stdout.
    fn run(&self, args: &[&str]) -> Result<String>;

    /// Run a git command with the editors overridden.
    fn run_with_editor(&self, args: &[&str], editor: &EditorOverride) -> Result<String>;

    /// Root directory of the working tree.
    fn root_dir(&self) -> &Path;
}

/// Name of the checked-out branch.
pub fn current_branch(vcs: &dyn VersionControl) -> Result<String> {
    let output = vcs.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    let branch = output.trim();
    if branch.is_empty() || branch == "HEAD" {
        return Err(Error::DetachedHead);
    }
    Ok(branch.to_string())
}

/// Whether tracked files have uncommitted changes.
pub fn is_dirty(vcs: &dyn VersionControl) -> Result<bool> {
    let output = vcs.run(&["status", "--porcelain", "--untracked-files=no"])?;
    Ok(!output.trim().is_empty())
}

/// Raw log of the commits between the remote trunk and `HEAD`, newest first.
pub fn local_commit_log(vcs: &dyn VersionControl, config: &RepoConfig) -> Result<String> {
    let range = format!("{}..HEAD", config.remote_trunk());
    vcs.run(&[
        "log",
        "--format=medium",
        "--no-color",
        "--no-decorate",
        &range,
    ])
}

/// Fetch the remote and rebase the local branch onto the remote trunk.
pub fn fetch_and_rebase(vcs: &dyn VersionControl, config: &RepoConfig) -> Result<()> {
    vcs.run(&["fetch", &config.remote])?;
    vcs.run(&["rebase", &config.remote_trunk(), "--autostash"])
        .map_err(|e| Error::Git(format!("rebase onto {} failed: {e}", config.remote_trunk())))?;
    Ok(())
}

/// Reword every commit of the stack without opening an editor.
///
/// The todo list is rewritten from `pick` to `reword` and the message editor
/// is a no-op, so each commit passes through the commit-msg hook unchanged
/// apart from the trailer the hook appends.
pub fn reword_stack(vcs: &dyn VersionControl, config: &RepoConfig) -> Result<()> {
    let editor = EditorOverride {
        sequence_editor: Some("sed -i.bak -e 's/^pick /reword /'".to_string()),
        editor: Some("true".to_string()),
    };
    vcs.run_with_editor(
        &["rebase", "-i", "--autostash", &config.remote_trunk()],
        &editor,
    )?;
    Ok(())
}

/// Force-push commits to their branches.
///
/// Each refspec is `<hash>:refs/heads/<branch>`. More than one refspec is
/// pushed with `--atomic` so the remote never sees half an update.
pub fn push_branches(vcs: &dyn VersionControl, remote: &str, refspecs: &[String]) -> Result<()> {
    if refspecs.is_empty() {
        return Ok(());
    }
    let mut args = vec!["push", "--force"];
    if refspecs.len() > 1 {
        args.push("--atomic");
    }
    args.push(remote);
    args.extend(refspecs.iter().map(String::as_str));
    debug!(remote, count = refspecs.len(), "pushing branches");
    vcs.run(&args)?;
    Ok(())
}

/// Configured remotes (fetch URLs).
pub fn remotes(vcs: &dyn VersionControl) -> Result<Vec<GitRemote>> {
    let output = vcs.run(&["remote", "-v"])?;
    Ok(parse_remotes(&output))
}

fn parse_remotes(output: &str) -> Vec<GitRemote> {
    let mut remotes: Vec<GitRemote> = Vec::new();
    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        if remotes.iter().any(|r| r.name == name) {
            continue;
        }
        remotes.push(GitRemote {
            name: name.to_string(),
            url: url.to_string(),
        });
    }
    remotes
}
