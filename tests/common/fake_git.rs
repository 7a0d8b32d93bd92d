//! Recording stand-in for the git CLI

#![allow(dead_code)]

use super::RemoteHeads;
use spr::error::{Error, Result};
use spr::git::{EditorOverride, VersionControl};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Answers the handful of git commands spr runs from canned state.
///
/// Every command is recorded. `push` writes its refspecs into the shared
/// remote heads so the mock platform sees what was pushed.
pub struct FakeGit {
    root: PathBuf,
    branch: String,
    log: Mutex<String>,
    log_after_reword: Mutex<Option<String>>,
    dirty: Mutex<bool>,
    remote_heads: RemoteHeads,
    fail_push: Mutex<Option<String>>,
    commands: Mutex<Vec<String>>,
}

impl FakeGit {
    /// A clean checkout of `branch` whose `git log` prints `log`
    pub fn new(branch: &str, log: &str, remote_heads: RemoteHeads) -> Self {
        Self {
            root: PathBuf::from("/tmp/fake-repo"),
            branch: branch.to_string(),
            log: Mutex::new(log.to_string()),
            log_after_reword: Mutex::new(None),
            dirty: Mutex::new(false),
            remote_heads,
            fail_push: Mutex::new(None),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Pretend tracked files have local changes
    pub fn set_dirty(&self, dirty: bool) {
        *self.dirty.lock().unwrap() = dirty;
    }

    /// Replace the log (e.g. after amending commits)
    pub fn set_log(&self, log: &str) {
        *self.log.lock().unwrap() = log.to_string();
    }

    /// Log printed once the stack has been reworded
    pub fn set_log_after_reword(&self, log: &str) {
        *self.log_after_reword.lock().unwrap() = Some(log.to_string());
    }

    /// Make `git push` fail
    pub fn fail_push(&self, msg: &str) {
        *self.fail_push.lock().unwrap() = Some(msg.to_string());
    }

    /// Commands run so far, each joined with spaces
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Commands starting with `prefix`
    pub fn commands_starting_with(&self, prefix: &str) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn push(&self, args: &[&str]) -> Result<String> {
        if let Some(msg) = self.fail_push.lock().unwrap().clone() {
            return Err(Error::Git(msg));
        }
        let mut heads = self.remote_heads.lock().unwrap();
        for refspec in args.iter().filter(|a| a.contains(':')) {
            if let Some((hash, dest)) = refspec.split_once(':') {
                let branch = dest.trim_start_matches("refs/heads/");
                heads.insert(branch.to_string(), hash.to_string());
            }
        }
        Ok(String::new())
    }
}

impl VersionControl for FakeGit {
    fn run(&self, args: &[&str]) -> Result<String> {
        self.commands.lock().unwrap().push(args.join(" "));
        match args.first().copied() {
            Some("rev-parse") => Ok(format!("{}\n", self.branch)),
            Some("status") => Ok(if *self.dirty.lock().unwrap() {
                " M src/lib.rs\n".to_string()
            } else {
                String::new()
            }),
            Some("log") => Ok(self.log.lock().unwrap().clone()),
            Some("push") => self.push(args),
            Some("remote") => Ok("origin\tgit@github.com:acme/widgets.git (fetch)\n\
                 origin\tgit@github.com:acme/widgets.git (push)\n"
                .to_string()),
            _ => Ok(String::new()),
        }
    }

    fn run_with_editor(&self, args: &[&str], editor: &EditorOverride) -> Result<String> {
        self.commands.lock().unwrap().push(format!(
            "{} [editor={}]",
            args.join(" "),
            editor.editor.as_deref().unwrap_or("")
        ));
        if let Some(log) = self.log_after_reword.lock().unwrap().take() {
            *self.log.lock().unwrap() = log;
        }
        Ok(String::new())
    }

    fn root_dir(&self) -> &Path {
        &self.root
    }
}
