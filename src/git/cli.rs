//! `git` subprocess implementation of [`VersionControl`]

use super::{EditorOverride, VersionControl};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Runs the `git` binary inside a working tree
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Open the working tree containing `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .current_dir(path)
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .map_err(|e| Error::Git(format!("failed to run git in {}: {e}", path.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!(
                "{} is not a git repository: {}",
                path.display(),
                stderr.trim()
            )));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            return Err(Error::Git("git returned empty repository root".to_string()));
        }

        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.root).args(args);
        cmd
    }

    fn finish(args: &[&str], output: std::io::Result<Output>) -> Result<String> {
        let command = args.join(" ");
        let output = output.map_err(|e| Error::Git(format!("failed to run git {command}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!("git {command} failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(command = %args.join(" "), "git");
        Self::finish(args, self.command(args).output())
    }

    fn run_with_editor(&self, args: &[&str], editor: &EditorOverride) -> Result<String> {
        debug!(command = %args.join(" "), ?editor, "git with editor override");
        let mut cmd = self.command(args);
        if let Some(ref sequence_editor) = editor.sequence_editor {
            cmd.env("GIT_SEQUENCE_EDITOR", sequence_editor);
        }
        if let Some(ref message_editor) = editor.editor {
            cmd.env("GIT_EDITOR", message_editor);
        }
        Self::finish(args, cmd.output())
    }

    fn root_dir(&self) -> &Path {
        &self.root
    }
}
