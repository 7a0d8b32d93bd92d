//! Commit stack parser
//!
//! Turns `git log --format=medium` output (newest first) into an oldest-first
//! list of commits. Every commit must carry its own `commit-id:` trailer; one
//! missing or repeated trailer invalidates the whole stack.

use crate::error::{Error, Result};
use crate::types::Commit;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static COMMIT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^commit ([0-9a-f]{40}(?:[0-9a-f]{24})?)\b").expect("valid regex")
});

static COMMIT_ID_TRAILER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^commit-id:([0-9a-f]{8})$").expect("valid regex"));

/// Where the scanner is inside the current commit block
enum Section {
    /// Author/date lines up to the first blank line
    Preamble,
    /// Waiting for the first non-blank message line
    Subject,
    /// Accumulating body lines until the trailer
    Body,
}

struct PendingCommit {
    hash: String,
    section: Section,
    subject: String,
    body: Vec<String>,
}

enum State {
    Outside,
    Inside(PendingCommit),
}

/// Parse the local commit stack out of raw `git log` text.
///
/// Returns commits oldest-first. An empty log is an empty stack. A commit
/// header followed by another header or by end of input without a
/// `commit-id:` trailer fails with [`Error::MissingCommitId`] naming that commit.
/// An id carried by two commits fails with [`Error::DuplicateCommitId`].
pub fn parse_commit_stack(log: &str) -> Result<Vec<Commit>> {
    let mut commits = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut state = State::Outside;

    for raw_line in log.lines() {
        if let Some(caps) = COMMIT_HEADER.captures(raw_line) {
            if let State::Inside(pending) = state {
                return Err(Error::MissingCommitId(pending.hash));
            }
            state = State::Inside(PendingCommit {
                hash: caps[1].to_string(),
                section: Section::Preamble,
                subject: String::new(),
                body: Vec::new(),
            });
            continue;
        }

        let State::Inside(ref mut pending) = state else {
            continue;
        };

        let line = raw_line.trim();
        let finished_id = match pending.section {
            Section::Preamble => {
                if line.is_empty() {
                    pending.section = Section::Subject;
                }
                None
            }
            Section::Subject => {
                if !line.is_empty() {
                    pending.subject = line.to_string();
                    pending.section = Section::Body;
                }
                None
            }
            Section::Body => COMMIT_ID_TRAILER.captures(line).map_or_else(
                || {
                    pending.body.push(line.to_string());
                    None
                },
                |caps| Some(caps[1].to_string()),
            ),
        };

        if let Some(commit_id) = finished_id
            && let State::Inside(done) = std::mem::replace(&mut state, State::Outside)
        {
            if !seen_ids.insert(commit_id.clone()) {
                return Err(Error::DuplicateCommitId(commit_id));
            }
            let body = done.body.join("\n").trim().to_string();
            commits.push(Commit::new(commit_id, done.hash, done.subject, body));
        }
    }

    if let State::Inside(pending) = state {
        return Err(Error::MissingCommitId(pending.hash));
    }

    commits.reverse();
    Ok(commits)
}
