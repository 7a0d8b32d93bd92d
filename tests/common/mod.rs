//! Shared test utilities

#![allow(dead_code)]

mod fake_git;
mod mock_platform;

pub use fake_git::FakeGit;
pub use mock_platform::{Call, FailPoint, MockPlatformService, RemoteHeads};

use spr::config::RepoConfig;
use spr::stack::branch_name;
use spr::types::{ChecksStatus, Commit, MergeStatus, PullRequest};
use std::fmt::Write;

pub const USER: &str = "octocat";
pub const BRANCH: &str = "feature";

/// Repository config for acme/widgets with default policy
pub fn repo_config() -> RepoConfig {
    RepoConfig::new("acme", "widgets")
}

/// Commit id for fixture `n`
pub fn id(n: u32) -> String {
    format!("{n:08x}")
}

/// 40-hex commit hash for fixture `n` at `version`
pub fn hash(n: u32, version: u32) -> String {
    format!("{version:08x}{n:032x}")
}

/// Fixture commit `n` at version 1
pub fn commit(n: u32, subject: &str) -> Commit {
    Commit::new(id(n), hash(n, 1), subject, format!("Body of {subject}"))
}

/// The same commit after an amend
pub fn amended(c: &Commit, version: u32) -> Commit {
    let n = u32::from_str_radix(&c.commit_id, 16).unwrap();
    Commit {
        commit_hash: hash(n, version),
        ..c.clone()
    }
}

/// Remote branch for a commit
pub fn branch_of(c: &Commit) -> String {
    branch_name(USER, BRANCH, &c.commit_id)
}

/// `git log --format=medium` text for commits given oldest first
pub fn git_log(commits: &[Commit]) -> String {
    let mut log = String::new();
    for c in commits.iter().rev() {
        writeln!(log, "commit {}", c.commit_hash).unwrap();
        writeln!(log, "Author: Mona Lisa <mona@example.com>").unwrap();
        writeln!(log, "Date:   Tue Mar 5 10:00:00 2024 +0000").unwrap();
        writeln!(log).unwrap();
        writeln!(log, "    {}", c.subject).unwrap();
        writeln!(log).unwrap();
        if !c.body.is_empty() {
            for line in c.body.lines() {
                writeln!(log, "    {line}").unwrap();
            }
            writeln!(log).unwrap();
        }
        writeln!(log, "    commit-id:{}", c.commit_id).unwrap();
        writeln!(log).unwrap();
    }
    log
}

/// Signals of a PR that is ready to merge
pub fn ready_status() -> MergeStatus {
    MergeStatus {
        checks: ChecksStatus::Pass,
        review_approved: true,
        no_conflicts: true,
        stacked: false,
    }
}

/// Open PR `number` for `commit`, based on `base`, in sync with the commit
pub fn make_pr(number: u64, c: &Commit, base: &str) -> PullRequest {
    PullRequest {
        id: format!("PR_{number}"),
        number,
        url: format!("https://github.com/acme/widgets/pull/{number}"),
        from_branch: branch_of(c),
        to_branch: base.to_string(),
        title: c.subject.clone(),
        body: c.body.clone(),
        commit: c.clone(),
        merge_status: MergeStatus::default(),
        merged: false,
    }
}

/// PRs chained from trunk for the given commits, numbered from `first`
pub fn chained_prs(commits: &[Commit], first: u64) -> Vec<PullRequest> {
    let mut base = repo_config().trunk_branch;
    let mut prs = Vec::new();
    for (i, c) in commits.iter().enumerate() {
        prs.push(make_pr(first + i as u64, c, &base));
        base = branch_of(c);
    }
    prs
}

/// Same PRs marked ready
pub fn ready(mut prs: Vec<PullRequest>) -> Vec<PullRequest> {
    for pr in &mut prs {
        pr.merge_status = ready_status();
    }
    prs
}
