//! CLI commands

pub mod context;
pub mod merge;
pub mod style;
pub mod update;

use anstream::println;
use async_trait::async_trait;
use spr::config::RepoConfig;
use spr::sync::ProgressCallback;
use spr::types::{ChecksStatus, PullRequest};
use style::{Stylize, arrow, check, cross};

/// Progress printer for the terminal
pub struct CliProgress {
    show_links: bool,
}

impl CliProgress {
    /// One line per event
    pub const fn compact(show_links: bool) -> Self {
        Self { show_links }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        println!("  {} {message}", arrow());
    }

    async fn on_push(&self, branches: &[String]) {
        println!(
            "  {} Pushed {} branch(es)",
            check(),
            branches.len().accent()
        );
        for branch in branches {
            println!("      {}", branch.muted());
        }
    }

    async fn on_pr_created(&self, pr: &PullRequest) {
        let link = if self.show_links {
            format!(" {}", pr.url.muted())
        } else {
            String::new()
        };
        println!(
            "  {} Created {} {}{link}",
            check(),
            format!("#{}", pr.number).accent(),
            pr.title
        );
    }

    async fn on_pr_updated(&self, pr_number: u64) {
        println!("  {} Updated {}", check(), format!("#{pr_number}").accent());
    }

    async fn on_pr_closed(&self, pr_number: u64) {
        println!("  {} Closed {}", check(), format!("#{pr_number}").accent());
    }
}

fn mark(ok: bool) -> String {
    if ok { check() } else { cross() }
}

fn checks_mark(status: ChecksStatus) -> String {
    match status {
        ChecksStatus::Pass => check(),
        ChecksStatus::Fail => cross(),
        ChecksStatus::Pending => "⋯".warn(),
        ChecksStatus::Unknown => "?".muted(),
    }
}

/// Print the stack top-down, one line per PR.
///
/// The four marks are checks, approval, no conflicts and stacked.
pub fn print_stack(prs: &[PullRequest], config: &RepoConfig, show_links: bool) {
    if prs.is_empty() {
        println!("{}", "No open pull requests".muted());
        return;
    }
    for pr in prs.iter().rev() {
        let status = &pr.merge_status;
        let link = if show_links {
            format!(" {}", pr.url.muted())
        } else {
            String::new()
        };
        println!(
            "[{}{}{}{}] {} {}{link}",
            checks_mark(status.checks),
            mark(status.review_approved),
            mark(status.no_conflicts),
            mark(pr.is_mergeable(config)),
            format!("#{}", pr.number).accent(),
            pr.title
        );
    }
}
