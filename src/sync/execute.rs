//! Sync execution - effectful operations
//!
//! Runs a [`SyncPlan`] step by step against git and the review service. The
//! first failing step aborts the rest; nothing is rolled back. Every step is
//! keyed by commit id or content hash, so running `spr update` again picks up
//! where a failed run stopped.

use crate::error::{Error, Result};
use crate::git::{self, VersionControl, WorkingTreeGuard};
use crate::platform::PlatformService;
use crate::sync::plan::{PushTarget, SyncContext, SyncPlan, SyncStep};
use crate::sync::progress::ProgressCallback;
use crate::types::{PrUpdate, PullRequest};
use tracing::{debug, info};

/// Outcome of executing a sync plan
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    /// Closed PR numbers
    pub closed: Vec<u64>,
    /// Branches that were pushed
    pub pushed: Vec<String>,
    /// Newly created PRs
    pub created: Vec<PullRequest>,
    /// Updated PR numbers
    pub updated: Vec<u64>,
    /// Every PR left open, surviving ones first, then created ones (unordered)
    pub pull_requests: Vec<PullRequest>,
}

fn find_pr(prs: &mut [PullRequest], pr_number: u64) -> Result<&mut PullRequest> {
    prs.iter_mut()
        .find(|pr| pr.number == pr_number)
        .ok_or_else(|| Error::Internal(format!("PR #{pr_number} is not part of the plan")))
}

/// Push under a working tree guard.
///
/// The guard is released even when the push fails; a push error wins over a
/// restore error.
fn push_guarded(vcs: &dyn VersionControl, remote: &str, targets: &[PushTarget]) -> Result<()> {
    let refspecs: Vec<String> = targets.iter().map(PushTarget::refspec).collect();
    let guard = WorkingTreeGuard::acquire(vcs)?;
    let pushed = git::push_branches(vcs, remote, &refspecs);
    let restored = guard.release();
    pushed?;
    restored
}

/// Execute the sync plan (EFFECTFUL)
///
/// `reviewers` are requested on every PR this run creates.
pub async fn execute_sync(
    plan: &SyncPlan,
    ctx: &SyncContext<'_>,
    vcs: &dyn VersionControl,
    platform: &dyn PlatformService,
    reviewers: &[String],
    progress: &dyn ProgressCallback,
) -> Result<SyncResult> {
    let mut result = SyncResult {
        pull_requests: plan.surviving.clone(),
        ..SyncResult::default()
    };

    for step in &plan.steps {
        info!(%step, "executing");
        match step {
            SyncStep::Close {
                pr_number, comment, ..
            } => {
                platform.create_pr_comment(*pr_number, comment).await?;
                platform.close_pr(*pr_number).await?;
                progress.on_pr_closed(*pr_number).await;
                result.closed.push(*pr_number);
            }
            SyncStep::ResetBase { pr_number, base } => {
                let update = PrUpdate {
                    base: Some(base.clone()),
                    ..Default::default()
                };
                platform.update_pr(*pr_number, &update).await?;
                find_pr(&mut result.pull_requests, *pr_number)?
                    .to_branch
                    .clone_from(base);
                progress
                    .on_message(&format!("Retargeted PR #{pr_number} onto {base}"))
                    .await;
            }
            SyncStep::Push { targets } => {
                push_guarded(vcs, &ctx.config.remote, targets)?;
                for target in targets {
                    if let Some(pr) = result
                        .pull_requests
                        .iter_mut()
                        .find(|pr| pr.commit.commit_id == target.commit.commit_id)
                    {
                        pr.commit = target.commit.clone();
                    }
                }
                let branches: Vec<String> = targets.iter().map(|t| t.branch.clone()).collect();
                progress.on_push(&branches).await;
                result.pushed.extend(branches);
            }
            SyncStep::Create {
                commit,
                head,
                base,
                title,
                body,
            } => {
                let mut pr = platform.create_pr(head, base, title, body).await?;
                pr.commit = commit.clone();
                if !reviewers.is_empty() {
                    platform.request_reviewers(pr.number, reviewers).await?;
                }
                debug!(pr_number = pr.number, commit_id = %commit.commit_id, "created");
                progress.on_pr_created(&pr).await;
                result.pull_requests.push(pr.clone());
                result.created.push(pr);
            }
            SyncStep::Update {
                pr_number, update, ..
            } => {
                platform.update_pr(*pr_number, update).await?;
                let pr = find_pr(&mut result.pull_requests, *pr_number)?;
                if let Some(base) = &update.base {
                    pr.to_branch.clone_from(base);
                }
                if let Some(title) = &update.title {
                    pr.title.clone_from(title);
                }
                if let Some(body) = &update.body {
                    pr.body.clone_from(body);
                }
                progress.on_pr_updated(*pr_number).await;
                result.updated.push(*pr_number);
            }
        }
    }

    Ok(result)
}
