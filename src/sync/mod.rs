//! Reconciliation engine
//!
//! Three-phase pattern, same as [`crate::merge`]:
//! 1. Gather - fetch + rebase alongside the open PR snapshot, read local commits
//! 2. Plan - [`create_sync_plan`] (pure, testable)
//! 3. Execute - [`execute_sync`] (effectful), then re-order the final PR set

mod execute;
mod plan;
mod progress;

pub use execute::{SyncResult, execute_sync};
pub use plan::{
    CLOSE_COMMENT, PushTarget, SyncContext, SyncPlan, SyncStep, active_commits, create_sync_plan,
};
pub use progress::{NoopProgress, ProgressCallback};

use crate::error::{Error, Result};
use crate::git::{self, VersionControl};
use crate::platform::PlatformService;
use crate::stack::{StackOrder, sort_pull_requests};
use crate::types::{Commit, PullRequest};
use std::sync::Arc;
use tracing::debug;

/// Fetch and rebase onto the remote trunk while the open PRs are queried.
///
/// Git runs on a blocking thread; the snapshot query runs on the async
/// runtime. Both must finish before this returns, and either failure is
/// returned (git first).
pub async fn fetch_and_snapshot(
    vcs: Arc<dyn VersionControl>,
    platform: &dyn PlatformService,
    ctx: &SyncContext<'_>,
) -> Result<Vec<PullRequest>> {
    let config = ctx.config.clone();
    let rebase = tokio::task::spawn_blocking(move || git::fetch_and_rebase(vcs.as_ref(), &config));
    let snapshot = platform.get_open_pull_requests(ctx.user, ctx.local_branch);

    let (rebased, prs) = tokio::join!(rebase, snapshot);
    rebased.map_err(|e| Error::Internal(format!("fetch task failed: {e}")))??;
    let prs = prs?;
    debug!(count = prs.len(), "snapshot taken");
    Ok(prs)
}

/// Everything one reconciliation did
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The executed plan
    pub plan: SyncPlan,
    /// What execution changed
    pub result: SyncResult,
    /// Final PR set in stack order, with ordering warnings
    pub stack: StackOrder,
}

/// Order the snapshot and plan against the local commits
pub fn plan_sync(
    commits: &[Commit],
    open_prs: Vec<PullRequest>,
    ctx: &SyncContext<'_>,
) -> (StackOrder, SyncPlan) {
    let order = sort_pull_requests(open_prs, ctx.config);
    let plan = create_sync_plan(commits, &order.pull_requests, ctx);
    (order, plan)
}

/// Reconcile the local stack with the open PRs in one go.
///
/// Plans, executes and re-orders the resulting PR set. The first failing
/// action aborts with its error.
pub async fn reconcile(
    commits: &[Commit],
    open_prs: Vec<PullRequest>,
    ctx: &SyncContext<'_>,
    vcs: &dyn VersionControl,
    platform: &dyn PlatformService,
    reviewers: &[String],
    progress: &dyn ProgressCallback,
) -> Result<SyncOutcome> {
    let (_, plan) = plan_sync(commits, open_prs, ctx);
    let result = execute_sync(&plan, ctx, vcs, platform, reviewers, progress).await?;
    let stack = sort_pull_requests(result.pull_requests.clone(), ctx.config);
    Ok(SyncOutcome {
        plan,
        result,
        stack,
    })
}
