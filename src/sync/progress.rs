//! Progress reporting for sync and merge execution

use crate::types::PullRequest;
use async_trait::async_trait;

/// Receives progress events while a plan executes.
///
/// The CLI prints them; library callers and tests use [`NoopProgress`].
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Free-form status line
    async fn on_message(&self, message: &str);

    /// Branches were force-pushed
    async fn on_push(&self, branches: &[String]);

    /// A PR was opened
    async fn on_pr_created(&self, pr: &PullRequest);

    /// A PR's base, title or body changed
    async fn on_pr_updated(&self, pr_number: u64);

    /// A PR was closed
    async fn on_pr_closed(&self, pr_number: u64);
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}
    async fn on_push(&self, _branches: &[String]) {}
    async fn on_pr_created(&self, _pr: &PullRequest) {}
    async fn on_pr_updated(&self, _pr_number: u64) {}
    async fn on_pr_closed(&self, _pr_number: u64) {}
}
