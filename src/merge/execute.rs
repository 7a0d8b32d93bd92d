//! Merge execution - effectful operations
//!
//! Runs a [`MergePlan`] against the review service, one step at a time. It
//! stops at the first failure and records it instead of returning an error,
//! so the caller can report what already happened.

use crate::merge::plan::{MergePlan, MergeStep};
use crate::platform::PlatformService;
use crate::sync::ProgressCallback;
use crate::types::{PrUpdate, PullRequest};
use tracing::{info, warn};

/// Result of merge execution
#[derive(Debug, Clone, Default)]
pub struct MergeExecutionResult {
    /// PRs whose commits are now in trunk (merged or closed as superseded)
    pub merged: Vec<u64>,
    /// Merge commit SHA reported by the service
    pub sha: Option<String>,
    /// PR whose step failed (if any)
    pub failed: Option<u64>,
    /// Error message from the failed step (if any)
    pub error_message: Option<String>,
}

impl MergeExecutionResult {
    /// Check if every planned step succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_none()
    }

    /// Check if trunk changed
    #[must_use]
    pub const fn has_merges(&self) -> bool {
        !self.merged.is_empty()
    }

    fn fail(&mut self, pr_number: u64, message: String) {
        warn!(pr_number, %message, "merge step failed");
        self.failed = Some(pr_number);
        self.error_message = Some(message);
    }
}

/// Execute the merge plan (EFFECTFUL)
///
/// Once the merge itself succeeds every PR in the cascade is marked merged
/// in `prs`, even if closing a superseded PR fails afterwards.
pub async fn execute_merge(
    plan: &MergePlan,
    prs: &mut [PullRequest],
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> MergeExecutionResult {
    let mut result = MergeExecutionResult::default();

    for step in &plan.steps {
        info!(%step, "executing");
        match step {
            MergeStep::RetargetBase { pr_number, base } => {
                progress
                    .on_message(&format!("Retargeting PR #{pr_number} onto {base}"))
                    .await;
                let update = PrUpdate {
                    base: Some(base.clone()),
                    ..PrUpdate::default()
                };
                if let Err(e) = platform.update_pr(*pr_number, &update).await {
                    result.fail(*pr_number, e.to_string());
                    break;
                }
            }
            MergeStep::Merge {
                pr_number,
                title,
                method,
            } => {
                progress
                    .on_message(&format!("Merging PR #{pr_number}: {title}"))
                    .await;
                match platform.merge_pr(*pr_number, *method).await {
                    Ok(merge_result) if merge_result.merged => {
                        result.sha = merge_result.sha;
                        result.merged.clone_from(&plan.merged);
                        for pr in prs.iter_mut() {
                            if plan.merged.contains(&pr.number) {
                                pr.merged = true;
                            }
                        }
                    }
                    Ok(merge_result) => {
                        let message = merge_result
                            .message
                            .unwrap_or_else(|| "merge was not performed".to_string());
                        result.fail(*pr_number, message);
                        break;
                    }
                    Err(e) => {
                        result.fail(*pr_number, e.to_string());
                        break;
                    }
                }
            }
            MergeStep::CloseSuperseded {
                pr_number, comment, ..
            } => {
                let closed = async {
                    platform.create_pr_comment(*pr_number, comment).await?;
                    platform.close_pr(*pr_number).await
                }
                .await;
                if let Err(e) = closed {
                    result.fail(*pr_number, e.to_string());
                    break;
                }
                progress.on_pr_closed(*pr_number).await;
            }
        }
    }

    result
}
