//! Merge planning - pure functions for creating merge plans
//!
//! No I/O happens here. The ordered PRs (with `stacked` already computed) and
//! the repository config go in, a [`MergePlan`] comes out.

use crate::config::RepoConfig;
use crate::types::{MergeMethod, PullRequest};
use std::fmt;

/// Comment left on PRs whose commits landed through a later PR
pub fn merged_comment(merged_into: u64) -> String {
    format!("✓ Commit merged in pull request #{merged_into}")
}

/// A single step in the merge plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStep {
    /// Point the top PR of the cascade at trunk
    RetargetBase {
        /// PR number
        pr_number: u64,
        /// Trunk branch
        base: String,
    },
    /// Merge the top PR
    Merge {
        /// PR number
        pr_number: u64,
        /// PR title (for display)
        title: String,
        /// Merge method to use
        method: MergeMethod,
    },
    /// Close a PR below the top one; its commit is already merged
    CloseSuperseded {
        /// PR number
        pr_number: u64,
        /// PR that carried the commit into trunk
        merged_into: u64,
        /// Comment posted before closing
        comment: String,
    },
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetargetBase { pr_number, base } => {
                write!(f, "retarget PR #{pr_number} onto {base}")
            }
            Self::Merge {
                pr_number,
                title,
                method,
            } => write!(f, "merge PR #{pr_number} ({method}): {title}"),
            Self::CloseSuperseded {
                pr_number,
                merged_into,
                ..
            } => write!(f, "close PR #{pr_number} (merged in #{merged_into})"),
        }
    }
}

/// Why nothing can be merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeBlocked {
    /// Bottom PR of the stack
    pub pr_number: u64,
    /// Its title
    pub title: String,
    /// What keeps it from merging
    pub reasons: Vec<String>,
}

/// Options for merge planning
#[derive(Debug, Clone, Copy, Default)]
pub struct MergePlanOptions {
    /// Merge at most this many PRs from the bottom. `None` or `Some(0)` merges
    /// every consecutive mergeable PR.
    pub count: Option<usize>,
}

/// Merge plan - the functional core output
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    /// Steps in execution order
    pub steps: Vec<MergeStep>,
    /// Numbers of every PR whose commit lands in trunk, bottom first
    pub merged: Vec<u64>,
    /// Set when the bottom PR isn't mergeable
    pub blocked: Option<MergeBlocked>,
}

impl MergePlan {
    /// Check if there is nothing to merge
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of PRs whose commits land in trunk
    #[must_use]
    pub const fn merge_count(&self) -> usize {
        self.merged.len()
    }

    /// The PR that actually gets merged
    #[must_use]
    pub fn top(&self) -> Option<u64> {
        self.merged.last().copied()
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// `ordered` must be in stack order with `stacked` computed, as returned by
/// [`crate::stack::sort_pull_requests`].
#[must_use]
pub fn create_merge_plan(
    ordered: &[PullRequest],
    config: &RepoConfig,
    options: &MergePlanOptions,
) -> MergePlan {
    let mut depth = ordered
        .iter()
        .take_while(|pr| pr.is_mergeable(config))
        .count();
    if let Some(count) = options.count.filter(|&count| count > 0) {
        depth = depth.min(count);
    }

    if depth == 0 {
        let blocked = ordered.first().map(|pr| MergeBlocked {
            pr_number: pr.number,
            title: pr.title.clone(),
            reasons: pr.blocking_reasons(config),
        });
        return MergePlan {
            blocked,
            ..MergePlan::default()
        };
    }

    let cascade = &ordered[..depth];
    let top = &cascade[depth - 1];
    let mut steps = Vec::with_capacity(depth + 1);

    if top.to_branch != config.trunk_branch {
        steps.push(MergeStep::RetargetBase {
            pr_number: top.number,
            base: config.trunk_branch.clone(),
        });
    }
    steps.push(MergeStep::Merge {
        pr_number: top.number,
        title: top.title.clone(),
        method: config.merge_method,
    });
    steps.extend(
        cascade[..depth - 1]
            .iter()
            .map(|pr| MergeStep::CloseSuperseded {
                pr_number: pr.number,
                merged_into: top.number,
                comment: merged_comment(top.number),
            }),
    );

    MergePlan {
        steps,
        merged: cascade.iter().map(|pr| pr.number).collect(),
        blocked: None,
    }
}
