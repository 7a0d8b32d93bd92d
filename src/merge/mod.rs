//! Merge cascade for stacked PRs
//!
//! Merging a stack bottom-up one PR at a time would re-run CI on every PR
//! after each merge. Instead the highest mergeable PR is retargeted to trunk
//! and merged once, carrying every commit below it, and the PRs below are
//! closed as superseded.
//!
//! 1. Plan - [`create_merge_plan`] (pure, testable)
//! 2. Execute - [`execute_merge`] (effectful)

mod execute;
mod plan;

pub use execute::{MergeExecutionResult, execute_merge};
pub use plan::{
    MergeBlocked, MergePlan, MergePlanOptions, MergeStep, create_merge_plan, merged_comment,
};
