//! Stack ordering for pull requests
//!
//! The review service returns open PRs in no particular order. Each PR's base
//! branch is the head branch of the PR below it, so following base → head
//! edges from trunk recovers the stack order.

use crate::config::RepoConfig;
use crate::types::PullRequest;
use std::collections::{HashMap, VecDeque};
use tracing::warn;

/// Integrity problem found while ordering. Ordering still completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderingWarning {
    /// More than one open PR targets the same base branch
    DuplicateBase {
        /// The contested base branch
        branch: String,
        /// PR numbers targeting it, the chosen one first
        numbers: Vec<u64>,
    },
    /// PRs that can't be reached by following bases from trunk
    Unreachable {
        /// PR numbers left over, in input order
        numbers: Vec<u64>,
    },
}

impl std::fmt::Display for OrderingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |numbers: &[u64]| {
            numbers
                .iter()
                .map(|n| format!("#{n}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::DuplicateBase { branch, numbers } => write!(
                f,
                "multiple pull requests target {branch}: {}",
                join(numbers)
            ),
            Self::Unreachable { numbers } => write!(
                f,
                "pull requests not chained to trunk: {}",
                join(numbers)
            ),
        }
    }
}

/// Pull requests in stack order (closest to trunk first)
#[derive(Debug, Clone, Default)]
pub struct StackOrder {
    /// Ordered chain, followed by any unreachable PRs in input order
    pub pull_requests: Vec<PullRequest>,
    /// Integrity problems found while ordering
    pub warnings: Vec<OrderingWarning>,
}

/// Order pull requests from trunk outwards and compute their `stacked` flags.
///
/// When several PRs target the same base the first one in input order wins.
/// PRs that aren't chained to trunk are kept at the end rather than dropped so
/// callers never mistake them for missing.
pub fn sort_pull_requests(prs: Vec<PullRequest>, config: &RepoConfig) -> StackOrder {
    let mut by_base: HashMap<String, VecDeque<usize>> = HashMap::new();
    for (index, pr) in prs.iter().enumerate() {
        by_base
            .entry(pr.to_branch.clone())
            .or_default()
            .push_back(index);
    }

    let mut slots: Vec<Option<PullRequest>> = prs.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    let mut warnings = Vec::new();
    let mut target = config.trunk_branch.clone();

    loop {
        let Some(candidates) = by_base.get_mut(&target) else {
            break;
        };
        let Some(chosen) = candidates.pop_front() else {
            break;
        };
        let Some(pr) = slots[chosen].take() else {
            break;
        };

        if !candidates.is_empty() {
            let mut numbers = vec![pr.number];
            numbers.extend(
                candidates
                    .iter()
                    .filter_map(|&i| slots[i].as_ref().map(|p| p.number)),
            );
            warn!(branch = %target, ?numbers, "multiple pull requests target the same base");
            warnings.push(OrderingWarning::DuplicateBase {
                branch: target.clone(),
                numbers,
            });
        }

        target.clone_from(&pr.from_branch);
        ordered.push(pr);
    }

    let chain_len = ordered.len();
    let leftover: Vec<PullRequest> = slots.into_iter().flatten().collect();
    if !leftover.is_empty() {
        let numbers: Vec<u64> = leftover.iter().map(|pr| pr.number).collect();
        warn!(?numbers, "pull requests not chained to trunk");
        warnings.push(OrderingWarning::Unreachable { numbers });
        ordered.extend(leftover);
    }

    update_stacked_status(&mut ordered[..chain_len], config);
    for pr in &mut ordered[chain_len..] {
        pr.merge_status.stacked = false;
    }

    StackOrder {
        pull_requests: ordered,
        warnings,
    }
}

/// Recompute the `stacked` flag over an ordered slice.
///
/// A PR is stacked when it and every PR before it are ready, so the flag is
/// always a prefix: once false it stays false.
pub fn update_stacked_status(prs: &mut [PullRequest], config: &RepoConfig) {
    let mut all_ready = true;
    for pr in prs {
        all_ready = all_ready && pr.is_ready(config);
        pr.merge_status.stacked = all_ready;
    }
}
