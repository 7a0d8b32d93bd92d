//! Sync planning - pure functions for reconciling commits with pull requests
//!
//! Nothing here touches git or the network. The planner compares the local
//! commit stack with the ordered open PRs and describes, step by step, what
//! has to change for the two to line up again.

use crate::config::RepoConfig;
use crate::stack::branch_name;
use crate::types::{Commit, PrUpdate, PullRequest};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Comment left on a PR whose commit is no longer in the local stack
pub const CLOSE_COMMENT: &str = "Closing pull request: commit has gone away";

/// Who is syncing which branch against which repository
#[derive(Debug, Clone, Copy)]
pub struct SyncContext<'a> {
    /// Repository settings
    pub config: &'a RepoConfig,
    /// Login of the authenticated user
    pub user: &'a str,
    /// Checked-out local branch
    pub local_branch: &'a str,
}

impl SyncContext<'_> {
    /// Remote branch carrying the commit with this id
    pub fn branch_for(&self, commit_id: &str) -> String {
        branch_name(self.user, self.local_branch, commit_id)
    }
}

/// A commit to push to its PR branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    /// The local commit
    pub commit: Commit,
    /// Remote branch receiving it
    pub branch: String,
}

impl PushTarget {
    /// `<hash>:refs/heads/<branch>` refspec for `git push`
    pub fn refspec(&self) -> String {
        format!("{}:refs/heads/{}", self.commit.commit_hash, self.branch)
    }
}

/// A single step of the sync plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    /// Close a PR whose commit is gone from the local stack
    Close {
        /// PR number
        pr_number: u64,
        /// Commit id the PR was tracking
        commit_id: String,
        /// Comment posted before closing
        comment: String,
    },
    /// Point a PR at trunk before the stack is rebuilt in a new order
    ResetBase {
        /// PR number
        pr_number: u64,
        /// New base branch (trunk)
        base: String,
    },
    /// Force-push changed and new commits in one atomic push
    Push {
        /// Commits to push, oldest first
        targets: Vec<PushTarget>,
    },
    /// Open a PR for a commit that has none
    Create {
        /// The commit
        commit: Commit,
        /// Head branch
        head: String,
        /// Base branch
        base: String,
        /// Title
        title: String,
        /// Body
        body: String,
    },
    /// Change base, title or body of an existing PR
    Update {
        /// PR number
        pr_number: u64,
        /// Commit id the PR tracks
        commit_id: String,
        /// Fields to change
        update: PrUpdate,
    },
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Close {
                pr_number,
                commit_id,
                ..
            } => write!(f, "close PR #{pr_number} ({commit_id} is gone)"),
            Self::ResetBase { pr_number, base } => {
                write!(f, "retarget PR #{pr_number} onto {base}")
            }
            Self::Push { targets } => {
                let ids: Vec<&str> = targets
                    .iter()
                    .map(|t| t.commit.commit_id.as_str())
                    .collect();
                write!(f, "push {} commit(s): {}", targets.len(), ids.join(", "))
            }
            Self::Create {
                commit, base, title, ..
            } => write!(f, "create PR for {} onto {base}: {title}", commit.commit_id),
            Self::Update {
                pr_number, update, ..
            } => {
                let mut fields = Vec::new();
                if let Some(base) = &update.base {
                    fields.push(format!("base {base}"));
                }
                if update.title.is_some() {
                    fields.push("title".to_string());
                }
                if update.body.is_some() {
                    fields.push("body".to_string());
                }
                write!(f, "update PR #{pr_number}: {}", fields.join(", "))
            }
        }
    }
}

/// Sync plan - the output of [`create_sync_plan`]
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Steps in execution order
    pub steps: Vec<SyncStep>,
    /// PRs that stay open, in stack order
    pub surviving: Vec<PullRequest>,
}

impl SyncPlan {
    /// Whether the stack is already in sync
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of PRs to close
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.count(|s| matches!(s, SyncStep::Close { .. }))
    }

    /// Number of commits to push
    #[must_use]
    pub fn push_count(&self) -> usize {
        self.steps
            .iter()
            .map(|s| match s {
                SyncStep::Push { targets } => targets.len(),
                _ => 0,
            })
            .sum()
    }

    /// Number of PRs to create
    #[must_use]
    pub fn create_count(&self) -> usize {
        self.count(|s| matches!(s, SyncStep::Create { .. }))
    }

    /// Number of PRs to update
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.count(|s| matches!(s, SyncStep::Update { .. }))
    }

    /// Whether the plan flattens the stack onto trunk first
    #[must_use]
    pub fn is_reordering(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, SyncStep::ResetBase { .. }))
    }

    fn count(&self, pred: impl Fn(&SyncStep) -> bool) -> usize {
        self.steps.iter().filter(|s| pred(s)).count()
    }
}

/// Commits that get synchronized: everything before the first WIP commit
pub fn active_commits(commits: &[Commit]) -> &[Commit] {
    let end = commits.iter().position(|c| c.wip).unwrap_or(commits.len());
    &commits[..end]
}

/// Whether surviving PRs sit in a different order than the local commits.
///
/// Only positions present in both sequences are compared.
fn is_reordered(commits: &[Commit], prs: &[PullRequest]) -> bool {
    commits
        .iter()
        .zip(prs)
        .any(|(commit, pr)| commit.commit_id != pr.commit.commit_id)
}

/// Create a sync plan (PURE - no I/O)
///
/// `commits` is the local stack oldest first; `ordered` is the open PRs in
/// stack order as returned by [`crate::stack::sort_pull_requests`].
#[must_use]
pub fn create_sync_plan(
    commits: &[Commit],
    ordered: &[PullRequest],
    ctx: &SyncContext<'_>,
) -> SyncPlan {
    let trunk = &ctx.config.trunk_branch;
    let local_ids: HashSet<&str> = commits.iter().map(|c| c.commit_id.as_str()).collect();
    let mut steps = Vec::new();

    // 1. Close PRs whose commit has gone away
    let mut surviving = Vec::with_capacity(ordered.len());
    for pr in ordered {
        if local_ids.contains(pr.commit.commit_id.as_str()) {
            surviving.push(pr.clone());
        } else {
            steps.push(SyncStep::Close {
                pr_number: pr.number,
                commit_id: pr.commit.commit_id.clone(),
                comment: CLOSE_COMMENT.to_string(),
            });
        }
    }

    let active = active_commits(commits);

    // Base each PR points at once the reset steps have run
    let mut current_base: HashMap<u64, &str> = surviving
        .iter()
        .map(|pr| (pr.number, pr.to_branch.as_str()))
        .collect();

    // 2. Flatten onto trunk when the order changed, resetting every
    // surviving PR including those already on trunk
    if is_reordered(active, &surviving) {
        for pr in &surviving {
            steps.push(SyncStep::ResetBase {
                pr_number: pr.number,
                base: trunk.clone(),
            });
            current_base.insert(pr.number, trunk.as_str());
        }
    }

    let by_id: HashMap<&str, &PullRequest> = surviving
        .iter()
        .map(|pr| (pr.commit.commit_id.as_str(), pr))
        .collect();

    // 3. One push for every new or changed commit
    let targets: Vec<PushTarget> = active
        .iter()
        .filter(|c| {
            by_id
                .get(c.commit_id.as_str())
                .is_none_or(|pr| pr.commit.commit_hash != c.commit_hash)
        })
        .map(|c| PushTarget {
            commit: c.clone(),
            branch: ctx.branch_for(&c.commit_id),
        })
        .collect();
    if !targets.is_empty() {
        steps.push(SyncStep::Push { targets });
    }

    // 4. Creates, then updates, walking the stack from trunk
    let mut updates = Vec::new();
    let mut base = trunk.clone();
    for commit in active {
        let head = ctx.branch_for(&commit.commit_id);
        match by_id.get(commit.commit_id.as_str()) {
            None => steps.push(SyncStep::Create {
                commit: commit.clone(),
                head: head.clone(),
                base: base.clone(),
                title: commit.subject.clone(),
                body: commit.body.clone(),
            }),
            Some(pr) => {
                let update = PrUpdate {
                    base: (current_base.get(&pr.number).copied() != Some(base.as_str()))
                        .then(|| base.clone()),
                    title: (pr.title != commit.subject).then(|| commit.subject.clone()),
                    body: (pr.body != commit.body).then(|| commit.body.clone()),
                };
                if update != PrUpdate::default() {
                    updates.push(SyncStep::Update {
                        pr_number: pr.number,
                        commit_id: commit.commit_id.clone(),
                        update,
                    });
                }
            }
        }
        base = head;
    }
    steps.extend(updates);

    SyncPlan { steps, surviving }
}
