//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use spr::error::{Error, Result};
use spr::platform::PlatformService;
use spr::stack::{belongs_to, parse_branch_name};
use spr::types::{
    Commit, MergeMethod, MergeResult, MergeStatus, PlatformConfig, PrUpdate, PullRequest,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Remote branch name -> pushed commit hash, shared with [`super::FakeGit`]
pub type RemoteHeads = Arc<Mutex<HashMap<String, String>>>;

/// A recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreatePr {
        head: String,
        base: String,
        title: String,
        body: String,
    },
    UpdatePr {
        pr_number: u64,
        update: PrUpdate,
    },
    Comment {
        pr_number: u64,
        body: String,
    },
    Close(u64),
    Merge {
        pr_number: u64,
        method: MergeMethod,
    },
    RequestReviewers {
        pr_number: u64,
        reviewers: Vec<String>,
    },
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Snapshot,
    CreatePr,
    UpdatePr,
    ClosePr,
    MergePr,
}

/// Stateful in-memory review service
///
/// Manually implements `PlatformService` and keeps open PRs in memory, so a
/// second snapshot sees what the first run created or changed.
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Call tracking for verification
/// - Per-PR merge status overrides
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    user: String,
    next_pr_number: AtomicU64,
    open: Mutex<Vec<PullRequest>>,
    remote_heads: RemoteHeads,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<FailPoint, String>>,
    decline_merge: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock acting as `user`
    pub fn new(user: &str) -> Self {
        Self {
            config: PlatformConfig {
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
                host: None,
            },
            user: user.to_string(),
            next_pr_number: AtomicU64::new(1),
            open: Mutex::new(Vec::new()),
            remote_heads: Arc::new(Mutex::new(HashMap::new())),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            decline_merge: Mutex::new(None),
        }
    }

    /// Remote heads to hand to a [`super::FakeGit`]
    pub fn remote_heads(&self) -> RemoteHeads {
        Arc::clone(&self.remote_heads)
    }

    /// Seed an open PR (its head is recorded as already pushed)
    pub fn add_open_pr(&self, pr: PullRequest) {
        self.remote_heads
            .lock()
            .unwrap()
            .insert(pr.from_branch.clone(), pr.commit.commit_hash.clone());
        self.next_pr_number
            .fetch_max(pr.number + 1, Ordering::SeqCst);
        self.open.lock().unwrap().push(pr);
    }

    /// Override the review and CI signals of an open PR
    pub fn set_merge_status(&self, pr_number: u64, status: MergeStatus) {
        if let Some(pr) = self
            .open
            .lock()
            .unwrap()
            .iter_mut()
            .find(|pr| pr.number == pr_number)
        {
            pr.merge_status = status;
        }
    }

    /// Make an operation return an error
    pub fn fail(&self, point: FailPoint, msg: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(point, msg.to_string());
    }

    /// Let every operation succeed again
    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// Make `merge_pr` answer "not merged" with this message
    pub fn decline_merge(&self, msg: &str) {
        *self.decline_merge.lock().unwrap() = Some(msg.to_string());
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Numbers of the PRs still open, in creation order
    pub fn open_numbers(&self) -> Vec<u64> {
        self.open.lock().unwrap().iter().map(|pr| pr.number).collect()
    }

    /// An open PR by number
    pub fn open_pr(&self, pr_number: u64) -> Option<PullRequest> {
        self.open
            .lock()
            .unwrap()
            .iter()
            .find(|pr| pr.number == pr_number)
            .cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, point: FailPoint) -> Result<()> {
        match self.failures.lock().unwrap().get(&point) {
            Some(msg) => Err(Error::GitHubApi(msg.clone())),
            None => Ok(()),
        }
    }

    fn with_open<T>(&self, pr_number: u64, f: impl FnOnce(&mut PullRequest) -> T) -> Result<T> {
        let mut open = self.open.lock().unwrap();
        let pr = open
            .iter_mut()
            .find(|pr| pr.number == pr_number)
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} is not open")))?;
        Ok(f(pr))
    }

    fn remove_open(&self, pr_number: u64) -> Result<PullRequest> {
        let mut open = self.open.lock().unwrap();
        let index = open
            .iter()
            .position(|pr| pr.number == pr_number)
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} is not open")))?;
        Ok(open.remove(index))
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn current_user(&self) -> Result<String> {
        Ok(self.user.clone())
    }

    async fn get_open_pull_requests(
        &self,
        user: &str,
        local_branch: &str,
    ) -> Result<Vec<PullRequest>> {
        self.check(FailPoint::Snapshot)?;
        let heads = self.remote_heads.lock().unwrap();
        // Newest first: the engine must not rely on the service's order
        Ok(self
            .open
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|pr| belongs_to(&pr.from_branch, user, local_branch))
            .map(|pr| {
                let mut pr = pr.clone();
                if let Some(hash) = heads.get(&pr.from_branch) {
                    pr.commit.commit_hash.clone_from(hash);
                }
                pr
            })
            .collect())
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.record(Call::CreatePr {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        self.check(FailPoint::CreatePr)?;

        let hash = self
            .remote_heads
            .lock()
            .unwrap()
            .get(head)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("head branch {head} was never pushed")))?;
        let commit_id = parse_branch_name(head)
            .map(|b| b.commit_id)
            .unwrap_or_default();

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            id: format!("PR_{number}"),
            number,
            url: format!("https://github.com/acme/widgets/pull/{number}"),
            from_branch: head.to_string(),
            to_branch: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            commit: Commit::new(commit_id, hash, title, body),
            merge_status: MergeStatus::default(),
            merged: false,
        };
        self.open.lock().unwrap().push(pr.clone());
        Ok(pr)
    }

    async fn update_pr(&self, pr_number: u64, update: &PrUpdate) -> Result<()> {
        self.record(Call::UpdatePr {
            pr_number,
            update: update.clone(),
        });
        self.check(FailPoint::UpdatePr)?;
        self.with_open(pr_number, |pr| {
            if let Some(base) = &update.base {
                pr.to_branch.clone_from(base);
            }
            if let Some(title) = &update.title {
                pr.title.clone_from(title);
            }
            if let Some(body) = &update.body {
                pr.body.clone_from(body);
            }
        })
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.record(Call::Comment {
            pr_number,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        self.record(Call::Merge { pr_number, method });
        self.check(FailPoint::MergePr)?;
        if let Some(msg) = self.decline_merge.lock().unwrap().clone() {
            return Ok(MergeResult {
                merged: false,
                sha: None,
                message: Some(msg),
            });
        }
        self.remove_open(pr_number)?;
        Ok(MergeResult {
            merged: true,
            sha: Some(format!("merge{pr_number:035}")),
            message: None,
        })
    }

    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        self.record(Call::Close(pr_number));
        self.check(FailPoint::ClosePr)?;
        self.remove_open(pr_number).map(|_| ())
    }

    async fn request_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()> {
        self.record(Call::RequestReviewers {
            pr_number,
            reviewers: reviewers.to_vec(),
        });
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
