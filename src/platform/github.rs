//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::stack::{belongs_to, parse_branch_name};
use crate::types::{
    ChecksStatus, Commit, MergeMethod, MergeResult, MergeStatus, PlatformConfig, PrUpdate,
    PullRequest,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::IssueState;
use serde::Deserialize;
use tracing::debug;

/// Open PRs of the authenticated user, with the head commit and review signals.
///
/// Paged newest first by `$after` so the current stack lands on the first page.
const OPEN_PULL_REQUESTS_QUERY: &str = r"
    query OpenPullRequests($after: String) {
        viewer {
            login
            pullRequests(
                first: 100
                after: $after
                states: [OPEN]
                orderBy: { field: CREATED_AT, direction: DESC }
            ) {
                pageInfo { hasNextPage endCursor }
                nodes {
                    id
                    number
                    url
                    title
                    body
                    headRefName
                    baseRefName
                    mergeable
                    reviewDecision
                    repository { nameWithOwner }
                    commits(last: 1) {
                        nodes {
                            commit {
                                oid
                                messageHeadline
                                messageBody
                                statusCheckRollup { state }
                            }
                        }
                    }
                }
            }
        }
    }
";

// GraphQL response types for the open pull request query

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    nodes: Vec<T>,
    page_info: Option<PageInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// Cursor for the page after `page_info`, if there is one
fn next_cursor(page_info: Option<PageInfo>) -> Option<String> {
    page_info
        .filter(|info| info.has_next_page)
        .and_then(|info| info.end_cursor)
}

#[derive(Deserialize)]
struct ViewerData {
    viewer: Viewer,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Viewer {
    login: String,
    pull_requests: Connection<PullRequestNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    id: String,
    number: u64,
    url: String,
    title: String,
    body: String,
    head_ref_name: String,
    base_ref_name: String,
    mergeable: String,
    review_decision: Option<String>,
    repository: RepositoryRef,
    commits: Connection<CommitNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryRef {
    name_with_owner: String,
}

#[derive(Deserialize)]
struct CommitNode {
    commit: CommitInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitInfo {
    oid: String,
    message_headline: String,
    message_body: String,
    status_check_rollup: Option<StatusCheckRollup>,
}

#[derive(Deserialize)]
struct StatusCheckRollup {
    state: String,
}

/// Map a status rollup to our checks status.
///
/// No rollup means no checks are configured, which counts as passing.
fn checks_from_rollup(rollup: Option<&StatusCheckRollup>) -> ChecksStatus {
    match rollup.map(|r| r.state.as_str()) {
        None | Some("SUCCESS") => ChecksStatus::Pass,
        Some("PENDING" | "EXPECTED") => ChecksStatus::Pending,
        Some("FAILURE" | "ERROR") => ChecksStatus::Fail,
        Some(_) => ChecksStatus::Unknown,
    }
}

/// Drop the `commit-id:` trailer from a commit message body
fn strip_commit_id_trailer(body: &str) -> String {
    body.lines()
        .filter(|line| !line.trim_start().starts_with("commit-id:"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Convert a GraphQL PR node, or `None` if it isn't part of this stack
fn pr_from_node(
    node: PullRequestNode,
    user: &str,
    local_branch: &str,
    full_name: &str,
) -> Option<PullRequest> {
    if !node.repository.name_with_owner.eq_ignore_ascii_case(full_name)
        || !belongs_to(&node.head_ref_name, user, local_branch)
    {
        return None;
    }
    let branch = parse_branch_name(&node.head_ref_name)?;
    let head = node.commits.nodes.into_iter().last()?.commit;

    let checks = checks_from_rollup(head.status_check_rollup.as_ref());
    let commit = Commit::new(
        branch.commit_id,
        head.oid,
        head.message_headline,
        strip_commit_id_trailer(&head.message_body),
    );

    Some(PullRequest {
        id: node.id,
        number: node.number,
        url: node.url,
        from_branch: node.head_ref_name,
        to_branch: node.base_ref_name,
        title: node.title,
        body: node.body,
        commit,
        merge_status: MergeStatus {
            checks,
            review_approved: node.review_decision.as_deref() == Some("APPROVED"),
            no_conflicts: node.mergeable == "MERGEABLE",
            stacked: false,
        },
        merged: false,
    })
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    let head_ref = pr.head.ref_field.clone();
    let commit_id = parse_branch_name(&head_ref)
        .map(|b| b.commit_id)
        .unwrap_or_default();
    PullRequest {
        id: pr.node_id.clone().unwrap_or_default(),
        number: pr.number,
        url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        from_branch: head_ref,
        to_branch: pr.base.ref_field.clone(),
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone().unwrap_or_default(),
        commit: Commit {
            commit_id,
            commit_hash: pr.head.sha.clone(),
            ..Commit::default()
        },
        merge_status: MergeStatus::default(),
        merged: false,
    }
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let base_uri = host.as_ref().map(|h| format!("https://{h}/api/v3"));
        Self::build(token, owner, repo, host, base_uri.as_deref())
    }

    /// Create a service against an explicit API base URI (GitHub Enterprise
    /// proxies, test servers)
    pub fn with_base_uri(token: &str, owner: String, repo: String, base_uri: &str) -> Result<Self> {
        Self::build(token, owner, repo, None, Some(base_uri))
    }

    fn build(
        token: &str,
        owner: String,
        repo: String,
        host: Option<String>,
        base_uri: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig { owner, repo, host },
        })
    }

    fn full_name(&self) -> String {
        format!("{}/{}", self.config.owner, self.config.repo)
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn current_user(&self) -> Result<String> {
        let user = self.client.current().user().await?;
        debug!(login = %user.login, "resolved current user");
        Ok(user.login)
    }

    async fn get_open_pull_requests(
        &self,
        user: &str,
        local_branch: &str,
    ) -> Result<Vec<PullRequest>> {
        debug!(user, local_branch, "fetching open PRs");

        let full_name = self.full_name();
        let mut prs = Vec::new();
        let mut after: Option<String> = None;
        let mut pages = 0_usize;

        loop {
            let response: GraphQlResponse<ViewerData> = self
                .client
                .graphql(&serde_json::json!({
                    "query": OPEN_PULL_REQUESTS_QUERY,
                    "variables": { "after": after },
                }))
                .await
                .map_err(|e| Error::GitHubApi(format!("GraphQL query failed: {e}")))?;

            if let Some(errors) = response.errors
                && !errors.is_empty()
            {
                let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
                return Err(Error::GitHubApi(format!(
                    "GraphQL error: {}",
                    messages.join(", ")
                )));
            }

            let data = response
                .data
                .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))?;

            pages += 1;
            let viewer = data.viewer;
            let connection = viewer.pull_requests;
            prs.extend(
                connection
                    .nodes
                    .into_iter()
                    .filter_map(|node| pr_from_node(node, user, local_branch, &full_name)),
            );
            debug!(viewer = %viewer.login, page = pages, "fetched page of open PRs");

            match next_cursor(connection.page_info) {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        debug!(count = prs.len(), pages, "fetched open PRs");
        Ok(prs)
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn update_pr(&self, pr_number: u64, update: &PrUpdate) -> Result<()> {
        debug!(pr_number, ?update.base, "updating PR");
        let pulls = self.client.pulls(&self.config.owner, &self.config.repo);
        let mut builder = pulls.update(pr_number);
        if let Some(ref base) = update.base {
            builder = builder.base(base);
        }
        if let Some(ref title) = update.title {
            builder = builder.title(title);
        }
        if let Some(ref body) = update.body {
            builder = builder.body(body);
        }
        builder.send().await?;

        debug!(pr_number, "updated PR");
        Ok(())
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let pulls = self.client.pulls(&self.config.owner, &self.config.repo);

        // For squash, use PR title and body as commit message
        let result = if method == MergeMethod::Squash {
            let pr = pulls.get(pr_number).await?;
            let title = pr.title.unwrap_or_default();
            let mut builder = pulls
                .merge(pr_number)
                .method(octocrab_method)
                .title(format!("{title} (#{pr_number})"));
            if let Some(ref body) = pr.body {
                builder = builder.message(body);
            }
            builder.send().await
        } else {
            pulls.merge(pr_number).method(octocrab_method).send().await
        }
        .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "closing PR");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .state(IssueState::Closed)
            .send()
            .await?;
        debug!(pr_number, "closed PR");
        Ok(())
    }

    async fn request_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()> {
        if reviewers.is_empty() {
            return Ok(());
        }
        debug!(pr_number, ?reviewers, "requesting reviewers");
        self.client
            .pulls(&self.config.owner, &self.config.repo)
            .request_reviews(pr_number, reviewers.to_vec(), Vec::<String>::new())
            .await?;
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
