//! Azure DevOps provider (Git REST API 7.1) for pull-request review.
//!
//! Endpoints used:
//!   * GET  /{project}/_apis/git/repositories/{repo}/pullrequests/{id}
//!   * GET  /{project}/_apis/git/repositories/{repo}/pullRequests/{id}/threads
//!   * GET  /{project}/_apis/git/repositories/{repo}/pullRequests/{id}/iterations
//!   * GET  /{project}/_apis/git/repositories/{repo}/pullRequests/{id}/iterations/{it}/changes
//!   * GET  /{project}/_apis/git/repositories/{repo}/items?path=..
//!   * POST /{project}/_apis/git/repositories/{repo}/pullRequests/{id}/threads
//!
//! All paths are relative to `{api_base}/{organization}`. Authentication is
//! HTTP Basic with an empty user name and the PAT as password.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::{StreamExt, stream};
use reqwest::{Client, Response, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::config::{API_VERSION, AzureDevOpsConfig};
use crate::errors::{ProviderError, ProviderResult};
use crate::types::*;

/// Page size requested from the iteration changes endpoint.
const CHANGES_PAGE_SIZE: usize = 1000;

/// Azure DevOps HTTP client wrapper.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted.
#[derive(Clone)]
pub struct AzureDevOpsClient {
    http: Client,
    organization_url: String,
    project: String,
    token: String,
}

impl std::fmt::Debug for AzureDevOpsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsClient")
            .field("organization_url", &self.organization_url)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

/// Commit pinned by the latest pull-request iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationRef {
    pub id: u64,
    pub source_commit: Option<String>,
}

/// One entry of an iteration's change list, before content is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Provider path (with leading `/`).
    pub path: String,
    pub kind: ChangeKind,
    pub original_path: Option<String>,
}

impl AzureDevOpsClient {
    /// Constructs a client with a shared HTTP instance configured with a stable
    /// user agent and the configured request timeout.
    pub fn from_config(cfg: &AzureDevOpsConfig) -> ProviderResult<Self> {
        debug!(
            "Initializing Azure DevOps client: organization_url={}, project={}",
            cfg.organization_url(),
            cfg.project
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .user_agent("pr-reviewer/0.1")
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            organization_url: cfg.organization_url(),
            project: cfg.project.clone(),
            token: cfg.token.clone(),
        })
    }

    fn repository_url(&self, repository_id: &str) -> String {
        format!(
            "{}/{}/_apis/git/repositories/{}",
            self.organization_url,
            urlencoding::encode(&self.project),
            urlencoding::encode(repository_id)
        )
    }

    fn pull_request_url(&self, repository_id: &str, pull_request_id: u64) -> String {
        format!(
            "{}/pullRequests/{}",
            self.repository_url(repository_id),
            pull_request_id
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        debug!("Azure DevOps GET {}", url);
        let resp = self
            .http
            .get(url)
            .basic_auth("", Some(&self.token))
            .query(&[("api-version", API_VERSION)])
            .query(query)
            .send()
            .await?;

        let resp = ensure_success(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    /// Fetches pull request metadata.
    ///
    /// # Errors
    /// Transport/status errors, or [`ProviderError::InvalidResponse`] when the
    /// response lacks an id or repository id.
    pub async fn get_pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> ProviderResult<PullRequestRef> {
        let url = format!(
            "{}/pullrequests/{}",
            self.repository_url(&locator.repository_id),
            locator.pull_request_id
        );
        let raw: AdoPullRequest = self.get_json(&url, &[]).await?;
        into_pull_request_ref(raw, locator)
    }

    /// Fetches every discussion thread of the pull request, system ones included.
    pub async fn get_threads(&self, pr: &PullRequestRef) -> ProviderResult<Vec<CommentThread>> {
        let url = format!(
            "{}/threads",
            self.pull_request_url(&pr.repository_id, pr.id)
        );
        let raw: AdoList<AdoThread> = self.get_json(&url, &[]).await?;
        debug!(threads = raw.value.len(), "Azure DevOps threads fetched");
        Ok(raw.value.into_iter().map(into_thread).collect())
    }

    /// Returns the newest iteration (highest id), or `None` if there is none yet.
    pub async fn get_latest_iteration(
        &self,
        pr: &PullRequestRef,
    ) -> ProviderResult<Option<IterationRef>> {
        let url = format!(
            "{}/iterations",
            self.pull_request_url(&pr.repository_id, pr.id)
        );
        let raw: AdoList<AdoIteration> = self.get_json(&url, &[]).await?;
        Ok(latest_iteration(raw.value))
    }

    /// Lists file-level changes of one iteration, following pagination.
    pub async fn get_iteration_changes(
        &self,
        pr: &PullRequestRef,
        iteration_id: u64,
    ) -> ProviderResult<Vec<ChangeEntry>> {
        let url = format!(
            "{}/iterations/{}/changes",
            self.pull_request_url(&pr.repository_id, pr.id),
            iteration_id
        );

        let mut entries = Vec::new();
        let mut skip = 0usize;
        let top = CHANGES_PAGE_SIZE.to_string();
        loop {
            let skip_s = skip.to_string();
            let page: AdoIterationChanges = self
                .get_json(&url, &[("$top", top.as_str()), ("$skip", skip_s.as_str())])
                .await?;
            entries.extend(page.change_entries.into_iter().filter_map(into_change_entry));

            match page.next_skip {
                Some(next) if next > skip => skip = next,
                _ => break,
            }
        }

        debug!(
            iteration = iteration_id,
            files = entries.len(),
            "Azure DevOps iteration changes fetched"
        );
        Ok(entries)
    }

    /// Fetches the text of one file at the given commit (or the source branch
    /// when no commit is known).
    pub async fn get_file_text(
        &self,
        pr: &PullRequestRef,
        path: &str,
        commit: Option<&str>,
    ) -> ProviderResult<String> {
        let url = format!("{}/items", self.repository_url(&pr.repository_id));
        let (version, version_type) = match commit {
            Some(sha) => (sha, "commit"),
            None => (pr.source_branch.as_str(), "branch"),
        };

        let item: AdoItem = self
            .get_json(
                &url,
                &[
                    ("path", path),
                    ("versionDescriptor.version", version),
                    ("versionDescriptor.versionType", version_type),
                    ("includeContent", "true"),
                    ("$format", "json"),
                ],
            )
            .await?;

        if item
            .content_metadata
            .as_ref()
            .and_then(|m| m.is_binary)
            .unwrap_or(false)
        {
            return Err(ProviderError::InvalidResponse("binary content".into()));
        }

        item.content
            .ok_or_else(|| ProviderError::InvalidResponse("item has no content".into()))
    }

    /// Fetches the changed files of the latest iteration together with their
    /// content.
    ///
    /// Content requests run concurrently (at most `concurrency` at a time) and
    /// the result keeps the provider's order. A failed content request only
    /// marks its own [`FileChange`]; listing failures abort the whole call.
    pub async fn get_changed_files(
        &self,
        pr: &PullRequestRef,
        concurrency: usize,
    ) -> ProviderResult<Vec<FileChange>> {
        let Some(iteration) = self.get_latest_iteration(pr).await? else {
            debug!("pull request has no iterations yet");
            return Ok(Vec::new());
        };

        let entries = self.get_iteration_changes(pr, iteration.id).await?;
        let commit = iteration.source_commit.as_deref();

        let files = stream::iter(entries)
            .map(|entry| self.materialize(pr, entry, commit))
            .buffered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        Ok(files)
    }

    async fn materialize(
        &self,
        pr: &PullRequestRef,
        entry: ChangeEntry,
        commit: Option<&str>,
    ) -> FileChange {
        let path = display_path(&entry.path);
        let original = entry.original_path.as_deref().map(display_path);

        if entry.kind == ChangeKind::Deleted {
            return FileChange::deleted(path);
        }

        match self.get_file_text(pr, &entry.path, commit).await {
            Ok(text) => FileChange::with_content(path, entry.kind, text).renamed_from(original),
            Err(err) => {
                warn!(path = %entry.path, error = %err, "failed to fetch file content");
                FileChange::failed(path, entry.kind, err.to_string()).renamed_from(original)
            }
        }
    }

    /// Creates a new top-level, active thread holding `content`.
    ///
    /// Returns the id of the created thread.
    pub async fn create_thread(&self, pr: &PullRequestRef, content: &str) -> ProviderResult<u64> {
        let url = format!(
            "{}/threads",
            self.pull_request_url(&pr.repository_id, pr.id)
        );
        debug!("Azure DevOps POST {} (len={})", url, content.len());

        let payload = AdoThreadCreate::text(content);
        let resp = self
            .http
            .post(&url)
            .basic_auth("", Some(&self.token))
            .query(&[("api-version", API_VERSION)])
            .json(&payload)
            .send()
            .await?;

        let resp = ensure_success(resp).await?;
        let created: AdoCreatedThread = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(created.id)
    }
}

/// Turns a non-2xx response into a [`ProviderError`], keeping `Retry-After`.
async fn ensure_success(resp: Response) -> ProviderResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let retry_after = resp
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(200).collect();

    warn!(%status, %url, %snippet, "Azure DevOps returned non-success status");
    Err(ProviderError::from_status(status.as_u16(), retry_after))
}

fn display_path(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

fn short_branch(ref_name: Option<String>) -> String {
    ref_name
        .map(|r| {
            r.strip_prefix("refs/heads/")
                .map(str::to_string)
                .unwrap_or(r)
        })
        .unwrap_or_default()
}

fn into_pull_request_ref(
    raw: AdoPullRequest,
    locator: &PullRequestLocator,
) -> ProviderResult<PullRequestRef> {
    let id = raw.pull_request_id.unwrap_or(0);
    if id == 0 {
        return Err(ProviderError::InvalidResponse(
            "pull request without id".into(),
        ));
    }

    let repository = raw.repository.unwrap_or_default();
    let repository_id = repository.id.unwrap_or_default();
    if repository_id.trim().is_empty() {
        return Err(ProviderError::InvalidResponse(
            "pull request without repository id".into(),
        ));
    }

    let project_id = repository
        .project
        .and_then(|p| p.id)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| locator.project_id.clone());

    Ok(PullRequestRef {
        id,
        repository_id,
        project_id,
        title: raw.title.unwrap_or_default(),
        description: raw.description.filter(|d| !d.trim().is_empty()),
        source_branch: short_branch(raw.source_ref_name),
        target_branch: short_branch(raw.target_ref_name),
    })
}

fn into_thread(raw: AdoThread) -> CommentThread {
    let ctx = raw.thread_context.unwrap_or_default();
    CommentThread {
        id: raw.id,
        status: ThreadStatus::parse(raw.status.as_deref()),
        file_path: ctx.file_path.map(|p| display_path(&p)),
        line: ctx.right_file_start.and_then(|p| p.line),
        comments: raw
            .comments
            .into_iter()
            .map(|c| Comment {
                author: c.author.and_then(|a| a.display_name),
                content: c.content,
                published_at: c.published_date,
                updated_at: c.last_updated_date,
                kind: CommentKind::parse(c.comment_type.as_deref()),
                is_deleted: c.is_deleted,
            })
            .collect(),
        is_deleted: raw.is_deleted,
    }
}

fn latest_iteration(iterations: Vec<AdoIteration>) -> Option<IterationRef> {
    iterations
        .into_iter()
        .max_by_key(|it| it.id)
        .map(|it| IterationRef {
            id: it.id,
            source_commit: it.source_ref_commit.and_then(|c| c.commit_id),
        })
}

fn into_change_entry(raw: AdoChangeEntry) -> Option<ChangeEntry> {
    let item = raw.item?;
    let is_folder = item.is_folder.unwrap_or(false)
        || item
            .git_object_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("tree"));
    if is_folder {
        return None;
    }

    let path = item.path.filter(|p| !p.is_empty())?;
    let kind = ChangeKind::from_flags(raw.change_type.as_deref().unwrap_or_default())?;
    Some(ChangeEntry {
        path,
        kind,
        original_path: raw.original_path.filter(|p| !p.is_empty()),
    })
}

/* ===========================================================================
Wire types (subset of the Azure DevOps REST schema)
======================================================================== */

#[derive(Debug, Deserialize)]
struct AdoList<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoPullRequest {
    #[serde(default)]
    pull_request_id: Option<u64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source_ref_name: Option<String>,
    #[serde(default)]
    target_ref_name: Option<String>,
    #[serde(default)]
    repository: Option<AdoRepository>,
}

#[derive(Debug, Default, Deserialize)]
struct AdoRepository {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    project: Option<AdoProject>,
}

#[derive(Debug, Deserialize)]
struct AdoProject {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoThread {
    id: u64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    thread_context: Option<AdoThreadContext>,
    #[serde(default)]
    comments: Vec<AdoComment>,
    #[serde(default)]
    is_deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoThreadContext {
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    right_file_start: Option<AdoFilePosition>,
}

#[derive(Debug, Deserialize)]
struct AdoFilePosition {
    #[serde(default)]
    line: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoComment {
    #[serde(default)]
    author: Option<AdoIdentity>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    last_updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    comment_type: Option<String>,
    #[serde(default)]
    is_deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoIdentity {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoIteration {
    id: u64,
    #[serde(default)]
    source_ref_commit: Option<AdoCommitRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoCommitRef {
    #[serde(default)]
    commit_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoIterationChanges {
    #[serde(default)]
    change_entries: Vec<AdoChangeEntry>,
    #[serde(default)]
    next_skip: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoChangeEntry {
    #[serde(default)]
    item: Option<AdoChangeItem>,
    #[serde(default)]
    change_type: Option<String>,
    #[serde(default)]
    original_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoChangeItem {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    git_object_type: Option<String>,
    #[serde(default)]
    is_folder: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoItem {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    content_metadata: Option<AdoContentMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdoContentMetadata {
    #[serde(default)]
    is_binary: Option<bool>,
}

/// `status: 1` is `active`, `commentType: 1` is `text`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdoThreadCreate<'a> {
    comments: Vec<AdoCommentCreate<'a>>,
    status: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdoCommentCreate<'a> {
    parent_comment_id: u64,
    content: &'a str,
    comment_type: u8,
}

impl<'a> AdoThreadCreate<'a> {
    fn text(content: &'a str) -> Self {
        Self {
            comments: vec![AdoCommentCreate {
                parent_comment_id: 0,
                content,
                comment_type: 1,
            }],
            status: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AdoCreatedThread {
    id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locator() -> PullRequestLocator {
        PullRequestLocator {
            pull_request_id: 42,
            repository_id: "repo-guid".into(),
            project_id: "project-guid".into(),
        }
    }

    fn config() -> AzureDevOpsConfig {
        AzureDevOpsConfig {
            api_base: "https://dev.azure.com".into(),
            organization: "contoso".into(),
            project: "Web Shop".into(),
            token: "pat".into(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn urls_are_scoped_to_org_and_project() {
        let client = AzureDevOpsClient::from_config(&config()).unwrap();
        assert_eq!(
            client.pull_request_url("repo-guid", 42),
            "https://dev.azure.com/contoso/Web%20Shop/_apis/git/repositories/repo-guid/pullRequests/42"
        );
    }

    #[test]
    fn pull_request_is_normalized() {
        let raw: AdoPullRequest = serde_json::from_value(json!({
            "pullRequestId": 42,
            "title": "Fix off-by-one",
            "description": "",
            "sourceRefName": "refs/heads/feature/loop",
            "targetRefName": "refs/heads/main",
            "repository": { "id": "repo-guid", "project": { "id": "project-guid" } }
        }))
        .unwrap();

        let pr = into_pull_request_ref(raw, &locator()).unwrap();
        assert_eq!(pr.id, 42);
        assert_eq!(pr.title, "Fix off-by-one");
        assert_eq!(pr.description, None);
        assert_eq!(pr.source_branch, "feature/loop");
        assert_eq!(pr.target_branch, "main");
        assert_eq!(pr.project_id, "project-guid");
    }

    #[test]
    fn pull_request_without_repository_is_rejected() {
        let raw: AdoPullRequest = serde_json::from_value(json!({
            "pullRequestId": 42,
            "title": "x",
            "repository": { "id": "" }
        }))
        .unwrap();
        assert!(matches!(
            into_pull_request_ref(raw, &locator()),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn threads_keep_comment_kinds_and_anchors() {
        let raw: AdoList<AdoThread> = serde_json::from_value(json!({
            "value": [
                {
                    "id": 1,
                    "status": "active",
                    "threadContext": { "filePath": "/src/a.ts", "rightFileStart": { "line": 3, "offset": 1 } },
                    "comments": [{
                        "id": 1,
                        "author": { "displayName": "Ada" },
                        "content": "why ++?",
                        "publishedDate": "2024-05-01T10:00:00.123Z",
                        "commentType": "text",
                        "isDeleted": false
                    }]
                },
                {
                    "id": 2,
                    "comments": [{ "id": 1, "content": "Ada voted 10", "commentType": "system" }]
                }
            ],
            "count": 2
        }))
        .unwrap();

        let threads: Vec<CommentThread> = raw.value.into_iter().map(into_thread).collect();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].status, ThreadStatus::Active);
        assert_eq!(threads[0].file_path.as_deref(), Some("src/a.ts"));
        assert_eq!(threads[0].line, Some(3));
        assert_eq!(threads[0].comments[0].kind, CommentKind::Text);
        assert_eq!(threads[0].comments[0].author.as_deref(), Some("Ada"));
        assert!(threads[0].comments[0].published_at.is_some());
        assert_eq!(threads[1].status, ThreadStatus::Unknown);
        assert_eq!(threads[1].comments[0].kind, CommentKind::System);
    }

    #[test]
    fn latest_iteration_is_highest_id() {
        let raw: AdoList<AdoIteration> = serde_json::from_value(json!({
            "value": [
                { "id": 1, "sourceRefCommit": { "commitId": "aaa" } },
                { "id": 3, "sourceRefCommit": { "commitId": "ccc" } },
                { "id": 2 }
            ]
        }))
        .unwrap();
        assert_eq!(
            latest_iteration(raw.value),
            Some(IterationRef {
                id: 3,
                source_commit: Some("ccc".into())
            })
        );
        assert_eq!(latest_iteration(Vec::new()), None);
    }

    #[test]
    fn change_entries_skip_folders_and_map_kinds() {
        let raw: AdoIterationChanges = serde_json::from_value(json!({
            "changeEntries": [
                { "changeTrackingId": 1, "item": { "path": "/src", "isFolder": true }, "changeType": "add" },
                { "changeTrackingId": 2, "item": { "path": "/src/a.ts", "gitObjectType": "blob" }, "changeType": "edit" },
                { "changeTrackingId": 3, "item": { "path": "/src/b.ts" }, "changeType": "edit, rename", "originalPath": "/src/old_b.ts" },
                { "changeTrackingId": 4, "item": { "path": "/gone.ts" }, "changeType": "delete" }
            ],
            "nextSkip": 0,
            "nextTop": 0
        }))
        .unwrap();

        let entries: Vec<ChangeEntry> = raw
            .change_entries
            .into_iter()
            .filter_map(into_change_entry)
            .collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, ChangeKind::Edited);
        assert_eq!(entries[1].kind, ChangeKind::Renamed);
        assert_eq!(entries[1].original_path.as_deref(), Some("/src/old_b.ts"));
        assert_eq!(entries[2].kind, ChangeKind::Deleted);
    }

    #[test]
    fn thread_create_payload_is_active_text() {
        let v = serde_json::to_value(AdoThreadCreate::text("## Review")).unwrap();
        assert_eq!(
            v,
            json!({
                "comments": [{ "parentCommentId": 0, "content": "## Review", "commentType": 1 }],
                "status": 1
            })
        );
    }

    fn unreachable_client() -> AzureDevOpsClient {
        AzureDevOpsClient::from_config(&AzureDevOpsConfig {
            api_base: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..config()
        })
        .unwrap()
    }

    fn pr() -> PullRequestRef {
        PullRequestRef {
            id: 42,
            repository_id: "repo-guid".into(),
            project_id: "project-guid".into(),
            title: "t".into(),
            description: None,
            source_branch: "feature".into(),
            target_branch: "main".into(),
        }
    }

    #[tokio::test]
    async fn deleted_entries_are_not_fetched() {
        let entry = ChangeEntry {
            path: "/gone.ts".into(),
            kind: ChangeKind::Deleted,
            original_path: None,
        };

        let file = unreachable_client().materialize(&pr(), entry, None).await;
        assert_eq!(file, FileChange::deleted("gone.ts"));
    }

    #[tokio::test]
    async fn failed_content_fetch_marks_only_that_file() {
        let client = unreachable_client();

        let renamed = ChangeEntry {
            path: "/src/new_name.rs".into(),
            kind: ChangeKind::Renamed,
            original_path: Some("/src/old_name.rs".into()),
        };
        let file = client.materialize(&pr(), renamed, Some("abc123")).await;
        assert_eq!(file.path, "src/new_name.rs");
        assert_eq!(file.kind, ChangeKind::Renamed);
        assert_eq!(file.original_path.as_deref(), Some("src/old_name.rs"));
        assert_eq!(file.content, None);
        assert!(file.fetch_error.is_some());

        let edited = ChangeEntry {
            path: "/README.md".into(),
            kind: ChangeKind::Edited,
            original_path: None,
        };
        let file = client.materialize(&pr(), edited, None).await;
        assert_eq!(file.kind, ChangeKind::Edited);
        assert_eq!(file.content, None);
        assert!(file.fetch_error.is_some());
    }
}
