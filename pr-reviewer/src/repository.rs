//! Repository provider seam of the review workflow.
//!
//! The workflow is generic over [`RepositoryClient`] so it can run against
//! Azure DevOps in production and against in-memory fakes in tests. The trait
//! uses return-position `impl Future` instead of `async-trait`; implementors
//! simply write `async fn`.

use std::future::Future;

use git_providers::{
    AzureDevOpsClient, CommentThread, FileChange, ProviderResult, PullRequestLocator,
    PullRequestRef,
};
use tracing::debug;

/// Operations the workflow needs from a source-control provider.
pub trait RepositoryClient: Send + Sync {
    /// Pull request metadata.
    fn fetch_pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> impl Future<Output = ProviderResult<PullRequestRef>> + Send;

    /// Every discussion thread of the pull request, system threads included.
    fn fetch_comment_threads(
        &self,
        pr: &PullRequestRef,
    ) -> impl Future<Output = ProviderResult<Vec<CommentThread>>> + Send;

    /// Changed files of the latest revision, in provider order.
    ///
    /// A file whose content cannot be read is still returned, with
    /// `content = None` and `fetch_error` set.
    fn fetch_changed_files(
        &self,
        pr: &PullRequestRef,
    ) -> impl Future<Output = ProviderResult<Vec<FileChange>>> + Send;

    /// Creates one new top-level comment on the pull request.
    fn post_comment(
        &self,
        pr: &PullRequestRef,
        text: &str,
    ) -> impl Future<Output = ProviderResult<()>> + Send;
}

/// [`RepositoryClient`] backed by the Azure DevOps REST API.
#[derive(Debug, Clone)]
pub struct AzureDevOpsRepository {
    client: AzureDevOpsClient,
    fetch_concurrency: usize,
}

impl AzureDevOpsRepository {
    pub fn new(client: AzureDevOpsClient, fetch_concurrency: usize) -> Self {
        Self {
            client,
            fetch_concurrency: fetch_concurrency.max(1),
        }
    }
}

impl RepositoryClient for AzureDevOpsRepository {
    async fn fetch_pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> ProviderResult<PullRequestRef> {
        self.client.get_pull_request(locator).await
    }

    async fn fetch_comment_threads(&self, pr: &PullRequestRef) -> ProviderResult<Vec<CommentThread>> {
        self.client.get_threads(pr).await
    }

    async fn fetch_changed_files(&self, pr: &PullRequestRef) -> ProviderResult<Vec<FileChange>> {
        self.client
            .get_changed_files(pr, self.fetch_concurrency)
            .await
    }

    async fn post_comment(&self, pr: &PullRequestRef, text: &str) -> ProviderResult<()> {
        let thread_id = self.client.create_thread(pr, text).await?;
        debug!(thread_id, "review thread created");
        Ok(())
    }
}
