//! Review eligibility and publication workflow.
//!
//! One call per webhook delivery:
//!
//! 1. accept only `git.pullrequest.created` events
//! 2. fetch the pull request and its comment threads
//! 3. stop if a human already commented
//! 4. fetch changed files (stop if none) and apply the non-code policy
//! 5. generate the review (stop if empty)
//! 6. post it as a new thread
//!
//! Eligibility and publication are not atomic: two deliveries for the same
//! pull request that overlap can both pass step 3 and both post.

use git_providers::{CommentThread, FileChange};
use serde::Serialize;
use tracing::{Span, debug, info, instrument, warn};

use crate::config::NonCodePolicy;
use crate::errors::{ReviewError, ReviewResult};
use crate::event::WebhookEvent;
use crate::lang;
use crate::repository::RepositoryClient;
use crate::review::ReviewGenerator;

/// How a delivery ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Ignored,
    SkippedHumanComments,
    SkippedNoChanges,
    SkippedEmptyReview,
    Completed,
}

impl ReviewOutcome {
    /// Human-readable status line returned to the webhook caller.
    pub fn message(self) -> &'static str {
        match self {
            ReviewOutcome::Ignored => "ignored: wrong event type",
            ReviewOutcome::SkippedHumanComments => "skipped: already has human comments",
            ReviewOutcome::SkippedNoChanges => "skipped: no changes",
            ReviewOutcome::SkippedEmptyReview => "skipped: empty review",
            ReviewOutcome::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// `true` if any thread holds a live, human-authored comment.
///
/// System and code-change notices never count.
pub fn has_human_comment(threads: &[CommentThread]) -> bool {
    threads
        .iter()
        .flat_map(|t| t.comments.iter())
        .any(|c| c.is_human())
}

/// Tags languages and applies `policy`; keeps provider order.
///
/// `Exclude` drops non-code files, `SummaryOnly` marks them
/// [`FileChange::summary_only`], `Include` leaves them untouched.
pub fn select_for_review(files: Vec<FileChange>, policy: NonCodePolicy) -> Vec<FileChange> {
    files
        .into_iter()
        .filter_map(|mut f| {
            let is_code = lang::is_code(&f.path);
            match policy {
                NonCodePolicy::Exclude if !is_code => return None,
                NonCodePolicy::SummaryOnly => f.summary_only = !is_code,
                _ => {}
            }
            if f.language.is_none() {
                f.language = lang::detect(&f.path).map(|l| l.tag.to_string());
            }
            Some(f)
        })
        .collect()
}

/// The review workflow, generic over its two collaborators.
#[derive(Debug)]
pub struct Reviewer<R, G> {
    repository: R,
    generator: G,
    non_code_policy: NonCodePolicy,
}

impl<R, G> Reviewer<R, G>
where
    R: RepositoryClient,
    G: ReviewGenerator,
{
    pub fn new(repository: R, generator: G, non_code_policy: NonCodePolicy) -> Self {
        Self {
            repository,
            generator,
            non_code_policy,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Runs the workflow for one webhook delivery.
    ///
    /// # Errors
    /// - [`ReviewError::InvalidPayload`] when a creation event lacks identifiers
    /// - [`ReviewError::UpstreamFetchFailed`] when reading the pull request,
    ///   its threads or its changed files fails
    /// - [`ReviewError::UpstreamPublishFailed`] when posting the review fails
    #[instrument(
        name = "review",
        skip_all,
        fields(
            event_type = %event.event_type,
            pull_request_id = tracing::field::Empty,
            repository_id = tracing::field::Empty,
        )
    )]
    pub async fn handle_pull_request_created(
        &self,
        event: &WebhookEvent,
    ) -> ReviewResult<ReviewOutcome> {
        if !event.is_pull_request_created() {
            info!("event ignored");
            return Ok(ReviewOutcome::Ignored);
        }

        let locator = event.locator()?;
        let span = Span::current();
        span.record("pull_request_id", locator.pull_request_id);
        span.record("repository_id", locator.repository_id.as_str());

        let pr = self
            .repository
            .fetch_pull_request(&locator)
            .await
            .map_err(ReviewError::UpstreamFetchFailed)?;
        debug!(title = %pr.title, source = %pr.source_branch, target = %pr.target_branch, "pull request fetched");

        let threads = self
            .repository
            .fetch_comment_threads(&pr)
            .await
            .map_err(ReviewError::UpstreamFetchFailed)?;
        debug!(threads = threads.len(), "comment threads fetched");

        if has_human_comment(&threads) {
            info!("pull request already has human comments; skipping");
            return Ok(ReviewOutcome::SkippedHumanComments);
        }

        let files = self
            .repository
            .fetch_changed_files(&pr)
            .await
            .map_err(ReviewError::UpstreamFetchFailed)?;
        if files.is_empty() {
            info!("pull request has no changed files; skipping");
            return Ok(ReviewOutcome::SkippedNoChanges);
        }

        let failed = files.iter().filter(|f| f.fetch_error.is_some()).count();
        if failed > 0 {
            warn!(failed, "some file contents could not be fetched");
        }

        let total = files.len();
        let changes = select_for_review(files, self.non_code_policy);
        debug!(
            total,
            selected = changes.len(),
            policy = ?self.non_code_policy,
            "changed files selected"
        );

        let review = self.generator.generate_review(&pr, &changes).await;
        if review.trim().is_empty() {
            info!("no review produced; skipping");
            return Ok(ReviewOutcome::SkippedEmptyReview);
        }

        self.repository
            .post_comment(&pr, &review)
            .await
            .map_err(ReviewError::UpstreamPublishFailed)?;

        info!(review_len = review.len(), "review posted");
        Ok(ReviewOutcome::Completed)
    }
}
