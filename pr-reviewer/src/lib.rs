//! Public entry for the pull-request review workflow.
//!
//! On `git.pullrequest.created` the [`Reviewer`] fetches the pull request and
//! its threads, skips it when a human already commented, fetches the changed
//! files, asks the completion model for a review and posts the result as a
//! new thread.
//!
//! - [`event`] decodes service-hook notifications.
//! - [`repository`] is the provider seam ([`RepositoryClient`]) and its
//!   Azure DevOps implementation.
//! - [`review`] builds the prompt and talks to the model ([`ReviewGenerator`]).
//! - [`lang`] maps file names to languages and tells code from non-code.
//! - [`telemetry`] logs prompts with secrets redacted.
//!
//! Collaborators are plain generics: no `async-trait` and no `Box<dyn ...>`.

pub mod config;
pub mod errors;
pub mod event;
pub mod lang;
pub mod orchestrator;
pub mod repository;
pub mod review;
pub mod telemetry;

use ai_llm_service::OpenAiService;
use git_providers::AzureDevOpsClient;

pub use config::{NonCodePolicy, ReviewerConfig};
pub use errors::{ConfigError, ReviewError, ReviewResult};
pub use event::{PULL_REQUEST_CREATED, WebhookEvent};
pub use orchestrator::{ReviewOutcome, Reviewer};
pub use repository::{AzureDevOpsRepository, RepositoryClient};
pub use review::{LlmReviewGenerator, ReviewGenerator};

/// Reviewer wired to Azure DevOps and the OpenAI-compatible completion API.
pub type AzureReviewer = Reviewer<AzureDevOpsRepository, LlmReviewGenerator>;

/// Builds the production [`AzureReviewer`] from loaded clients and settings.
pub fn azure_reviewer(
    provider: AzureDevOpsClient,
    llm: OpenAiService,
    cfg: &ReviewerConfig,
) -> AzureReviewer {
    Reviewer::new(
        AzureDevOpsRepository::new(provider, cfg.fetch_concurrency),
        LlmReviewGenerator::new(llm, cfg),
        cfg.non_code_policy,
    )
}
