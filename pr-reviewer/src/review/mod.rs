//! Review generation over the completion provider.

pub mod prompt;

use std::future::Future;
use std::time::Instant;

use ai_llm_service::OpenAiService;
use git_providers::{FileChange, PullRequestRef};
use tracing::{debug, error, info};

use crate::config::ReviewerConfig;
use crate::telemetry::PromptTelemetry;
use prompt::{PromptOptions, SYSTEM_PROMPT, build_review_prompt};

/// Produces review text for a pull request.
///
/// Contract: implementations never fail. Anything that prevents a review
/// (transport error, bad status, undecodable body, no choices) is logged and
/// reported as an empty string.
pub trait ReviewGenerator: Send + Sync {
    fn generate_review(
        &self,
        pr: &PullRequestRef,
        changes: &[FileChange],
    ) -> impl Future<Output = String> + Send;
}

/// [`ReviewGenerator`] sending one chat completion per pull request.
#[derive(Debug, Clone)]
pub struct LlmReviewGenerator {
    llm: OpenAiService,
    instructions: Option<String>,
    max_file_chars: usize,
    telemetry: PromptTelemetry,
}

impl LlmReviewGenerator {
    pub fn new(llm: OpenAiService, cfg: &ReviewerConfig) -> Self {
        Self {
            llm,
            instructions: cfg.instructions.clone(),
            max_file_chars: cfg.max_file_chars,
            telemetry: PromptTelemetry {
                enabled: cfg.log_prompts,
                echo_threshold: cfg.prompt_echo_threshold,
            },
        }
    }

    /// Prompt that [`ReviewGenerator::generate_review`] would send.
    pub fn build_prompt(&self, pr: &PullRequestRef, changes: &[FileChange]) -> String {
        let opts = PromptOptions {
            instructions: self.instructions.as_deref(),
            max_file_chars: self.max_file_chars,
        };
        build_review_prompt(pr, changes, &opts)
    }
}

impl ReviewGenerator for LlmReviewGenerator {
    async fn generate_review(&self, pr: &PullRequestRef, changes: &[FileChange]) -> String {
        let prompt = self.build_prompt(pr, changes);
        self.telemetry.record(pr.id, &prompt);

        let started = Instant::now();
        debug!(
            pr_id = pr.id,
            files = changes.len(),
            model = %self.llm.model(),
            "requesting review"
        );

        match self.llm.generate(&prompt, Some(SYSTEM_PROMPT)).await {
            Ok(text) => {
                info!(
                    pr_id = pr.id,
                    review_len = text.len(),
                    latency_ms = started.elapsed().as_millis(),
                    "review generated"
                );
                text
            }
            Err(e) => {
                error!(
                    pr_id = pr.id,
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "review generation failed; continuing with empty review"
                );
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::LlmModelConfig;
    use git_providers::ChangeKind;

    fn generator(endpoint: &str, cfg: &ReviewerConfig) -> LlmReviewGenerator {
        let llm = OpenAiService::new(LlmModelConfig {
            model: "gpt-4o-mini".into(),
            endpoint: endpoint.into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.2),
            timeout_secs: Some(2),
        })
        .unwrap();
        LlmReviewGenerator::new(llm, cfg)
    }

    fn pr() -> PullRequestRef {
        PullRequestRef {
            id: 42,
            repository_id: "repo".into(),
            project_id: "proj".into(),
            title: "Fix off-by-one".into(),
            description: Some("Loop ran once too often.".into()),
            source_branch: "fix".into(),
            target_branch: "main".into(),
        }
    }

    #[tokio::test]
    async fn unreachable_provider_yields_empty_review() {
        // Port 9 (discard) is not expected to serve HTTP.
        let g = generator("http://127.0.0.1:9", &ReviewerConfig::default());
        let changes = vec![FileChange::with_content("a.ts", ChangeKind::Edited, "x++")];
        assert_eq!(g.generate_review(&pr(), &changes).await, "");
    }

    #[test]
    fn prompt_follows_selection_and_instructions() {
        let mut notes = FileChange::with_content("b.md", ChangeKind::Added, "# notes");
        let g = generator(
            "http://127.0.0.1:9",
            &ReviewerConfig {
                instructions: Some("Only comment on naming.".into()),
                ..Default::default()
            },
        );

        let prompt = g.build_prompt(&pr(), std::slice::from_ref(&notes));
        assert!(prompt.contains("# notes"));
        assert!(prompt.ends_with("Only comment on naming.\n"));

        notes.summary_only = true;
        let prompt = g.build_prompt(&pr(), &[notes]);
        assert!(prompt.contains("- `b.md` (markdown, added)"));
        assert!(!prompt.contains("# notes"));
    }
}
