use ai_llm_service::{OpenAiService, config::default_config::config_openai_from};
use git_providers::{AzureDevOpsClient, AzureDevOpsConfig};
use pr_reviewer::{AzureReviewer, ReviewerConfig, azure_reviewer};
use tracing::info;

use crate::error_handler::AppResult;

const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";

/// HTTP host settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen address, e.g. "0.0.0.0:8080".
    pub address: String,
    /// Shared secret expected in `X-Webhook-Secret`; `None` disables the check.
    pub webhook_secret: Option<String>,
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            address: get("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            webhook_secret: get("WEBHOOK_SECRET"),
        }
    }
}

/// Shared state for all HTTP handlers.
///
/// Built once at startup and shared behind an `Arc`; nothing in it is mutated
/// while requests are served.
pub struct AppState {
    pub config: AppConfig,
    /// Review workflow wired to Azure DevOps and the completion API.
    pub reviewer: AzureReviewer,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(&|k: &str| std::env::var(k).ok())
    }

    /// Same as [`AppState::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = AppConfig::from_lookup(lookup);
        let provider_cfg = AzureDevOpsConfig::from_lookup(lookup)?;
        let llm_cfg = config_openai_from(lookup)?;
        let reviewer_cfg = ReviewerConfig::from_lookup(lookup)?;

        info!(
            organization = %provider_cfg.organization,
            project = %provider_cfg.project,
            model = %llm_cfg.model,
            non_code = ?reviewer_cfg.non_code_policy,
            webhook_secret = config.webhook_secret.is_some(),
            "configuration loaded"
        );

        let provider = AzureDevOpsClient::from_config(&provider_cfg)?;
        let llm = OpenAiService::new(llm_cfg)?;

        Ok(Self {
            config,
            reviewer: azure_reviewer(provider, llm, &reviewer_cfg),
        })
    }
}
