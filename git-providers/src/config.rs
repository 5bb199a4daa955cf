//! Runtime configuration for the Azure DevOps client.
//!
//! Usually injected from environment at startup; business logic only ever
//! sees the resulting struct.

use crate::errors::ConfigError;

/// Public Azure DevOps Services host.
pub const DEFAULT_API_BASE: &str = "https://dev.azure.com";

/// REST API version sent with every request.
pub const API_VERSION: &str = "7.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for one Azure DevOps organization.
#[derive(Clone)]
pub struct AzureDevOpsConfig {
    /// API base, e.g. "https://dev.azure.com" or an on-prem collection URL.
    pub api_base: String,
    /// Organization (or collection) name.
    pub organization: String,
    /// Project name every request URL is scoped to.
    pub project: String,
    /// Personal access token.
    pub token: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AzureDevOpsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsConfig")
            .field("api_base", &self.api_base)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AzureDevOpsConfig {
    /// Loads the config from the process environment.
    ///
    /// # Env
    /// - `AZURE_DEVOPS_TOKEN` (required)
    /// - `AZURE_DEVOPS_ORG` (required)
    /// - `AZURE_DEVOPS_PROJECT` (required)
    /// - `AZURE_DEVOPS_API_BASE` (default: `https://dev.azure.com`)
    /// - `AZURE_DEVOPS_TIMEOUT_SECS` (default: `30`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|k: &str| std::env::var(k).ok())
    }

    /// Same as [`AzureDevOpsConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("AZURE_DEVOPS_TOKEN").ok_or(ConfigError::MissingToken)?;
        let organization =
            get("AZURE_DEVOPS_ORG").ok_or(ConfigError::MissingVar("AZURE_DEVOPS_ORG"))?;
        let project =
            get("AZURE_DEVOPS_PROJECT").ok_or(ConfigError::MissingVar("AZURE_DEVOPS_PROJECT"))?;

        let api_base = get("AZURE_DEVOPS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into());
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(api_base));
        }

        let timeout_secs = match get("AZURE_DEVOPS_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber("AZURE_DEVOPS_TIMEOUT_SECS"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            organization,
            project,
            token,
            timeout_secs,
        })
    }

    /// `{api_base}/{organization}`, the root of every request URL.
    pub fn organization_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(&self.organization)
        )
    }
}
