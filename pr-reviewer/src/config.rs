//! Reviewer settings loaded once at startup.

use std::str::FromStr;

use crate::errors::ConfigError;

const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// What to do with changed files that are not source code (docs, lockfiles,
/// data, unknown extensions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonCodePolicy {
    /// Embed them like any other file.
    Include,
    /// List them under "Files changed" but do not embed their content.
    #[default]
    SummaryOnly,
    /// Drop them before the prompt is built.
    Exclude,
}

impl FromStr for NonCodePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "include" | "all" => Ok(NonCodePolicy::Include),
            "summary" | "summary_only" | "summary-only" => Ok(NonCodePolicy::SummaryOnly),
            "exclude" | "none" => Ok(NonCodePolicy::Exclude),
            _ => Err(ConfigError::InvalidValue {
                var: "REVIEW_NON_CODE_FILES",
                value: s.to_string(),
            }),
        }
    }
}

/// Settings of the review workflow and prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerConfig {
    /// Replaces the default instruction block when set.
    pub instructions: Option<String>,
    pub non_code_policy: NonCodePolicy,
    /// Embedded file content is cut after this many characters (0 = no limit).
    pub max_file_chars: usize,
    /// Concurrent file content requests.
    pub fetch_concurrency: usize,
    /// Prompt telemetry switches.
    pub log_prompts: bool,
    pub prompt_echo_threshold: usize,
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            instructions: None,
            non_code_policy: NonCodePolicy::default(),
            max_file_chars: 0,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            log_prompts: false,
            prompt_echo_threshold: 0,
        }
    }
}

impl ReviewerConfig {
    /// Loads the config from the process environment.
    ///
    /// # Env
    /// - `REVIEW_INSTRUCTIONS`
    /// - `REVIEW_NON_CODE_FILES` (`include` | `summary` | `exclude`, default `summary`)
    /// - `REVIEW_MAX_FILE_CHARS` (default `0`)
    /// - `FILE_FETCH_CONCURRENCY` (default `8`)
    /// - `PR_REVIEWER_LOG_PROMPTS` (bool)
    /// - `PR_REVIEWER_PROMPT_ECHO_THRESHOLD` (default `0`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|k: &str| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let usize_or = |k: &'static str, default_: usize| -> Result<usize, ConfigError> {
            match get(k) {
                Some(v) => v.parse().map_err(|_| ConfigError::InvalidNumber(k)),
                None => Ok(default_),
            }
        };

        let non_code_policy = match get("REVIEW_NON_CODE_FILES") {
            Some(v) => v.parse()?,
            None => NonCodePolicy::default(),
        };

        Ok(Self {
            instructions: get("REVIEW_INSTRUCTIONS"),
            non_code_policy,
            max_file_chars: usize_or("REVIEW_MAX_FILE_CHARS", 0)?,
            fetch_concurrency: usize_or("FILE_FETCH_CONCURRENCY", DEFAULT_FETCH_CONCURRENCY)?
                .max(1),
            log_prompts: get("PR_REVIEWER_LOG_PROMPTS").is_some_and(|v| is_truthy(&v)),
            prompt_echo_threshold: usize_or("PR_REVIEWER_PROMPT_ECHO_THRESHOLD", 0)?,
        })
    }
}

/// "1", "true", "yes", "on" (any case).
fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ReviewerConfig::from_lookup(&env(&[])).unwrap();
        assert_eq!(cfg, ReviewerConfig::default());
        assert_eq!(cfg.non_code_policy, NonCodePolicy::SummaryOnly);
    }

    #[test]
    fn reads_overrides() {
        let cfg = ReviewerConfig::from_lookup(&env(&[
            ("REVIEW_INSTRUCTIONS", "Only check SQL."),
            ("REVIEW_NON_CODE_FILES", "Exclude"),
            ("REVIEW_MAX_FILE_CHARS", "2000"),
            ("FILE_FETCH_CONCURRENCY", "0"),
            ("PR_REVIEWER_LOG_PROMPTS", "yes"),
        ]))
        .unwrap();
        assert_eq!(cfg.instructions.as_deref(), Some("Only check SQL."));
        assert_eq!(cfg.non_code_policy, NonCodePolicy::Exclude);
        assert_eq!(cfg.max_file_chars, 2000);
        assert_eq!(cfg.fetch_concurrency, 1);
        assert!(cfg.log_prompts);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            ReviewerConfig::from_lookup(&env(&[("REVIEW_NON_CODE_FILES", "maybe")])).unwrap_err(),
            ConfigError::InvalidValue {
                var: "REVIEW_NON_CODE_FILES",
                value: "maybe".into()
            }
        );
        assert_eq!(
            ReviewerConfig::from_lookup(&env(&[("REVIEW_MAX_FILE_CHARS", "lots")])).unwrap_err(),
            ConfigError::InvalidNumber("REVIEW_MAX_FILE_CHARS")
        );
    }
}
