//! Default completion config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`     = API key (mandatory)
//! - `OPENAI_MODEL`       = model id (default: [`DEFAULT_MODEL`])
//! - `OPENAI_ENDPOINT`    = API base URL (default: [`DEFAULT_ENDPOINT`])
//! - `LLM_MAX_TOKENS`     = optional max tokens (u32)
//! - `LLM_TEMPERATURE`    = optional temperature (default: `0.2`, range `0.0..=2.0`)
//! - `LLM_TIMEOUT_SECS`   = optional request timeout (default: `120`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_f32, env_opt_u32, env_opt_u64, must_env,
        validate_http_endpoint, validate_range_f32,
    },
};

/// Model used when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Endpoint used when `OPENAI_ENDPOINT` is not set.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Constructs the completion config from the process environment.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if `OPENAI_API_KEY` is missing
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for bad numeric knobs
/// - [`ConfigError::InvalidFormat`] if the endpoint is not an http(s) URL
pub fn config_openai_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_from(&|k: &str| std::env::var(k).ok())
}

/// Same as [`config_openai_from_env`] but reads values through `lookup`.
pub fn config_openai_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_env(lookup, "OPENAI_API_KEY")?;
    let model = env_opt(lookup, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let endpoint =
        env_opt(lookup, "OPENAI_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    validate_http_endpoint("OPENAI_ENDPOINT", &endpoint)?;

    let max_tokens = env_opt_u32(lookup, "LLM_MAX_TOKENS")?;
    let temperature = env_opt_f32(lookup, "LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;
    let timeout_secs = env_opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(temperature),
        timeout_secs: Some(timeout_secs),
    })
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
    fn defaults_apply_when_only_key_is_set() {
        let cfg = config_openai_from(&env(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.max_tokens, None);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = config_openai_from(&env(&[("OPENAI_MODEL", "gpt-4o")])).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn overrides_are_honoured() {
        let cfg = config_openai_from(&env(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4.1"),
            ("OPENAI_ENDPOINT", "http://localhost:4000"),
            ("LLM_MAX_TOKENS", "1024"),
            ("LLM_TEMPERATURE", "0.7"),
        ]))
        .unwrap();
        assert_eq!(cfg.model, "gpt-4.1");
        assert_eq!(cfg.endpoint, "http://localhost:4000");
        assert_eq!(cfg.max_tokens, Some(1024));
        assert_eq!(cfg.temperature, Some(0.7));
    }

    #[test]
    fn bad_endpoint_and_temperature_are_rejected() {
        assert!(
            config_openai_from(&env(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_ENDPOINT", "api.openai.com"),
            ]))
            .is_err()
        );
        assert!(
            config_openai_from(&env(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("LLM_TEMPERATURE", "5"),
            ]))
            .is_err()
        );
    }
}
