//! Shared LLM client for the review service.
//!
//! - [`config`] holds [`LlmModelConfig`] and the env-driven constructor.
//! - [`services::open_ai_service`] is the non-streaming chat completion client.
//! - [`error_handler`] is the unified error hierarchy plus env/validation helpers.
//! - [`telemetry`] exposes a library-scoped `tracing` layer for binaries.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::{default_config::config_openai_from_env, llm_model_config::LlmModelConfig};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use services::open_ai_service::OpenAiService;
