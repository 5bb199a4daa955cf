use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pr_reviewer::ReviewError;
use thiserror::Error;

use crate::{
    core::http::response_envelope::{ApiErrorDetail, ApiResponse},
    routes::webhook::pull_request_webhook_route::WEBHOOK_SECRET_HEADER,
};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    ProviderConfig(#[from] git_providers::ConfigError),

    #[error(transparent)]
    ProviderSetup(#[from] git_providers::ProviderError),

    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),

    #[error(transparent)]
    ReviewerConfig(#[from] pr_reviewer::ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("invalid webhook secret")]
    Unauthorized,

    #[error(transparent)]
    Review(#[from] ReviewError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            // Every review failure, bad payload included, is a 500.
            AppError::Review(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // startup-only
            AppError::ProviderConfig(_)
            | AppError::ProviderSetup(_)
            | AppError::Llm(_)
            | AppError::ReviewerConfig(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::ProviderConfig(_) | AppError::Llm(_) | AppError::ReviewerConfig(_) => {
                "CONFIG_ERROR"
            }
            AppError::ProviderSetup(_) => "PROVIDER_SETUP_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Review(e) => e.code(),
        }
    }

    fn details(&self) -> Vec<ApiErrorDetail> {
        match self {
            AppError::Unauthorized => vec![ApiErrorDetail::new(
                WEBHOOK_SECRET_HEADER,
                "send the shared secret configured on the service hook",
            )],
            AppError::Review(ReviewError::InvalidPayload(_)) => vec![ApiErrorDetail::new(
                "body",
                "expected a JSON object with `eventType` and `resource`",
            )],
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::error(self.error_code(), self.to_string(), self.details())
            .into_response_with_status(self.status_code())
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
