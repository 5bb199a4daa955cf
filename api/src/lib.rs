use std::sync::Arc;

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

pub use crate::core::app_state::{AppConfig, AppState};
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::request_id::request_id_layer,
    routes::{
        health_route::health_route, webhook::pull_request_webhook_route::pull_request_webhook_route,
    },
};

/// Builds the HTTP router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(pull_request_webhook_route))
        .route("/webhook/pull-request", post(pull_request_webhook_route))
        .route("/health", get(health_route))
        .layer(middleware::from_fn(request_id_layer))
        .with_state(state)
}

/// Binds `state.config.address` and serves until Ctrl+C / SIGTERM.
pub async fn start(state: AppState) -> AppResult<()> {
    let address = state.config.address.clone();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::core::app_state::AppState;

    /// State pointing at closed local ports, plus `extra` variables.
    pub fn state_with(extra: &[(&str, &str)]) -> Arc<AppState> {
        let mut vars: HashMap<String, String> = [
            ("AZURE_DEVOPS_TOKEN", "pat"),
            ("AZURE_DEVOPS_ORG", "contoso"),
            ("AZURE_DEVOPS_PROJECT", "web"),
            ("AZURE_DEVOPS_API_BASE", "http://127.0.0.1:9"),
            ("AZURE_DEVOPS_TIMEOUT_SECS", "2"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_ENDPOINT", "http://127.0.0.1:9"),
            ("LLM_TIMEOUT_SECS", "2"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        Arc::new(AppState::from_lookup(&|k: &str| vars.get(k).cloned()).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::state_with;

    #[tokio::test]
    async fn health_reports_ok() {
        let resp = health_route().await;
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": true, "data": { "status": "ok" } })
        );
    }

    #[test]
    fn router_builds_and_config_defaults_apply() {
        let state = state_with(&[]);
        assert_eq!(state.config.address, "0.0.0.0:8080");
        assert_eq!(state.config.webhook_secret, None);
        let _ = router(state);
    }

    #[test]
    fn missing_required_config_fails_startup() {
        let err = AppState::from_lookup(&|_: &str| None).err();
        assert!(matches!(err, Some(AppError::ProviderConfig(_))));
    }
}
