use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use pr_reviewer::WebhookEvent;
use tracing::{error, info, instrument, warn};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::webhook::webhook_response::WebhookResponse,
};

pub const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

/// POST /webhook/pull-request (also POST /)
///
/// Receives a service-hook notification and runs the review workflow for
/// `git.pullrequest.created`. The body is taken as raw bytes so that a body
/// that is not JSON is reported as `INVALID_PAYLOAD` by the workflow itself.
///
/// - 200 for ignored, skipped and completed runs
/// - 401 when a webhook secret is configured and the header does not match
/// - 500 for invalid payloads and upstream failures
#[instrument(name = "pull_request_webhook", skip_all, fields(body_len = body.len()))]
pub async fn pull_request_webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    if let Some(expected) = state.config.webhook_secret.as_deref() {
        let provided = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();
        if !secrets_match(provided, expected) {
            warn!("webhook secret missing or wrong");
            return Err(AppError::Unauthorized);
        }
    }

    let event = WebhookEvent::from_slice(&body)
        .inspect_err(|e| warn!(error = %e, "undecodable webhook body"))?;

    match state.reviewer.handle_pull_request_created(&event).await {
        Ok(outcome) => {
            info!(%outcome, "webhook handled");
            Ok(ApiResponse::success(WebhookResponse::from(outcome))
                .into_response_with_status(StatusCode::OK))
        }
        Err(err) => {
            error!(error = %err, code = err.code(), "review failed");
            Err(err.into())
        }
    }
}

/// Compares two secrets without short-circuiting on the first differing byte.
fn secrets_match(provided: &str, expected: &str) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::{Value, json};

    use crate::test_support::state_with;

    async fn call(state: Arc<AppState>, headers: HeaderMap, body: Value) -> (StatusCode, Value) {
        call_raw(state, headers, Bytes::from(body.to_string())).await
    }

    async fn call_raw(state: Arc<AppState>, headers: HeaderMap, body: Bytes) -> (StatusCode, Value) {
        let resp = match pull_request_webhook_route(State(state), headers, body).await {
            Ok(r) => r,
            Err(e) => axum::response::IntoResponse::into_response(e),
        };
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn secret_headers(secret: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(WEBHOOK_SECRET_HEADER, HeaderValue::from_str(secret).unwrap());
        h
    }

    #[tokio::test]
    async fn wrong_or_missing_secret_is_401() {
        let state = state_with(&[("WEBHOOK_SECRET", "s3cret")]);

        let (status, body) = call(state.clone(), HeaderMap::new(), json!({})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));

        let (status, _) = call(state, secret_headers("nope"), json!({})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn secret_comparison() {
        assert!(secrets_match("s3cret", "s3cret"));
        assert!(secrets_match("", ""));
        assert!(!secrets_match("s3cret", "s3creT"));
        assert!(!secrets_match("s3cre", "s3cret"));
        assert!(!secrets_match("", "s3cret"));
    }

    #[tokio::test]
    async fn other_event_types_are_ignored_with_200() {
        let state = state_with(&[("WEBHOOK_SECRET", "s3cret")]);
        let (status, body) = call(
            state,
            secret_headers("s3cret"),
            json!({ "eventType": "git.push", "resource": {} }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": { "outcome": "ignored", "message": "ignored: wrong event type" }
            })
        );
    }

    #[tokio::test]
    async fn body_that_is_not_json_is_invalid_payload() {
        let state = state_with(&[]);
        let (status, body) = call_raw(state, HeaderMap::new(), Bytes::from_static(b"{oops")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], json!("INVALID_PAYLOAD"));
    }

    #[tokio::test]
    async fn envelope_without_event_type_or_object_is_invalid_payload() {
        for payload in [json!({}), json!({ "resource": {} }), json!(["git.pullrequest.created", {}])] {
            let (status, body) = call(state_with(&[]), HeaderMap::new(), payload).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"]["code"], json!("INVALID_PAYLOAD"));
            assert_eq!(body["error"]["details"][0]["path"], json!("body"));
        }
    }

    #[tokio::test]
    async fn created_event_without_repository_is_invalid_payload() {
        let state = state_with(&[]);
        let (status, body) = call(
            state,
            HeaderMap::new(),
            json!({ "eventType": "git.pullrequest.created", "resource": { "pullRequestId": 3 } }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], json!("INVALID_PAYLOAD"));
    }

    #[tokio::test]
    async fn unreachable_provider_is_upstream_fetch_failure() {
        let state = state_with(&[]);
        let (status, body) = call(
            state,
            HeaderMap::new(),
            json!({
                "eventType": "git.pullrequest.created",
                "resource": {
                    "pullRequestId": 42,
                    "repository": { "id": "repo", "project": { "id": "proj" } }
                }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], json!("UPSTREAM_FETCH_FAILED"));
    }
}
