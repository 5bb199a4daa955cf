//! Service-hook notification parsing.
//!
//! Only the envelope (`eventType`) is decoded eagerly; the resource is kept as
//! raw JSON and decoded after the event type has been accepted, so that
//! unrelated events never fail on a resource shape we do not know.

use git_providers::PullRequestLocator;
use serde::Deserialize;

use crate::errors::{ReviewError, ReviewResult};

/// Event type announcing a newly created pull request.
pub const PULL_REQUEST_CREATED: &str = "git.pullrequest.created";

/// Inbound webhook notification.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(default)]
    pub resource: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestResource {
    pull_request_id: u64,
    repository: RepositoryResource,
}

#[derive(Debug, Deserialize)]
struct RepositoryResource {
    id: String,
    project: ProjectResource,
}

#[derive(Debug, Deserialize)]
struct ProjectResource {
    id: String,
}

impl WebhookEvent {
    /// Decodes a raw request body.
    ///
    /// # Errors
    /// [`ReviewError::InvalidPayload`] when the body is not a JSON object or
    /// carries no string `eventType`.
    pub fn from_slice(body: &[u8]) -> ReviewResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ReviewError::InvalidPayload(e.to_string()))?;
        if !value.is_object() {
            return Err(ReviewError::InvalidPayload(
                "body is not a JSON object".into(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ReviewError::InvalidPayload(e.to_string()))
    }

    pub fn is_pull_request_created(&self) -> bool {
        self.event_type == PULL_REQUEST_CREATED
    }

    /// Extracts the pull request identifiers from the resource.
    ///
    /// # Errors
    /// [`ReviewError::InvalidPayload`] when an identifier is missing, empty or
    /// the pull request id is zero.
    pub fn locator(&self) -> ReviewResult<PullRequestLocator> {
        let res = PullRequestResource::deserialize(&self.resource)
            .map_err(|e| ReviewError::InvalidPayload(format!("resource: {e}")))?;

        if res.pull_request_id == 0 {
            return Err(ReviewError::InvalidPayload("pullRequestId is 0".into()));
        }
        if res.repository.id.trim().is_empty() {
            return Err(ReviewError::InvalidPayload("repository.id is empty".into()));
        }
        if res.repository.project.id.trim().is_empty() {
            return Err(ReviewError::InvalidPayload(
                "repository.project.id is empty".into(),
            ));
        }

        Ok(PullRequestLocator {
            pull_request_id: res.pull_request_id,
            repository_id: res.repository.id,
            project_id: res.repository.project.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(v: serde_json::Value) -> WebhookEvent {
        WebhookEvent::from_slice(v.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn extracts_locator_from_created_event() {
        let ev = event(json!({
            "subscriptionId": "sub",
            "eventType": "git.pullrequest.created",
            "resource": {
                "pullRequestId": 42,
                "status": "active",
                "repository": { "id": "repo-guid", "name": "shop", "project": { "id": "proj-guid", "name": "Web" } }
            }
        }));
        assert!(ev.is_pull_request_created());
        assert_eq!(
            ev.locator().unwrap(),
            PullRequestLocator {
                pull_request_id: 42,
                repository_id: "repo-guid".into(),
                project_id: "proj-guid".into(),
            }
        );
    }

    #[test]
    fn other_event_types_are_recognized_without_resource() {
        let ev = event(json!({ "eventType": "git.pullrequest.updated" }));
        assert!(!ev.is_pull_request_created());
        assert!(ev.resource.is_null());
    }

    #[test]
    fn envelope_without_event_type_is_rejected() {
        for body in [
            json!({}),
            json!({ "resource": {} }),
            json!({ "foo": 1 }),
            json!({ "eventType": null }),
            json!({ "eventType": 7, "resource": {} }),
        ] {
            assert!(
                matches!(
                    WebhookEvent::from_slice(body.to_string().as_bytes()),
                    Err(ReviewError::InvalidPayload(_))
                ),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        let array = json!([
            PULL_REQUEST_CREATED,
            { "pullRequestId": 5, "repository": { "id": "r", "project": { "id": "p" } } }
        ]);
        for body in [array, json!("git.pullrequest.created"), json!(42), json!(null)] {
            assert!(
                matches!(
                    WebhookEvent::from_slice(body.to_string().as_bytes()),
                    Err(ReviewError::InvalidPayload(_))
                ),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(matches!(
            WebhookEvent::from_slice(b"not json"),
            Err(ReviewError::InvalidPayload(_))
        ));

        let missing_project = event(json!({
            "eventType": PULL_REQUEST_CREATED,
            "resource": { "pullRequestId": 1, "repository": { "id": "r" } }
        }));
        assert!(matches!(
            missing_project.locator(),
            Err(ReviewError::InvalidPayload(_))
        ));

        let zero_id = event(json!({
            "eventType": PULL_REQUEST_CREATED,
            "resource": { "pullRequestId": 0, "repository": { "id": "r", "project": { "id": "p" } } }
        }));
        assert!(matches!(
            zero_id.locator(),
            Err(ReviewError::InvalidPayload(_))
        ));
    }
}
