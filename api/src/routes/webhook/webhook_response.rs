use pr_reviewer::ReviewOutcome;
use serde::Serialize;

/// Payload of a successful webhook delivery.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub outcome: ReviewOutcome,
    pub message: &'static str,
}

impl From<ReviewOutcome> for WebhookResponse {
    fn from(outcome: ReviewOutcome) -> Self {
        Self {
            outcome,
            message: outcome.message(),
        }
    }
}
